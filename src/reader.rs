//! The input loop and the crate's public surface: `read_line`,
//! `read_password`, `read_keyword`, `read_yes_no`.
//!
//! Tab completion races a cooperative cancellation signal
//! (`tokio::sync::watch::channel` + `tokio::select!`) against the next
//! keystroke, so a slow completer never blocks typing ahead of it.

use std::path::{Path, PathBuf};

use crossterm::event::KeyEvent;
use tokio::sync::watch;

use crate::clipboard::Clipboard;
use crate::command::Command;
use crate::completion::{Completer, CompletionResult};
use crate::editor::{Editor, Mode};
use crate::error::{EditorError, Result};
use crate::history;
use crate::keybindings::key_to_command;
use crate::render::{self, MaskStyle, RenderState};
use crate::styled_text::StyledText;
use crate::terminal::{CrosstermTerminal, TerminalService};

/// Observed by a [`Completer`] so it can return promptly once the input
/// loop has moved on to the next keystroke.
#[derive(Clone)]
pub struct AbortSignal(watch::Receiver<bool>);

impl AbortSignal {
    pub fn is_aborted(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolves once the loop has aborted this completion attempt.
    pub async fn aborted(&mut self) {
        let _ = self.0.changed().await;
    }
}

struct AbortHandle(watch::Sender<bool>);

impl AbortHandle {
    fn abort(&self) {
        let _ = self.0.send(true);
    }
}

fn abort_pair() -> (AbortHandle, AbortSignal) {
    let (tx, rx) = watch::channel(false);
    (AbortHandle(tx), AbortSignal(rx))
}

/// Result of racing the completer against the next keystroke.
enum Race {
    Completed(CompletionResult),
    KeyArrived(KeyEvent),
}

/// How a single command resolves the loop.
enum Flow {
    Continue(Editor),
    Accept(String),
    Interrupted,
}

fn apply_command(editor: Editor, clipboard: &mut Clipboard, command: Command) -> Flow {
    match command {
        Command::AcceptLine => Flow::Accept(editor.all_input()),
        Command::Break => Flow::Interrupted,
        other => Flow::Continue(crate::editor::update(editor, clipboard, &other)),
    }
}

/// Ensures the editor is in `Edition` mode (collapsing any selection first)
/// and returns the `(before, after)` split the completer operates on.
/// `Refresh` is an identity in both modes (it only ever triggers a redraw),
/// so driving it through `editor::update` collapses a selection without
/// otherwise touching the buffer.
fn edition_split(editor: &mut Editor) -> (String, String) {
    let placeholder = Editor::new(Vec::new());
    let taken = std::mem::replace(editor, placeholder);
    *editor = crate::editor::update(taken, &mut Clipboard::new(), &Command::Refresh);
    match &editor.mode {
        Mode::Edition { before, after } => (before.clone(), after.clone()),
        Mode::Selection { .. } => unreachable!("Refresh always collapses selection mode"),
    }
}

/// A line editor bound to one terminal and one persistent history/clipboard.
pub struct LineEditor<T: TerminalService = CrosstermTerminal> {
    terminal: T,
    clipboard: Clipboard,
    history: Vec<String>,
    history_path: Option<PathBuf>,
}

impl LineEditor<CrosstermTerminal> {
    pub fn new() -> Self {
        Self::with_terminal(CrosstermTerminal::new())
    }
}

impl Default for LineEditor<CrosstermTerminal> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TerminalService> LineEditor<T> {
    pub fn with_terminal(terminal: T) -> Self {
        Self {
            terminal,
            clipboard: Clipboard::new(),
            history: Vec::new(),
            history_path: None,
        }
    }

    /// Load history from `path` and persist future accepted lines there.
    pub fn with_history_file(mut self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        self.history = history::load_history(&path)?;
        self.history_path = Some(path);
        Ok(self)
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    fn flush(&self, ops: Vec<render::RenderOp>) -> Result<()> {
        for op in ops {
            match op {
                render::RenderOp::Rewind(n) => {
                    if n == 0 {
                        self.terminal.write("\r")?;
                    } else {
                        for _ in 0..n {
                            self.terminal.write("\r\x1b[1A")?;
                        }
                        self.terminal.write("\r")?;
                    }
                }
                render::RenderOp::Write(s) => self.terminal.write(&s)?,
            }
        }
        Ok(())
    }

    /// Non-tty fallback: write `prompt` with styles stripped, then read one
    /// plain line from stdin.
    async fn read_line_fallback(&self, prompt: &StyledText) -> Result<String> {
        if !self.terminal.is_tty() {
            self.terminal.write(&prompt.strip_styles())?;
            return read_stdin_line().await.map_err(EditorError::from);
        }
        unreachable!("fallback only taken when not a tty")
    }

    /// The shared input loop behind every public read operation.
    async fn run(
        &mut self,
        prompt: &StyledText,
        completer: Option<&dyn Completer>,
        mask: Option<MaskStyle>,
        use_history: bool,
    ) -> Result<String> {
        if !self.terminal.is_tty() {
            return self.read_line_fallback(prompt).await;
        }

        let _raw = self.terminal.enter_raw_mode()?;
        self.terminal.drain_pending()?;

        let seed = if use_history {
            self.history.iter().rev().cloned().collect::<Vec<_>>()
        } else {
            Vec::new()
        };
        let mut editor = Editor::new(seed);
        let mut state = RenderState::default();

        let initial = render::draw(prompt, &editor.mode, self.terminal.columns(), mask, state);
        self.flush(initial.ops)?;
        state = initial.new_state;

        loop {
            let key = self.terminal.read_key().await?;
            let command = key_to_command(key);

            match command {
                Command::Complete if completer.is_some() => {
                    let completer = completer.unwrap();
                    let (handle, signal) = abort_pair();
                    let (before, after) = edition_split(&mut editor);

                    let race = tokio::select! {
                        result = completer.complete(&before, &after, &signal) => Race::Completed(result),
                        next_key = self.terminal.read_key() => Race::KeyArrived(next_key?),
                    };

                    match race {
                        Race::Completed(CompletionResult::CompleteWith { before, after }) => {
                            editor.mode = Mode::Edition { before, after };
                        }
                        Race::Completed(CompletionResult::Possibilities(words)) => {
                            let layout = render::layout_words(self.terminal.columns(), &words);
                            self.terminal.write(&layout)?;
                            state = RenderState::default();
                        }
                        Race::Completed(CompletionResult::NoCompletion) => {}
                        Race::KeyArrived(next_key) => {
                            handle.abort();
                            match apply_command(editor, &mut self.clipboard, key_to_command(next_key)) {
                                Flow::Continue(next) => editor = next,
                                Flow::Accept(line) => {
                                    let final_mode = Mode::Edition {
                                        before: line.clone(),
                                        after: String::new(),
                                    };
                                    return self.finish(prompt, &final_mode, mask, state, use_history, line).await;
                                }
                                Flow::Interrupted => return Err(EditorError::Interrupt),
                            }
                        }
                    }
                }
                Command::Complete => {
                    // No completer configured: Tab is a no-op.
                }
                Command::ClearScreen => {
                    self.terminal.clear_screen()?;
                    state = RenderState::default();
                }
                other => match apply_command(editor, &mut self.clipboard, other) {
                    Flow::Continue(next) => editor = next,
                    Flow::Accept(line) => {
                        return self
                            .finish(
                                prompt,
                                &Mode::Edition {
                                    before: line.clone(),
                                    after: String::new(),
                                },
                                mask,
                                state,
                                use_history,
                                line,
                            )
                            .await;
                    }
                    Flow::Interrupted => return Err(EditorError::Interrupt),
                },
            }

            let redraw = render::draw(prompt, &editor.mode, self.terminal.columns(), mask, state);
            self.flush(redraw.ops)?;
            state = redraw.new_state;
        }
    }

    async fn finish(
        &mut self,
        prompt: &StyledText,
        mode: &Mode,
        mask: Option<MaskStyle>,
        state: RenderState,
        use_history: bool,
        line: String,
    ) -> Result<String> {
        let last = render::last_draw(prompt, mode, self.terminal.columns(), mask, state);
        self.flush(last.ops)?;

        if use_history && !line.is_empty() {
            self.history.push(line.clone());
            if let Some(path) = &self.history_path {
                history::save_history(path, &self.history)?;
            }
        }

        Ok(line)
    }

    /// Read one line with history recall and optional tab completion.
    pub async fn read_line(&mut self, prompt: &StyledText, completer: &dyn Completer) -> Result<String> {
        self.run(prompt, Some(completer), None, true).await
    }

    /// Read one line with history recall but no completion.
    pub async fn read_line_plain(&mut self, prompt: &StyledText) -> Result<String> {
        self.run(prompt, None, None, true).await
    }

    /// Read one line with the buffer masked as it's typed; never recorded
    /// to history, never completed. A masked password typed into a
    /// non-tty stream can't be honored, so this fails outright rather than
    /// falling back to a plain-text stdin read.
    pub async fn read_password(&mut self, prompt: &StyledText, mask: char) -> Result<String> {
        if !self.terminal.is_tty() {
            return Err(EditorError::NotATty);
        }
        self.run(prompt, None, Some(MaskStyle::Char(mask)), false).await
    }

    /// Read lines until the buffer matches one entry's text (by `case_sensitive`
    /// or case-insensitive comparison), returning its associated value. A
    /// mismatch on `Accept_line` doesn't re-prompt from scratch — it silently
    /// continues editing the same buffer. `Tab` completes the buffer against
    /// the keyword texts: if exactly one has the current input as a prefix,
    /// the buffer is replaced with it.
    pub async fn read_keyword<V: Clone>(
        &mut self,
        prompt: &StyledText,
        keywords: &[(String, V)],
        case_sensitive: bool,
    ) -> Result<V> {
        if !self.terminal.is_tty() {
            let line = self.read_line_fallback(prompt).await?;
            return lookup_keyword(keywords, &line, case_sensitive).ok_or(EditorError::InvalidInput(line));
        }

        let _raw = self.terminal.enter_raw_mode()?;
        self.terminal.drain_pending()?;

        let mut editor = Editor::new(Vec::new());
        let mut state = RenderState::default();

        let initial = render::draw(prompt, &editor.mode, self.terminal.columns(), None, state);
        self.flush(initial.ops)?;
        state = initial.new_state;

        loop {
            let key = self.terminal.read_key().await?;
            match key_to_command(key) {
                Command::Complete => {
                    let (before, after) = edition_split(&mut editor);
                    if let Some(word) = unique_prefix_match(keywords, &before, case_sensitive) {
                        editor.mode = Mode::Edition { before: word, after };
                    }
                }
                Command::ClearScreen => {
                    self.terminal.clear_screen()?;
                    state = RenderState::default();
                }
                Command::AcceptLine => {
                    let line = editor.all_input();
                    if let Some(value) = lookup_keyword(keywords, &line, case_sensitive) {
                        let final_mode = Mode::Edition { before: line, after: String::new() };
                        let last = render::last_draw(prompt, &final_mode, self.terminal.columns(), None, state);
                        self.flush(last.ops)?;
                        return Ok(value);
                    }
                    // No entry matches: silently continue editing this buffer.
                }
                Command::Break => return Err(EditorError::Interrupt),
                other => editor = crate::editor::update(editor, &mut self.clipboard, &other),
            }

            let redraw = render::draw(prompt, &editor.mode, self.terminal.columns(), None, state);
            self.flush(redraw.ops)?;
            state = redraw.new_state;
        }
    }

    /// A yes/no prompt: a thin wrapper over [`Self::read_keyword`] with the
    /// association list `[("yes", true), ("y", true), ("no", false), ("n", false)]`.
    pub async fn read_yes_no(&mut self, prompt: &StyledText) -> Result<bool> {
        let keywords = [
            ("yes".to_string(), true),
            ("y".to_string(), true),
            ("no".to_string(), false),
            ("n".to_string(), false),
        ];
        self.read_keyword(prompt, &keywords, false).await
    }
}

fn keyword_matches(value: &str, prefix: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        value.starts_with(prefix)
    } else {
        value.to_lowercase().starts_with(&prefix.to_lowercase())
    }
}

fn lookup_keyword<V: Clone>(keywords: &[(String, V)], line: &str, case_sensitive: bool) -> Option<V> {
    keywords
        .iter()
        .find(|(k, _)| {
            if case_sensitive {
                crate::text::eq_case_sensitive(k, line)
            } else {
                crate::text::eq_case_insensitive(k, line)
            }
        })
        .map(|(_, v)| v.clone())
}

/// The keyword text extending `prefix`, if exactly one keyword does.
fn unique_prefix_match<V>(keywords: &[(String, V)], prefix: &str, case_sensitive: bool) -> Option<String> {
    let mut matches = keywords.iter().filter(|(k, _)| keyword_matches(k, prefix, case_sensitive));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first.0.clone())
    }
}

async fn read_stdin_line() -> std::io::Result<String> {
    tokio::task::spawn_blocking(|| {
        let mut buf = String::new();
        std::io::stdin().read_line(&mut buf)?;
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        Ok(buf)
    })
    .await
    .unwrap_or_else(|join_err| Err(std::io::Error::new(std::io::ErrorKind::Other, join_err.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::WordListCompleter;
    use crate::terminal::FakeTerminal;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn char_key(c: char) -> KeyEvent {
        key(KeyCode::Char(c))
    }

    #[tokio::test]
    async fn plain_line_accept() {
        let keys = vec![char_key('h'), char_key('i'), key(KeyCode::Enter)];
        let terminal = FakeTerminal::new(keys);
        let mut editor = LineEditor::with_terminal(terminal);
        let result = editor.read_line_plain(&StyledText::from("> ")).await.unwrap();
        assert_eq!(result, "hi");
    }

    #[tokio::test]
    async fn accepted_line_is_recorded_to_history() {
        let keys = vec![char_key('h'), char_key('i'), key(KeyCode::Enter)];
        let terminal = FakeTerminal::new(keys);
        let mut editor = LineEditor::with_terminal(terminal);
        editor.read_line_plain(&StyledText::from("> ")).await.unwrap();
        assert_eq!(editor.history(), &["hi".to_string()]);
    }

    #[tokio::test]
    async fn history_previous_recalls_prior_line() {
        let terminal = FakeTerminal::new(vec![char_key('a'), key(KeyCode::Enter)]);
        let mut editor = LineEditor::with_terminal(terminal);
        editor.read_line_plain(&StyledText::from("> ")).await.unwrap();

        let terminal = FakeTerminal::new(vec![key(KeyCode::Up), key(KeyCode::Enter)]);
        editor.terminal = terminal;
        let result = editor.read_line_plain(&StyledText::from("> ")).await.unwrap();
        assert_eq!(result, "a");
    }

    #[tokio::test]
    async fn break_interrupts() {
        let terminal = FakeTerminal::new(vec![KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL)]);
        let mut editor = LineEditor::with_terminal(terminal);
        let result = editor.read_line_plain(&StyledText::from("> ")).await;
        assert!(matches!(result, Err(EditorError::Interrupt)));
    }

    #[tokio::test]
    async fn single_match_completion_then_accept() {
        let keys = vec![char_key('a'), char_key('p'), key(KeyCode::Tab), key(KeyCode::Enter)];
        let terminal = FakeTerminal::new(keys);
        let mut editor = LineEditor::with_terminal(terminal);
        let completer = WordListCompleter::new(vec!["apricot".to_string()]);
        let result = editor.read_line(&StyledText::from("> "), &completer).await.unwrap();
        assert_eq!(result, "apricot ");
    }

    #[tokio::test]
    async fn password_is_masked_and_not_recorded() {
        let keys = vec![char_key('s'), char_key('k'), key(KeyCode::Enter)];
        let terminal = FakeTerminal::new(keys);
        let mut editor = LineEditor::with_terminal(terminal);
        let result = editor.read_password(&StyledText::from("pw: "), '*').await.unwrap();
        assert_eq!(result, "sk");
        assert!(editor.history().is_empty());
    }

    #[tokio::test]
    async fn password_fails_outright_on_non_tty() {
        let mut terminal = FakeTerminal::new(vec![]);
        terminal.tty = false;
        let mut editor = LineEditor::with_terminal(terminal);
        let result = editor.read_password(&StyledText::from("pw: "), '*').await;
        assert!(matches!(result, Err(EditorError::NotATty)));
    }

    #[tokio::test]
    async fn yes_no_accepts_lowercase_y() {
        let terminal = FakeTerminal::new(vec![char_key('y'), key(KeyCode::Enter)]);
        let mut editor = LineEditor::with_terminal(terminal);
        let result = editor.read_yes_no(&StyledText::from("ok? ")).await.unwrap();
        assert!(result);
    }

    #[tokio::test]
    async fn yes_no_empty_line_does_not_match_and_keeps_editing() {
        // An empty `Accept_line` doesn't match any association, so editing
        // continues in place rather than falling back to a default.
        let keys = vec![key(KeyCode::Enter), char_key('n'), key(KeyCode::Enter)];
        let terminal = FakeTerminal::new(keys);
        let mut editor = LineEditor::with_terminal(terminal);
        let result = editor.read_yes_no(&StyledText::from("ok? ")).await.unwrap();
        assert!(!result);
    }

    #[tokio::test]
    async fn keyword_mismatch_continues_editing_the_same_buffer() {
        // "x" doesn't match; the buffer isn't reset, so the caller corrects
        // it with backspace before trying again, rather than the prompt
        // clearing itself and re-asking.
        let keys = vec![
            char_key('x'),
            key(KeyCode::Enter),
            key(KeyCode::Backspace),
            char_key('y'),
            key(KeyCode::Enter),
        ];
        let terminal = FakeTerminal::new(keys);
        let mut editor = LineEditor::with_terminal(terminal);
        let keywords = [("y".to_string(), 1), ("n".to_string(), 0)];
        let result = editor
            .read_keyword(&StyledText::from("? "), &keywords, false)
            .await
            .unwrap();
        assert_eq!(result, 1);
    }

    #[tokio::test]
    async fn keyword_tab_completes_unique_prefix() {
        let keys = vec![char_key('y'), key(KeyCode::Tab), key(KeyCode::Enter)];
        let terminal = FakeTerminal::new(keys);
        let mut editor = LineEditor::with_terminal(terminal);
        let keywords = [("yes".to_string(), true), ("no".to_string(), false)];
        let result = editor
            .read_keyword(&StyledText::from("? "), &keywords, false)
            .await
            .unwrap();
        assert!(result);
    }

    #[tokio::test]
    async fn keyword_case_insensitive_by_default() {
        let keys = vec![char_key('Y'), key(KeyCode::Enter)];
        let terminal = FakeTerminal::new(keys);
        let mut editor = LineEditor::with_terminal(terminal);
        let keywords = [("y".to_string(), true), ("n".to_string(), false)];
        let result = editor
            .read_keyword(&StyledText::from("? "), &keywords, false)
            .await
            .unwrap();
        assert!(result);
    }

    #[tokio::test]
    async fn keyword_case_sensitive_rejects_wrong_case() {
        // "Y" doesn't case-sensitively match "y"; correct it, then match.
        let keys = vec![
            char_key('Y'),
            key(KeyCode::Enter),
            key(KeyCode::Backspace),
            char_key('y'),
            key(KeyCode::Enter),
        ];
        let terminal = FakeTerminal::new(keys);
        let mut editor = LineEditor::with_terminal(terminal);
        let keywords = [("y".to_string(), true), ("n".to_string(), false)];
        let result = editor
            .read_keyword(&StyledText::from("? "), &keywords, true)
            .await
            .unwrap();
        assert!(result);
    }
}
