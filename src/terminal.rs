//! The terminal boundary: reading keys, writing styled output, raw-mode
//! scoping, and the tty check that decides whether a caller even gets an
//! interactive read.
//!
//! Everything goes through the [`TerminalService`] trait so the input loop
//! (`reader.rs`) can be driven by a scripted [`FakeTerminal`] in tests
//! instead of a real tty.

use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use async_trait::async_trait;
use crossterm::event::{self, Event, KeyEvent};
use crossterm::terminal as crossterm_terminal;

/// Releases raw mode when dropped, however the scope that acquired it exits
/// (normal return, `?`, or panic unwind).
pub struct RawModeGuard {
    active: bool,
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.active {
            let _ = crossterm_terminal::disable_raw_mode();
        }
    }
}

/// Everything the input loop needs from a terminal, abstracted so it can be
/// swapped for a deterministic test double.
#[async_trait]
pub trait TerminalService: Send + Sync {
    /// Block until one key event is available. Suspends, and is the future
    /// the input loop races against completer work.
    async fn read_key(&self) -> io::Result<KeyEvent>;

    /// Write raw (already ANSI-encoded where needed) bytes and flush.
    fn write(&self, s: &str) -> io::Result<()>;

    /// Clear the whole screen and scrollback, for `Command::ClearScreen`.
    fn clear_screen(&self) -> io::Result<()>;

    /// Current terminal width in columns, or a sane fallback if unknown.
    fn columns(&self) -> usize;

    /// Whether both stdin and stdout are connected to a real terminal.
    /// `read_line` and friends fall back to a line-oriented read when false.
    fn is_tty(&self) -> bool;

    /// Enter raw mode for the scope of the returned guard.
    fn enter_raw_mode(&self) -> io::Result<RawModeGuard>;

    /// Discard any already-queued input events without blocking. Used
    /// before the first prompt draw so keys typed ahead of a previous
    /// `read_line`'s completion or history browsing don't leak into this one.
    fn drain_pending(&self) -> io::Result<()>;
}

/// The real terminal, backed by `crossterm`.
pub struct CrosstermTerminal;

impl CrosstermTerminal {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CrosstermTerminal {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TerminalService for CrosstermTerminal {
    async fn read_key(&self) -> io::Result<KeyEvent> {
        // crossterm's blocking poll/read pair, run off the async executor's
        // worker pool so it doesn't block other tasks (the completer race).
        tokio::task::spawn_blocking(|| loop {
            if event::poll(Duration::from_millis(1000))? {
                if let Event::Key(key) = event::read()? {
                    return Ok(key);
                }
                // Resize, mouse, focus, paste: not a command, keep waiting.
            }
        })
        .await
        .unwrap_or_else(|join_err| {
            Err(io::Error::new(io::ErrorKind::Other, join_err.to_string()))
        })
    }

    fn write(&self, s: &str) -> io::Result<()> {
        let mut stdout = io::stdout();
        stdout.write_all(s.as_bytes())?;
        stdout.flush()
    }

    fn clear_screen(&self) -> io::Result<()> {
        crossterm::execute!(
            io::stdout(),
            crossterm_terminal::Clear(crossterm_terminal::ClearType::All),
            crossterm_terminal::Clear(crossterm_terminal::ClearType::Purge),
            crossterm::cursor::MoveTo(0, 0),
        )
    }

    fn columns(&self) -> usize {
        crossterm_terminal::size().map(|(cols, _)| cols as usize).unwrap_or(80)
    }

    fn is_tty(&self) -> bool {
        io::stdin().is_terminal() && io::stdout().is_terminal()
    }

    fn enter_raw_mode(&self) -> io::Result<RawModeGuard> {
        crossterm_terminal::enable_raw_mode()?;
        Ok(RawModeGuard { active: true })
    }

    fn drain_pending(&self) -> io::Result<()> {
        while event::poll(Duration::from_millis(0))? {
            event::read()?;
        }
        Ok(())
    }
}

/// A scripted terminal for deterministic tests: replays a fixed key
/// sequence and records every write.
pub struct FakeTerminal {
    keys: std::sync::Mutex<std::collections::VecDeque<KeyEvent>>,
    pub written: std::sync::Mutex<Vec<String>>,
    pub columns_value: usize,
    pub tty: bool,
}

impl FakeTerminal {
    pub fn new(keys: Vec<KeyEvent>) -> Self {
        Self {
            keys: std::sync::Mutex::new(keys.into()),
            written: std::sync::Mutex::new(Vec::new()),
            columns_value: 80,
            tty: true,
        }
    }

    pub fn written_text(&self) -> String {
        self.written.lock().unwrap().join("")
    }
}

#[async_trait]
impl TerminalService for FakeTerminal {
    async fn read_key(&self) -> io::Result<KeyEvent> {
        // A real key read always suspends at least once; yielding here keeps
        // races against a non-suspending `Completer` deterministic instead of
        // depending on `tokio::select!`'s tie-break when two branches are
        // simultaneously ready on the same poll.
        tokio::task::yield_now().await;
        self.keys
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more scripted keys"))
    }

    fn write(&self, s: &str) -> io::Result<()> {
        self.written.lock().unwrap().push(s.to_string());
        Ok(())
    }

    fn clear_screen(&self) -> io::Result<()> {
        self.written.lock().unwrap().push("<clear>".to_string());
        Ok(())
    }

    fn columns(&self) -> usize {
        self.columns_value
    }

    fn is_tty(&self) -> bool {
        self.tty
    }

    fn enter_raw_mode(&self) -> io::Result<RawModeGuard> {
        Ok(RawModeGuard { active: false })
    }

    fn drain_pending(&self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn fake_terminal_replays_keys_in_order() {
        let term = FakeTerminal::new(vec![key('a'), key('b')]);
        assert_eq!(term.read_key().await.unwrap().code, KeyCode::Char('a'));
        assert_eq!(term.read_key().await.unwrap().code, KeyCode::Char('b'));
        assert!(term.read_key().await.is_err());
    }

    #[tokio::test]
    async fn fake_terminal_records_writes() {
        let term = FakeTerminal::new(vec![]);
        term.write("hello").unwrap();
        term.write(" world").unwrap();
        assert_eq!(term.written_text(), "hello world");
    }

    #[test]
    fn raw_mode_guard_no_op_when_inactive() {
        let guard = RawModeGuard { active: false };
        drop(guard);
    }
}
