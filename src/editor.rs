//! The pure edit engine: `update(state, clipboard, command) -> state`.
//!
//! Tracks buffer state as an `Edition`/`Selection` union over grapheme
//! positions, plus a bidirectional history zipper. This module performs no
//! I/O; everything here is synchronous and side-effect-free except through
//! the explicit `clipboard` parameter.

use crate::clipboard::Clipboard;
use crate::command::Command;
use crate::text::{self, Pointer};

/// Which half of the state machine we're in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Cursor sits at the boundary between `before` and `after`.
    Edition { before: String, after: String },
    /// An active region `[min(mark, cursor), max(mark, cursor))` within `text`.
    Selection {
        text: String,
        mark: Pointer,
        cursor: Pointer,
    },
}

impl Mode {
    fn edition(before: impl Into<String>, after: impl Into<String>) -> Self {
        Mode::Edition {
            before: before.into(),
            after: after.into(),
        }
    }
}

/// Engine state: the current edit/selection mode plus the history zipper.
///
/// `past.last()` (if any) is the most recent prior line; `future.last()`
/// (if any) is what the user navigated away from most recently. Lines are
/// pushed/popped from the back so `Vec` doubles as a stack without shifting.
#[derive(Clone, Debug, PartialEq)]
pub struct Editor {
    pub mode: Mode,
    past: Vec<String>,
    future: Vec<String>,
}

impl Editor {
    /// Fresh engine state for a `read_line` call: empty buffer, history
    /// supplied most-recent-first as the caller observes it via `History_previous`.
    pub fn new(history: impl IntoIterator<Item = String>) -> Self {
        let mut past: Vec<String> = history.into_iter().collect();
        // `past.last()` must be the *most recent* entry, so the caller's
        // most-recent-first ordering is reversed onto the stack.
        past.reverse();
        Editor {
            mode: Mode::edition("", ""),
            past,
            future: Vec::new(),
        }
    }

    /// The full logical buffer, regardless of mode.
    pub fn all_input(&self) -> String {
        match &self.mode {
            Mode::Edition { before, after } => format!("{before}{after}"),
            Mode::Selection { text, .. } => text.clone(),
        }
    }

    /// Leave selection mode, placing the cursor where the caret was and
    /// preserving the entire text verbatim.
    fn reset(self) -> Editor {
        match self.mode {
            Mode::Selection { text, cursor, .. } => {
                let before = text::slice(&text, text::left(&text), cursor).to_string();
                let after = text::slice(&text, cursor, text::right(&text)).to_string();
                Editor {
                    mode: Mode::edition(before, after),
                    past: self.past,
                    future: self.future,
                }
            }
            Mode::Edition { .. } => self,
        }
    }
}

/// Apply one command to the engine state. Never performs I/O; the
/// `clipboard` slot is the only externally observable side effect
/// (`KillRingSave` writes it, `Yank` reads it).
pub fn update(editor: Editor, clipboard: &mut Clipboard, command: &Command) -> Editor {
    match &editor.mode {
        Mode::Selection { .. } => update_selection(editor, clipboard, command),
        Mode::Edition { .. } => update_edition(editor, clipboard, command),
    }
}

fn update_selection(editor: Editor, clipboard: &mut Clipboard, command: &Command) -> Editor {
    let Mode::Selection { text, mark, cursor } = editor.mode.clone() else {
        unreachable!()
    };

    match command {
        Command::Nop => editor,
        Command::ForwardChar => {
            let cursor = text::next_pointer(&text, cursor).unwrap_or(cursor);
            Editor {
                mode: Mode::Selection { text, mark, cursor },
                ..editor
            }
        }
        Command::BackwardChar => {
            let cursor = text::prev_pointer(&text, cursor).unwrap_or(cursor);
            Editor {
                mode: Mode::Selection { text, mark, cursor },
                ..editor
            }
        }
        Command::BeginningOfLine => {
            let cursor = text::left(&text);
            Editor {
                mode: Mode::Selection { text, mark, cursor },
                ..editor
            }
        }
        Command::EndOfLine => {
            let cursor = text::right(&text);
            Editor {
                mode: Mode::Selection { text, mark, cursor },
                ..editor
            }
        }
        Command::KillRingSave => {
            let (lo, hi) = selected_range(mark, cursor);
            clipboard.set(text::slice(&text, lo, hi));
            let before = text::slice(&text, text::left(&text), lo).to_string();
            let after = text::slice(&text, hi, text::right(&text)).to_string();
            Editor {
                mode: Mode::edition(before, after),
                past: editor.past,
                future: editor.future,
            }
        }
        other => update_edition(
            Editor {
                mode: Mode::Selection { text, mark, cursor },
                ..editor
            }
            .reset(),
            clipboard,
            other,
        ),
    }
}

fn update_edition(editor: Editor, clipboard: &mut Clipboard, command: &Command) -> Editor {
    let Mode::Edition { before, after } = editor.mode.clone() else {
        unreachable!()
    };

    match command {
        Command::Char(g) => Editor {
            mode: Mode::edition(format!("{before}{g}"), after),
            ..editor
        },
        Command::SetMark => {
            let text = format!("{before}{after}");
            let cursor = before.len();
            Editor {
                mode: Mode::Selection {
                    text,
                    mark: cursor,
                    cursor,
                },
                ..editor
            }
        }
        Command::Yank => Editor {
            mode: Mode::edition(format!("{before}{}", clipboard.get()), after),
            ..editor
        },
        Command::BackwardDeleteChar => Editor {
            mode: Mode::edition(text::rchop(&before), after),
            ..editor
        },
        Command::ForwardDeleteChar => Editor {
            mode: Mode::edition(before, text::lchop(&after)),
            ..editor
        },
        Command::BeginningOfLine => Editor {
            mode: Mode::edition("", format!("{before}{after}")),
            ..editor
        },
        Command::EndOfLine => Editor {
            mode: Mode::edition(format!("{before}{after}"), ""),
            ..editor
        },
        Command::KillLine => Editor {
            mode: Mode::edition(before, ""),
            ..editor
        },
        Command::HistoryPrevious => {
            let mut past = editor.past;
            match past.pop() {
                Some(line) => {
                    let mut future = editor.future;
                    future.push(format!("{before}{after}"));
                    Editor {
                        mode: Mode::edition(line, ""),
                        past,
                        future,
                    }
                }
                None => Editor {
                    mode: Mode::edition(before, after),
                    past,
                    future: editor.future,
                },
            }
        }
        Command::HistoryNext => {
            let mut future = editor.future;
            match future.pop() {
                Some(line) => {
                    let mut past = editor.past;
                    past.push(format!("{before}{after}"));
                    Editor {
                        mode: Mode::edition(line, ""),
                        past,
                        future,
                    }
                }
                None => Editor {
                    mode: Mode::edition(before, after),
                    past: editor.past,
                    future,
                },
            }
        }
        Command::BackwardChar => {
            if before.is_empty() {
                Editor {
                    mode: Mode::edition(before, after),
                    ..editor
                }
            } else {
                let moved = text::grapheme_at(&before, -1).unwrap_or("").to_string();
                let new_before = text::rchop(&before);
                Editor {
                    mode: Mode::edition(new_before, format!("{moved}{after}")),
                    ..editor
                }
            }
        }
        Command::ForwardChar => {
            if after.is_empty() {
                Editor {
                    mode: Mode::edition(before, after),
                    ..editor
                }
            } else {
                let moved = text::grapheme_at(&after, 0).unwrap_or("").to_string();
                let new_after = text::lchop(&after);
                Editor {
                    mode: Mode::edition(format!("{before}{moved}"), new_after),
                    ..editor
                }
            }
        }
        // `Nop`, `Insert`, `BackwardDeleteWord`, `ForwardDeleteWord`, and
        // anything the input loop intercepts before it reaches here
        // (`Complete`, `AcceptLine`, `Break`, `ClearScreen`, `Refresh`) are
        // identities at this layer.
        _ => Editor {
            mode: Mode::edition(before, after),
            ..editor
        },
    }
}

fn selected_range(mark: Pointer, cursor: Pointer) -> (Pointer, Pointer) {
    if mark <= cursor {
        (mark, cursor)
    } else {
        (cursor, mark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edition(before: &str, after: &str) -> Editor {
        Editor {
            mode: Mode::edition(before, after),
            past: Vec::new(),
            future: Vec::new(),
        }
    }

    #[test]
    fn identity_on_nop() {
        let mut clip = Clipboard::new();
        let s = edition("ab", "cd");
        let s2 = update(s.clone(), &mut clip, &Command::Nop);
        assert_eq!(s, s2);
    }

    #[test]
    fn char_insertion_is_local() {
        let mut clip = Clipboard::new();
        let s = edition("ab", "cd");
        let s = update(s, &mut clip, &Command::Char("X".into()));
        assert_eq!(s.all_input(), "abXcd");
        assert_eq!(s.mode, Mode::edition("abX", "cd"));
    }

    #[test]
    fn beginning_and_end_of_line_preserve_all_input() {
        let mut clip = Clipboard::new();
        let s = edition("ab", "cd");
        let start = update(s.clone(), &mut clip, &Command::BeginningOfLine);
        assert_eq!(start.mode, Mode::edition("", "abcd"));
        let end = update(s, &mut clip, &Command::EndOfLine);
        assert_eq!(end.mode, Mode::edition("abcd", ""));
    }

    #[test]
    fn backspace_at_home_and_delete_at_end_are_identities() {
        let mut clip = Clipboard::new();
        let s = edition("", "");
        assert_eq!(
            update(s.clone(), &mut clip, &Command::BackwardDeleteChar),
            s
        );
        assert_eq!(update(s.clone(), &mut clip, &Command::ForwardDeleteChar), s);
    }

    #[test]
    fn history_previous_then_next_restores_state() {
        let mut clip = Clipboard::new();
        let s = Editor {
            mode: Mode::edition("cur", "sor"),
            past: vec!["older".to_string(), "prev".to_string()],
            future: Vec::new(),
        };
        let back = update(s.clone(), &mut clip, &Command::HistoryPrevious);
        assert_eq!(back.mode, Mode::edition("prev", ""));
        let forward = update(back, &mut clip, &Command::HistoryNext);
        assert_eq!(forward.mode, s.mode);
    }

    #[test]
    fn selection_cut_and_yank_roundtrip() {
        let mut clip = Clipboard::new();
        let s = edition("b", "0123");
        let s = update(s, &mut clip, &Command::SetMark);
        // Advance 2 graphemes forward before marking the selection.
        let s = update(s, &mut clip, &Command::ForwardChar);
        let s = update(s, &mut clip, &Command::ForwardChar);
        let s = update(s, &mut clip, &Command::KillRingSave);
        assert_eq!(s.mode, Mode::edition("b", "23"));
        assert_eq!(clip.get(), "01");

        let s = update(s, &mut clip, &Command::Yank);
        assert_eq!(s.all_input(), "b0123");
    }

    #[test]
    fn reset_is_idempotent_on_edition() {
        let s = edition("ab", "cd");
        let s2 = s.clone().reset();
        assert_eq!(s, s2);
    }

    #[test]
    fn selection_other_command_resets_then_applies() {
        let mut clip = Clipboard::new();
        let s = edition("ab", "cd");
        let s = update(s, &mut clip, &Command::SetMark);
        // cursor==mark==2 here; typing a char should reset to Edition("ab","cd")
        // then insert, landing the char right at the caret.
        let s = update(s, &mut clip, &Command::Char("X".into()));
        assert_eq!(s.mode, Mode::edition("abX", "cd"));
    }

    #[test]
    fn insert_command_is_reserved_no_op() {
        let mut clip = Clipboard::new();
        let s = edition("ab", "cd");
        assert_eq!(update(s.clone(), &mut clip, &Command::Insert), s);
    }
}
