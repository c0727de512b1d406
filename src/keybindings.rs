//! The exact, closed key→command mapping: a single pure match function
//! since this mapping is fixed rather than user-extensible.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::command::Command;

/// Map one key event to a command. Unlisted keys map to [`Command::Nop`].
///
/// `C-n` is bound to `BackwardChar` and `C-p` to `ForwardChar` — the
/// opposite of GNU Readline convention. Kept as-is rather than silently
/// swapped, since a caller may already depend on it.
pub fn key_to_command(key: KeyEvent) -> Command {
    use KeyCode::*;

    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, Up) => Command::HistoryPrevious,
        (KeyModifiers::NONE, Down) => Command::HistoryNext,
        (KeyModifiers::NONE, Left) => Command::BackwardChar,
        (KeyModifiers::NONE, Right) => Command::ForwardChar,

        (KeyModifiers::NONE, Enter) => Command::AcceptLine,
        (KeyModifiers::NONE, Home) => Command::BeginningOfLine,
        (KeyModifiers::NONE, End) => Command::EndOfLine,
        (KeyModifiers::NONE, KeyCode::Insert) => Command::Insert,
        (KeyModifiers::NONE, Backspace) => Command::BackwardDeleteChar,
        (KeyModifiers::NONE, Delete) => Command::ForwardDeleteChar,
        (KeyModifiers::NONE, Tab) => Command::Complete,

        // C-@ : set mark. Terminals report this as a NUL char under control.
        (KeyModifiers::CONTROL, Char(' ')) | (KeyModifiers::CONTROL, Char('\0')) => {
            Command::SetMark
        }
        (KeyModifiers::CONTROL, Null) => Command::SetMark,
        (KeyModifiers::CONTROL, Char('a')) => Command::BeginningOfLine,
        (KeyModifiers::CONTROL, Char('d')) => Command::Break,
        (KeyModifiers::CONTROL, Char('e')) => Command::EndOfLine,
        (KeyModifiers::CONTROL, Char('i')) => Command::Complete,
        (KeyModifiers::CONTROL, Char('j')) => Command::AcceptLine,
        (KeyModifiers::CONTROL, Char('k')) => Command::KillLine,
        (KeyModifiers::CONTROL, Char('l')) => Command::ClearScreen,
        (KeyModifiers::CONTROL, Char('m')) => Command::AcceptLine,
        (KeyModifiers::CONTROL, Char('n')) => Command::BackwardChar,
        (KeyModifiers::CONTROL, Char('p')) => Command::ForwardChar,
        (KeyModifiers::CONTROL, Char('r')) => Command::Refresh,
        (KeyModifiers::CONTROL, Char('w')) => Command::KillRingSave,
        (KeyModifiers::CONTROL, Char('y')) => Command::Yank,
        (KeyModifiers::CONTROL, Char('?')) => Command::BackwardDeleteChar,

        (modifiers, Char(c))
            if modifiers & !KeyModifiers::SHIFT == KeyModifiers::NONE
                && crate::text::is_printable_grapheme(&c.to_string()) =>
        {
            Command::Char(c.to_string())
        }

        _ => Command::Nop,
    }
}
