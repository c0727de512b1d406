//! Editing actions which can be mapped to key bindings.
//!
//! Executed by the edit engine's `update` function, except for the few
//! variants the input loop intercepts directly because they carry I/O or
//! control-flow effects (see `reader.rs`).

/// A closed set of editor commands. Unlisted keys map to [`Command::Nop`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Identity; no effect.
    Nop,
    /// Insert a single grapheme at the cursor.
    Char(String),
    BackwardDeleteChar,
    ForwardDeleteChar,
    BeginningOfLine,
    EndOfLine,
    Complete,
    KillLine,
    AcceptLine,
    /// Reserved: the edit engine has no effect for this command (see `editor.rs`).
    BackwardDeleteWord,
    /// Reserved: the edit engine has no effect for this command (see `editor.rs`).
    ForwardDeleteWord,
    HistoryNext,
    HistoryPrevious,
    Break,
    ClearScreen,
    /// Reserved: no engine effect in this crate.
    Insert,
    Refresh,
    BackwardChar,
    ForwardChar,
    SetMark,
    Yank,
    KillRingSave,
}
