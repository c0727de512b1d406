//! Error type for every fallible operation this crate exposes.

use thiserror::Error;

/// Everything that can go wrong driving the input loop.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The user broke out of the read (`C-d` on an empty line, `C-c`).
    #[error("interrupted")]
    Interrupt,

    /// `stdin`/`stdout` is not a terminal and no fallback was possible.
    #[error("not a terminal")]
    NotATty,

    /// A non-tty fallback read produced input the caller's validator or
    /// parser rejected (e.g. `read_keyword` got a word outside its list).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Any underlying I/O failure (terminal write, history file access).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EditorError>;
