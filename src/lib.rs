//! caretline: a readline-like line editor.
//!
//! ```rust,no_run
//! use caretline::{LineEditor, NoCompletion, StyledText};
//!
//! # async fn run() -> caretline::Result<()> {
//! let mut editor = LineEditor::new().with_history_file("history.txt")?;
//! let line = editor.read_line(&StyledText::from("> "), &NoCompletion).await?;
//! println!("you typed: {line}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Tab completion
//!
//! ```rust,no_run
//! use caretline::{LineEditor, StyledText, WordListCompleter};
//!
//! # async fn run() -> caretline::Result<()> {
//! let mut editor = LineEditor::new();
//! let completer = WordListCompleter::new(vec!["help".into(), "quit".into()]);
//! let line = editor.read_line(&StyledText::from("> "), &completer).await?;
//! # let _ = line;
//! # Ok(())
//! # }
//! ```
//!
//! ## Passwords and yes/no prompts
//!
//! ```rust,no_run
//! use caretline::{LineEditor, StyledText};
//!
//! # async fn run() -> caretline::Result<()> {
//! let mut editor = LineEditor::new();
//! let password = editor.read_password(&StyledText::from("password: "), '*').await?;
//! let proceed = editor.read_yes_no(&StyledText::from("continue? [y/n] ")).await?;
//! # let _ = (password, proceed);
//! # Ok(())
//! # }
//! ```

mod clipboard;
mod command;
mod completion;
mod editor;
mod error;
mod history;
mod keybindings;
mod reader;
mod render;
mod styled_text;
mod terminal;
mod text;

pub use clipboard::Clipboard;
pub use command::Command;
pub use completion::{Completer, CompletionResult, NoCompletion, WordListCompleter};
pub use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
pub use error::{EditorError, Result};
pub use nu_ansi_term::Color;
pub use reader::{AbortSignal, LineEditor};
pub use render::MaskStyle;
pub use styled_text::{colored, Directive, StyledText};
pub use terminal::{CrosstermTerminal, FakeTerminal, RawModeGuard, TerminalService};

/// Free functions over grapheme-indexed text, exposed for crates building
/// their own [`Completer`]s or prompts.
pub mod text_util {
    pub use crate::text::{
        display_width, eq_case_insensitive, eq_case_sensitive, grapheme_at, grapheme_len,
        is_printable_grapheme, Pointer,
    };
}
