//! A finite sequence of style directives + text fragments, the abstraction
//! the renderer composes and the terminal writer understands. The directive
//! alphabet is `{Reset, Bold, Underlined, Text(s)}`.

use nu_ansi_term::{Color, Style};

/// One element of a styled-text sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Reset,
    Bold,
    Underlined,
    Text(String),
}

/// A styled-text value: a sequence of directives, applied left to right.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledText(pub Vec<Directive>);

impl StyledText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, directive: Directive) -> &mut Self {
        self.0.push(directive);
        self
    }

    pub fn text(&mut self, s: impl Into<String>) -> &mut Self {
        self.push(Directive::Text(s.into()))
    }

    pub fn extend(&mut self, other: StyledText) -> &mut Self {
        self.0.extend(other.0);
        self
    }

    /// Total terminal column width of the plain text content. Used for the
    /// renderer's wrap/height math, which cares about columns occupied, not
    /// grapheme count (a wide CJK grapheme occupies two columns).
    pub fn display_width(&self) -> usize {
        self.0
            .iter()
            .map(|d| match d {
                Directive::Text(s) => crate::text::display_width(&strip_ansi(s)),
                _ => 0,
            })
            .sum()
    }

    /// Render to a string of ANSI escape sequences understood by a terminal.
    pub fn to_ansi(&self) -> String {
        let mut out = String::new();
        let mut style = Style::new();
        for directive in &self.0 {
            match directive {
                Directive::Reset => style = Style::new(),
                Directive::Bold => style = style.bold(),
                Directive::Underlined => style = style.underline(),
                Directive::Text(s) => out.push_str(&style.paint(s).to_string()),
            }
        }
        out
    }

    /// Flatten to plain text, dropping all styling. Used for non-tty prompts.
    pub fn strip_styles(&self) -> String {
        let mut out = String::new();
        for directive in &self.0 {
            if let Directive::Text(s) = directive {
                out.push_str(s);
            }
        }
        out
    }
}

/// Strip raw ANSI escapes from a (possibly pre-colored) text fragment
/// before measuring it. A no-op (and infallible) for plain text.
fn strip_ansi(s: &str) -> std::borrow::Cow<'_, str> {
    let bytes = strip_ansi_escapes::strip(s);
    std::borrow::Cow::Owned(String::from_utf8_lossy(&bytes).into_owned())
}

impl From<&str> for StyledText {
    fn from(s: &str) -> Self {
        let mut st = StyledText::new();
        st.text(s);
        st
    }
}

impl From<String> for StyledText {
    fn from(s: String) -> Self {
        let mut st = StyledText::new();
        st.text(s);
        st
    }
}

/// A prompt is free to precompute ANSI-colored text fragments and hand them
/// in as `Directive::Text`; this helper is exposed for demos only (a
/// foreground-color directive isn't part of the directive alphabet above).
pub fn colored(color: Color, s: impl Into<String>) -> StyledText {
    let mut st = StyledText::new();
    st.0.push(Directive::Text(color.paint(s.into()).to_string()));
    st
}
