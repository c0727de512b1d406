//! A single-entry kill ring shared, by reference, across `read_line` calls
//! unless the caller passes its own.

/// Kill ring of depth one: `Command::KillRingSave` writes it,
/// `Command::Yank` reads it. Nothing else touches it.
#[derive(Debug, Default, Clone)]
pub struct Clipboard {
    content: String,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, content: &str) {
        self.content = content.to_owned();
    }

    pub fn get(&self) -> &str {
        &self.content
    }
}
