//! Tab completion: the pure `complete` helper (a byte-wise common-prefix
//! scan over a candidate list) plus the async `Completer` trait the input
//! loop races against keystrokes.

use async_trait::async_trait;

use crate::reader::AbortSignal;

/// Outcome of a completion attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionResult {
    NoCompletion,
    /// Replace the buffer split with `before`/`after`.
    CompleteWith { before: String, after: String },
    /// Ambiguous: the candidate words, sorted.
    Possibilities(Vec<String>),
}

/// Extend `word` as far as the common prefix of all matching `candidates`
/// allows, or report the ambiguity.
///
/// The common prefix is computed byte-wise, not grapheme-wise: callers are
/// expected to pass ASCII-safe candidate lists. A candidate list containing
/// multi-byte graphemes could produce a prefix that splits one mid-grapheme.
pub fn complete(before: &str, word: &str, after: &str, candidates: &[String]) -> CompletionResult {
    let mut matches: Vec<&str> = candidates
        .iter()
        .map(String::as_str)
        .filter(|c| c.starts_with(word))
        .collect();

    match matches.len() {
        0 => CompletionResult::NoCompletion,
        1 => CompletionResult::CompleteWith {
            before: format!("{before}{} ", matches[0]),
            after: after.to_string(),
        },
        _ => {
            let cp = common_prefix(&matches);
            if cp.len() > word.len() {
                CompletionResult::CompleteWith {
                    before: format!("{before}{cp}"),
                    after: after.to_string(),
                }
            } else {
                matches.sort_unstable();
                CompletionResult::Possibilities(matches.into_iter().map(String::from).collect())
            }
        }
    }
}

/// Longest common byte prefix of a non-empty slice of strings.
fn common_prefix(strings: &[&str]) -> String {
    let mut strings = strings.iter();
    let first = match strings.next() {
        Some(s) => s.as_bytes(),
        None => return String::new(),
    };

    let mut len = first.len();
    for s in strings {
        let bytes = s.as_bytes();
        len = bytes
            .iter()
            .zip(first.iter())
            .take(len)
            .take_while(|(a, b)| a == b)
            .count();
    }

    String::from_utf8_lossy(&first[..len]).into_owned()
}

/// Caller-supplied async completion source, raced against the next
/// keystroke by the input loop (see `reader.rs`).
#[async_trait]
pub trait Completer: Send + Sync {
    /// `before`/`after` is the current `Edition` split. The completer must
    /// observe `abort` cooperatively and return promptly once it fires;
    /// the input loop will discard the result either way.
    async fn complete(&self, before: &str, after: &str, abort: &AbortSignal) -> CompletionResult;
}

/// A completer with no candidates, for callers of `read_line` that want
/// history recall and editing but no tab completion.
pub struct NoCompletion;

#[async_trait]
impl Completer for NoCompletion {
    async fn complete(&self, _before: &str, _after: &str, _abort: &AbortSignal) -> CompletionResult {
        CompletionResult::NoCompletion
    }
}

/// Completes the last whitespace-delimited word of `before` against a fixed
/// word list. The common case for simple shells and prompts.
pub struct WordListCompleter {
    pub candidates: Vec<String>,
}

impl WordListCompleter {
    pub fn new(candidates: Vec<String>) -> Self {
        Self { candidates }
    }
}

#[async_trait]
impl Completer for WordListCompleter {
    async fn complete(&self, before: &str, after: &str, _abort: &AbortSignal) -> CompletionResult {
        let split_at = before.rfind(' ').map(|i| i + 1).unwrap_or(0);
        let (prefix, word) = before.split_at(split_at);
        complete(prefix, word, after, &self.candidates)
    }
}
