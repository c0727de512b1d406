//! Grapheme-aware text helpers: free functions over `&str` rather than a
//! wrapper type, built directly on `unicode-segmentation`.
//!
//! A [`Pointer`] is a byte offset that is guaranteed (by construction, via
//! the functions below) to land on a grapheme-cluster boundary within the
//! `&str` it was produced from. Pointers from different strings must not be
//! mixed.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

pub type Pointer = usize;

/// Number of grapheme clusters in `s`.
pub fn grapheme_len(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Terminal column width of `s` (wide CJK graphemes count as 2). Distinct
/// from `grapheme_len`: cursor arithmetic is grapheme-indexed, but the
/// renderer's row/height math must track actual columns occupied.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// The left (start) pointer of `s`.
pub fn left(_s: &str) -> Pointer {
    0
}

/// The right (end) pointer of `s`.
pub fn right(s: &str) -> Pointer {
    s.len()
}

/// The pointer that sits `n` graphemes from the left.
pub fn pointer_at_offset(s: &str, n: usize) -> Pointer {
    s.grapheme_indices(true)
        .nth(n)
        .map(|(i, _)| i)
        .unwrap_or_else(|| s.len())
}

/// Move a pointer one grapheme forward, or `None` at the right endpoint.
pub fn next_pointer(s: &str, p: Pointer) -> Option<Pointer> {
    if p >= s.len() {
        return None;
    }
    s[p..]
        .grapheme_indices(true)
        .nth(1)
        .map(|(i, _)| p + i)
        .or(Some(s.len()))
}

/// Move a pointer one grapheme backward, or `None` at the left endpoint.
pub fn prev_pointer(s: &str, p: Pointer) -> Option<Pointer> {
    if p == 0 {
        return None;
    }
    s[..p].grapheme_indices(true).last().map(|(i, _)| i)
}

/// The substring between two pointers (`from` must be <= `to`).
pub fn slice(s: &str, from: Pointer, to: Pointer) -> &str {
    &s[from..to]
}

/// The grapheme at a signed index; negative counts from the end.
pub fn grapheme_at(s: &str, index: isize) -> Option<&str> {
    if index >= 0 {
        s.graphemes(true).nth(index as usize)
    } else {
        let n = grapheme_len(s);
        let i = n as isize + index;
        if i < 0 {
            None
        } else {
            s.graphemes(true).nth(i as usize)
        }
    }
}

/// Remove the last grapheme of `s`, if any.
pub fn rchop(s: &str) -> String {
    match prev_pointer(s, s.len()) {
        Some(p) => s[..p].to_string(),
        None => String::new(),
    }
}

/// Remove the first grapheme of `s`, if any.
pub fn lchop(s: &str) -> String {
    match next_pointer(s, 0) {
        Some(p) => s[p..].to_string(),
        None => String::new(),
    }
}

/// Whether `s` starts with `prefix`.
pub fn starts_with(s: &str, prefix: &str) -> bool {
    s.starts_with(prefix)
}

/// Whether a single grapheme is printable (not a control character).
pub fn is_printable_grapheme(g: &str) -> bool {
    g.chars().all(|c| !c.is_control())
}

/// Case-sensitive equality.
pub fn eq_case_sensitive(a: &str, b: &str) -> bool {
    a == b
}

/// Case-insensitive equality (Unicode case folding, not just ASCII).
pub fn eq_case_insensitive(a: &str, b: &str) -> bool {
    unicase::eq(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grapheme_len_counts_clusters_not_bytes() {
        assert_eq!(grapheme_len("héllo"), 5);
        assert_eq!(grapheme_len(""), 0);
    }

    #[test]
    fn chop_on_empty_is_identity() {
        assert_eq!(rchop(""), "");
        assert_eq!(lchop(""), "");
    }

    #[test]
    fn pointer_roundtrip() {
        let s = "abc";
        let p0 = left(s);
        let p1 = next_pointer(s, p0).unwrap();
        let p2 = next_pointer(s, p1).unwrap();
        assert_eq!(slice(s, p0, p1), "a");
        assert_eq!(slice(s, p1, p2), "b");
        assert_eq!(prev_pointer(s, p2), Some(p1));
        assert_eq!(prev_pointer(s, p0), None);
        assert_eq!(next_pointer(s, right(s)), None);
    }

    #[test]
    fn grapheme_at_negative_index() {
        assert_eq!(grapheme_at("abc", -1), Some("c"));
        assert_eq!(grapheme_at("abc", 0), Some("a"));
        assert_eq!(grapheme_at("abc", -10), None);
    }

    #[test]
    fn case_insensitive_compare() {
        assert!(eq_case_insensitive("YES", "yes"));
        assert!(!eq_case_sensitive("YES", "yes"));
    }

    #[test]
    fn display_width_counts_wide_graphemes_as_two_columns() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("你好"), 4);
    }
}
