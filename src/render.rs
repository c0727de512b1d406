//! Diffed redraw of prompt + buffer on a wrapping terminal: a
//! rewind-then-redraw algorithm over terminal-column height, including the
//! password `map_text` hook and the newline-before-caret glitch fix.
//!
//! Everything here is synchronous and pure: it turns `(prompt, engine mode,
//! columns, mask, previous render state)` into a list of [`RenderOp`]s plus
//! the next [`RenderState`]. Actually writing those ops to a terminal is the
//! input loop's job (`reader.rs`), since writing suspends and this module
//! must not.

use unicode_segmentation::UnicodeSegmentation;

use crate::editor::Mode;
use crate::styled_text::{Directive, StyledText};
use crate::text;

/// Cached metrics of the last drawn frame, enabling a correct rewind before
/// the next draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderState {
    pub length: usize,
    pub height_before: usize,
}

/// How user text is masked before display. Applied to buffer text only,
/// never to the prompt.
#[derive(Debug, Clone, Copy)]
pub enum MaskStyle {
    /// Replace every grapheme with a fixed mask character.
    Char(char),
    /// No masking.
    Clear,
    /// Replace every grapheme with nothing.
    Empty,
}

/// One terminal write/movement to perform, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOp {
    /// Move to column 0, `n` rows up (`n == 0` is a plain carriage return).
    Rewind(usize),
    /// Write this string verbatim (already ANSI-encoded where styled).
    Write(String),
}

/// The result of preparing one redraw: the ops to perform, and the render
/// state that will be true once they have been performed.
#[derive(Debug, Clone)]
pub struct Draw {
    pub ops: Vec<RenderOp>,
    pub new_state: RenderState,
}

/// `height = 0` if `n == 0`, else `(n - 1) / columns`.
pub fn height(columns: usize, n: usize) -> usize {
    if n == 0 {
        0
    } else {
        (n - 1) / columns.max(1)
    }
}

/// Replace every embedded newline with enough spaces to pad to the end of
/// the current (logical, `columns`-wide) row, threading a running column
/// counter (display width, not grapheme count — a wide CJK grapheme still
/// occupies two columns) through the transform.
pub fn prepare_for_display(text: &StyledText, columns: usize) -> StyledText {
    let columns = columns.max(1);
    let mut out = StyledText::new();
    let mut col = 0usize;
    for directive in &text.0 {
        match directive {
            Directive::Text(s) => {
                let mut buf = String::new();
                for g in s.graphemes(true) {
                    if g == "\n" {
                        let pad = columns - (col % columns);
                        buf.push_str(&" ".repeat(pad));
                        col += pad;
                    } else {
                        buf.push_str(g);
                        col += text::display_width(g).max(1);
                    }
                }
                out.text(buf);
            }
            other => {
                out.push(other.clone());
            }
        }
    }
    out
}

fn selected_range(mark: text::Pointer, cursor: text::Pointer) -> (text::Pointer, text::Pointer) {
    if mark <= cursor {
        (mark, cursor)
    } else {
        (cursor, mark)
    }
}

/// Split the engine mode into `(before_styled, after_styled)` with the
/// selection (if any) underlined. The caret position is always the split
/// point: a selection extending right of the caret attaches to the "after"
/// side, one extending left attaches to "before".
fn styled_split(mode: &Mode) -> (StyledText, StyledText) {
    match mode {
        Mode::Edition { before, after } => (StyledText::from(before.as_str()), StyledText::from(after.as_str())),
        Mode::Selection { text, mark, cursor } => {
            let (lo, hi) = selected_range(*mark, *cursor);
            let mut before_styled = StyledText::new();
            let mut after_styled = StyledText::new();
            if cursor < mark {
                before_styled.text(&text[..*cursor]);
                after_styled
                    .push(Directive::Underlined)
                    .text(&text[*cursor..hi])
                    .push(Directive::Reset)
                    .text(&text[hi..]);
            } else {
                before_styled
                    .text(&text[..lo])
                    .push(Directive::Underlined)
                    .text(&text[lo..*cursor])
                    .push(Directive::Reset);
                after_styled.text(&text[*cursor..]);
            }
            (before_styled, after_styled)
        }
    }
}

fn mask_grapheme(style: MaskStyle, g: &str) -> String {
    match style {
        MaskStyle::Char(c) => c.to_string(),
        MaskStyle::Clear => g.to_string(),
        MaskStyle::Empty => String::new(),
    }
}

/// Apply a mask style to plain text, one substitution per grapheme.
pub fn map_text(style: MaskStyle, s: &str) -> String {
    s.graphemes(true).map(|g| mask_grapheme(style, g)).collect()
}

fn mask_pointer(style: MaskStyle, s: &str, pointer: text::Pointer) -> text::Pointer {
    let grapheme_index = s[..pointer].graphemes(true).count();
    match style {
        MaskStyle::Char(c) => grapheme_index * c.len_utf8(),
        MaskStyle::Clear => pointer,
        MaskStyle::Empty => 0,
    }
}

fn masked_mode(mode: &Mode, style: MaskStyle) -> Mode {
    match mode {
        Mode::Edition { before, after } => Mode::Edition {
            before: map_text(style, before),
            after: map_text(style, after),
        },
        Mode::Selection { text, mark, cursor } => Mode::Selection {
            text: map_text(style, text),
            mark: mask_pointer(style, text, *mark),
            cursor: mask_pointer(style, text, *cursor),
        },
    }
}

fn ends_in_newline_before_caret(mode: &Mode) -> bool {
    match mode {
        Mode::Edition { before, .. } => before.ends_with('\n'),
        Mode::Selection { text, cursor, .. } => match text::prev_pointer(text, *cursor) {
            Some(p) => &text[p..*cursor] == "\n",
            None => false,
        },
    }
}

fn wrap(prompt: &StyledText, body: StyledText) -> StyledText {
    let mut out = StyledText::new();
    out.extend(prompt.clone());
    out.push(Directive::Reset);
    out.extend(body);
    out
}

/// A single atomic redraw step.
pub fn draw(
    prompt: &StyledText,
    mode: &Mode,
    columns: usize,
    mask: Option<MaskStyle>,
    old_state: RenderState,
) -> Draw {
    let effective_mode = match mask {
        Some(style) => masked_mode(mode, style),
        None => mode.clone(),
    };

    let (before_styled, after_styled) = styled_split(&effective_mode);

    let printed_before = prepare_for_display(&wrap(prompt, before_styled.clone()), columns);
    let mut total_body = before_styled;
    total_body.extend(after_styled);
    let printed_total = prepare_for_display(&wrap(prompt, total_body), columns);

    let height_before = height(columns, printed_before.display_width());
    let length = printed_total.display_width();

    let mut printed_total_erase = printed_total.clone();
    let erase_count = old_state.length.saturating_sub(length);
    if erase_count > 0 {
        printed_total_erase.text(" ".repeat(erase_count));
    }

    let mut ops = vec![
        RenderOp::Rewind(old_state.height_before),
        RenderOp::Write(printed_total_erase.to_ansi()),
        RenderOp::Rewind(height(columns, printed_total_erase.display_width())),
        RenderOp::Write(printed_before.to_ansi()),
    ];

    let mut height_before_reported = height_before;
    if ends_in_newline_before_caret(&effective_mode) {
        ops.push(RenderOp::Write("\n".to_string()));
        height_before_reported += 1;
    }

    Draw {
        ops,
        new_state: RenderState {
            length,
            height_before: height_before_reported,
        },
    }
}

/// The final draw on accept/break: rewind, print the whole buffer, newline.
/// No further editing occurs after this.
pub fn last_draw(
    prompt: &StyledText,
    mode: &Mode,
    columns: usize,
    mask: Option<MaskStyle>,
    old_state: RenderState,
) -> Draw {
    let all_input = match mode {
        Mode::Edition { before, after } => format!("{before}{after}"),
        Mode::Selection { text, .. } => text.clone(),
    };
    let masked = match mask {
        Some(style) => map_text(style, &all_input),
        None => all_input,
    };
    let mut body = StyledText::new();
    body.text(masked);
    let printed = prepare_for_display(&wrap(prompt, body), columns);

    Draw {
        ops: vec![
            RenderOp::Rewind(old_state.height_before),
            RenderOp::Write(printed.to_ansi()),
            RenderOp::Write("\n".to_string()),
        ],
        new_state: RenderState::default(),
    }
}

/// Column layout for tab-completion candidates.
pub fn layout_words(columns: usize, words: &[String]) -> String {
    if words.is_empty() {
        return String::new();
    }
    let longest = words.iter().map(|w| text::display_width(w)).max().unwrap_or(0);
    let width = (1 + longest).max(1);
    let per_row = (columns / width).max(1);
    let column_width = (columns / per_row).max(1);

    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        let pad = column_width.saturating_sub(text::display_width(word));
        out.push_str(word);
        out.push_str(&" ".repeat(pad));
        if (i + 1) % per_row == 0 {
            out.push('\n');
        }
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_formula() {
        assert_eq!(height(10, 0), 0);
        assert_eq!(height(10, 1), 0);
        assert_eq!(height(10, 10), 0);
        assert_eq!(height(10, 11), 1);
        assert_eq!(height(10, 21), 2);
    }

    #[test]
    fn prepare_for_display_pads_newline_to_row_end() {
        let mut st = StyledText::new();
        st.text("ab\ncd");
        let prepared = prepare_for_display(&st, 5);
        // "ab" then 3 spaces (pad to column 5) then "cd"
        assert_eq!(prepared.strip_styles(), "ab   cd");
    }

    #[test]
    fn draw_is_idempotent_without_input() {
        let prompt = StyledText::from("> ");
        let mode = Mode::Edition {
            before: "ab".into(),
            after: "cd".into(),
        };
        let first = draw(&prompt, &mode, 80, None, RenderState::default());
        let second = draw(&prompt, &mode, 80, None, first.new_state);
        assert_eq!(first.new_state, second.new_state);
    }

    #[test]
    fn password_masking_hides_user_text_not_prompt() {
        let prompt = StyledText::from("pw: ");
        let mode = Mode::Edition {
            before: "secret".into(),
            after: "".into(),
        };
        let result = draw(
            &prompt,
            &mode,
            80,
            Some(MaskStyle::Char('*')),
            RenderState::default(),
        );
        let rendered: String = result
            .ops
            .iter()
            .map(|op| match op {
                RenderOp::Write(s) => s.clone(),
                RenderOp::Rewind(_) => String::new(),
            })
            .collect();
        assert!(rendered.contains("pw: "));
        assert!(rendered.contains("******"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn selection_attaches_to_side_away_from_mark() {
        let mode = Mode::Selection {
            text: "hello".into(),
            mark: 0,
            cursor: 3,
        };
        let (before, after) = styled_split(&mode);
        // cursor(3) > mark(0): selection attaches to the "before" side.
        assert_eq!(before.strip_styles(), "hel");
        assert_eq!(after.strip_styles(), "lo");
        assert!(before.0.contains(&Directive::Underlined));
    }

    #[test]
    fn layout_words_wraps_to_column_count() {
        let words: Vec<String> = vec!["a".into(), "bb".into(), "ccc".into()];
        let out = layout_words(10, &words);
        assert!(out.ends_with('\n'));
        assert!(out.contains('a'));
        assert!(out.contains("ccc"));
    }
}
