//! Context extraction around a matched date.
//!
//! Offsets coming in are byte offsets; lengths and limits in
//! `ContextConfig` are counted in characters. Out-of-range or mid-character
//! offsets are clamped and snapped rather than rejected.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::{ContextConfig, ContextStrategy};
use crate::types::ContextSpan;

const TERMINATORS: [char; 3] = ['.', '!', '?'];

/// A blank line (possibly holding stray spaces).
static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t\r]*\n").expect("paragraph regex"));

/// A blank line, or a line opening with a bullet / heading marker.
static BLOCK_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n[ \t\r]*\n|\n[ \t]*(?:[*#•]+|-)[ \t]").expect("block regex")
});

/// Cut the text that best explains `text[start..end]`.
pub fn extract_context(text: &str, start: usize, end: usize, config: &ContextConfig) -> ContextSpan {
    let start = floor_boundary(text, start.min(text.len()));
    let end = ceil_boundary(text, end.clamp(start, text.len()));

    match config.strategy {
        ContextStrategy::Sentence => sentence_context(text, start, end, config),
        ContextStrategy::MarkupWindow => markup_context(text, start, end, config),
    }
}

// ── Sentence strategy ────────────────────────────────────────────────

fn sentence_context(text: &str, start: usize, end: usize, config: &ContextConfig) -> ContextSpan {
    let (para_lo, para_hi) = paragraph_bounds(text, start, end);

    // A sentence never runs across a blank line.
    let lo = text[..start]
        .char_indices()
        .rev()
        .find(|&(i, c)| ends_sentence(text, i, c))
        .map_or(0, |(i, _)| i + 1)
        .max(para_lo);
    let hi = text[end..]
        .char_indices()
        .find(|&(i, c)| ends_sentence(text, end + i, c))
        .map_or(text.len(), |(i, _)| end + i + 1)
        .min(para_hi);

    let sentence = collapse_whitespace(&text[lo..hi], false);
    let sentence_len = sentence.chars().count();

    if sentence_len < config.min_sentence_chars {
        let paragraph = collapse_whitespace(&text[para_lo..para_hi], false);
        if paragraph.chars().count() > sentence_len {
            return ContextSpan {
                text: paragraph,
                start: para_lo,
                end: para_hi,
            };
        }
    }

    ContextSpan {
        text: sentence,
        start: lo,
        end: hi,
    }
}

/// Whether `c` at byte `i` ends a sentence. The dot of a circa marker
/// ("c. 1200", "ca. 1350") does not.
fn ends_sentence(text: &str, i: usize, c: char) -> bool {
    if !TERMINATORS.contains(&c) {
        return false;
    }
    if c != '.' {
        return true;
    }
    let word = text[..i]
        .rsplit(|ch: char| !ch.is_alphabetic())
        .next()
        .unwrap_or("");
    !(word.eq_ignore_ascii_case("c") || word.eq_ignore_ascii_case("ca"))
}

/// Byte bounds of the paragraph holding `start..end`.
fn paragraph_bounds(text: &str, start: usize, end: usize) -> (usize, usize) {
    let lo = PARAGRAPH_BREAK
        .find_iter(&text[..start])
        .last()
        .map_or(0, |m| m.end());
    let hi = PARAGRAPH_BREAK
        .find(&text[end..])
        .map_or(text.len(), |m| end + m.start());
    (lo, hi)
}

// ── Markup window strategy ───────────────────────────────────────────

fn markup_context(text: &str, start: usize, end: usize, config: &ContextConfig) -> ContextSpan {
    let window = config.window_chars;
    let mut lo = block_start(text, chars_back(text, start, window), start, false);
    let mut hi = block_end(text, end, chars_forward(text, end, window), false);

    if text[lo..hi].chars().count() < config.min_span_chars {
        if lo > 0 {
            lo = block_start(text, chars_back(text, lo, window), lo, true);
        }
        if hi < text.len() {
            hi = block_end(text, hi, chars_forward(text, hi, window), true);
        }
    }

    let (lo, hi) = cap_span(text, lo, hi, start, end, config.max_span_chars);
    ContextSpan {
        text: collapse_whitespace(&text[lo..hi], true),
        start: lo,
        end: hi,
    }
}

/// Start of the block containing byte `at`, searching no further back than
/// `floor`. With `skip_adjacent`, a break ending exactly at `at` is ignored so
/// the previous block is pulled in.
fn block_start(text: &str, floor: usize, at: usize, skip_adjacent: bool) -> usize {
    let slice = &text[floor..at];
    BLOCK_BREAK
        .find_iter(slice)
        .filter(|m| !skip_adjacent || m.end() < slice.len())
        .last()
        .map_or(floor, |m| floor + m.end())
}

/// End of the block containing byte `at`, searching no further than `ceil`.
fn block_end(text: &str, at: usize, ceil: usize, skip_adjacent: bool) -> usize {
    let slice = &text[at..ceil];
    BLOCK_BREAK
        .find_iter(slice)
        .find(|m| !skip_adjacent || m.start() > 0)
        .map_or(ceil, |m| at + m.start())
}

/// Shrink `lo..hi` to at most `max_chars` characters, keeping the match and
/// splitting the remaining budget evenly around it. A match longer than the
/// cap is itself cut to its first `max_chars` characters.
fn cap_span(
    text: &str,
    lo: usize,
    hi: usize,
    start: usize,
    end: usize,
    max_chars: usize,
) -> (usize, usize) {
    if text[lo..hi].chars().count() <= max_chars {
        return (lo, hi);
    }
    let match_chars = text[start..end].chars().count();
    if match_chars >= max_chars {
        return (start, chars_forward(text, start, max_chars));
    }
    let budget = max_chars - match_chars;
    let room_before = text[lo..start].chars().count();
    let room_after = text[end..hi].chars().count();

    let after = room_after.min(budget - budget / 2);
    let before = room_before.min(budget - after);
    let after = room_after.min(budget - before);

    (chars_back(text, start, before), chars_forward(text, end, after))
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Byte index `n` characters before `idx` (or 0).
pub(crate) fn chars_back(text: &str, idx: usize, n: usize) -> usize {
    if n == 0 {
        return idx;
    }
    text[..idx]
        .char_indices()
        .rev()
        .nth(n - 1)
        .map_or(0, |(i, _)| i)
}

/// Byte index `n` characters after `idx` (or the end of the text).
pub(crate) fn chars_forward(text: &str, idx: usize, n: usize) -> usize {
    text[idx..]
        .char_indices()
        .nth(n)
        .map_or(text.len(), |(i, _)| idx + i)
}

fn floor_boundary(text: &str, mut i: usize) -> usize {
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_boundary(text: &str, mut i: usize) -> usize {
    while !text.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// Trim, and squeeze every whitespace run to one space. With
/// `keep_newlines`, a run containing a newline becomes a single `\n`.
pub fn collapse_whitespace(s: &str, keep_newlines: bool) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending: Option<char> = None;
    for c in s.chars() {
        if c.is_whitespace() {
            let sep = if keep_newlines && c == '\n' { '\n' } else { ' ' };
            pending = match pending {
                Some('\n') => Some('\n'),
                _ => Some(sep),
            };
        } else {
            if let Some(sep) = pending.take() {
                if !out.is_empty() {
                    out.push(sep);
                }
            }
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence_cfg() -> ContextConfig {
        ContextConfig::default()
    }

    fn markup_cfg() -> ContextConfig {
        ContextConfig {
            strategy: ContextStrategy::MarkupWindow,
            ..ContextConfig::default()
        }
    }

    fn around(text: &str, needle: &str, cfg: &ContextConfig) -> ContextSpan {
        let start = text.find(needle).unwrap();
        extract_context(text, start, start + needle.len(), cfg)
    }

    // ── collapse_whitespace ──────────────────────────────────────────

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \t b\n\n c  ", false), "a b c");
        assert_eq!(collapse_whitespace("a \n\n  b c", true), "a\nb c");
        assert_eq!(collapse_whitespace("   ", true), "");
    }

    // ── sentence strategy ────────────────────────────────────────────

    #[test]
    fn test_sentence_full_sentence_returned() {
        let ctx = around("On 2023-01-15, it happened.", "2023-01-15", &sentence_cfg());
        assert_eq!(ctx.text, "On 2023-01-15, it happened.");
        assert_eq!((ctx.start, ctx.end), (0, 27));
    }

    #[test]
    fn test_sentence_bounded_by_terminators() {
        let text = "Rome was founded long ago. In 1999 the committee of the city voted \
                    to restore the old forum entirely! Nobody objected?";
        let ctx = around(text, "1999", &sentence_cfg());
        assert_eq!(
            ctx.text,
            "In 1999 the committee of the city voted to restore the old forum entirely!"
        );
    }

    #[test]
    fn test_sentence_circa_reaches_forward_terminator() {
        let ctx = around("Built c. 1200, the castle...", "c. 1200", &sentence_cfg());
        assert!(ctx.text.contains("castle"));
        assert!(ctx.text.starts_with("Built c. 1200"));
    }

    #[test]
    fn test_circa_dot_does_not_end_sentence() {
        let text = "Rome c. 1200 was rebuilt; later in 1350 it was sacked by raiders from the north.";
        let ctx = around(text, "1350", &sentence_cfg());
        assert_eq!(ctx.text, text);

        let text = "Some say the city fell in 1350, others say ca. 1360, to the northern raiders. Peace followed.";
        let ctx = around(text, "1350", &sentence_cfg());
        assert!(ctx.text.ends_with("to the northern raiders."), "{}", ctx.text);
        assert!(!ctx.text.contains("Peace"));
    }

    #[test]
    fn test_short_sentence_widens_to_paragraph() {
        let text = "Intro paragraph.\n\nShort one. It fell in 1453. The walls were breached \
                    after a long siege by a much larger army.\n\nUnrelated closing paragraph.";
        let ctx = around(text, "1453", &sentence_cfg());
        assert!(ctx.text.starts_with("Short one. It fell in 1453."));
        assert!(ctx.text.ends_with("much larger army."));
        assert!(!ctx.text.contains("Intro"));
        assert!(!ctx.text.contains("Unrelated"));
    }

    #[test]
    fn test_sentence_does_not_cross_blank_line() {
        let text = "History\n\nThe harbour was dredged and expanded to twice its size in 1888 by the port authority.";
        let ctx = around(text, "1888", &sentence_cfg());
        assert!(ctx.text.starts_with("The harbour"));
    }

    #[test]
    fn test_whitespace_collapsed() {
        let ctx = around("It   was\tin\n1999   exactly.", "1999", &sentence_cfg());
        assert_eq!(ctx.text, "It was in 1999 exactly.");
    }

    #[test]
    fn test_bad_offsets_do_not_panic() {
        let text = "Café in 1999.";
        let cfg = sentence_cfg();
        // 4 is inside 'é'
        let ctx = extract_context(text, 4, 4, &cfg);
        assert_eq!(ctx.text, "Café in 1999.");
        let ctx = extract_context(text, 500, 900, &cfg);
        assert_eq!(ctx.text, "Café in 1999.");
        let ctx = extract_context("", 0, 0, &markup_cfg());
        assert_eq!(ctx.text, "");
    }

    // ── markup window strategy ───────────────────────────────────────

    #[test]
    fn test_markup_stops_at_bullets() {
        let text = format!(
            "== Events ==\n* {}\n* In 1815 the congress closed and {}\n* {}",
            "p".repeat(250),
            "b".repeat(250),
            "z".repeat(250)
        );
        let ctx = around(&text, "1815", &markup_cfg());
        assert!(ctx.text.starts_with("In 1815 the congress"));
        assert!(ctx.text.ends_with('b'));
        assert!(!ctx.text.contains("ppp"));
        assert!(!ctx.text.contains("zzz"));
    }

    #[test]
    fn test_markup_short_block_pulls_neighbours() {
        let text = format!(
            "{}\n\nFounded 1905.\n\n{}\n\nFar away paragraph.",
            "Before text here. ".repeat(5),
            "After text here. ".repeat(5)
        );
        let ctx = around(&text, "1905", &markup_cfg());
        assert!(ctx.text.contains("Before text here."));
        assert!(ctx.text.contains("After text here."));
        assert!(!ctx.text.contains("Far away"));
    }

    #[test]
    fn test_markup_capped_and_centred() {
        let text = format!("{} 1776 {}", "x".repeat(2000), "y".repeat(2000));
        let cfg = markup_cfg();
        let ctx = around(&text, "1776", &cfg);
        assert!(ctx.text.chars().count() <= cfg.max_span_chars);
        assert!(ctx.text.contains("1776"));
        let xs = ctx.text.chars().filter(|&c| c == 'x').count();
        let ys = ctx.text.chars().filter(|&c| c == 'y').count();
        assert!(xs.abs_diff(ys) <= 1, "xs={xs} ys={ys}");
    }

    #[test]
    fn test_markup_cap_gives_spare_budget_to_other_side() {
        let text = format!("In 1776 {}", "y".repeat(2000));
        let cfg = markup_cfg();
        let ctx = around(&text, "1776", &cfg);
        assert!(ctx.text.starts_with("In 1776"));
        assert_eq!(ctx.text.chars().count(), cfg.max_span_chars);
    }

    #[test]
    fn test_markup_cap_holds_for_oversized_match() {
        let text = "z".repeat(1000);
        let cfg = markup_cfg();
        let ctx = extract_context(&text, 0, text.len(), &cfg);
        assert_eq!(ctx.text.chars().count(), cfg.max_span_chars);
        assert_eq!((ctx.start, ctx.end), (0, cfg.max_span_chars));
    }

    #[test]
    fn test_markup_keeps_single_newline_marker() {
        let text = "Line one about 1650\nline two continues\n\n\nnext block";
        let ctx = around(text, "1650", &markup_cfg());
        assert!(ctx.text.contains("1650\nline two"));
    }
}
