//! Date-shaped text patterns, in priority order.
//!
//! More specific shapes come first so that, when two patterns fire at the
//! same offset, the full date wins over the bare year inside it. Anything
//! that still overlaps is cleaned up by the resolver.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::ExtractConfig;

/// English month names, lowercase, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Month number (1–12) for a case-insensitive English month name.
pub fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_ascii_lowercase();
    MONTH_NAMES
        .iter()
        .position(|m| *m == lower)
        .map(|i| i as u32 + 1)
}

// ── Pattern ids ──────────────────────────────────────────────────────

/// Which recognizer produced a match. Declaration order is priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PatternId {
    /// 2023-01-15
    Iso,
    /// January 15, 2023
    LongMonthFirst,
    /// 15 January 2023
    LongDayFirst,
    /// 1/15/2023 (month first)
    Slash,
    /// 1999-2005, 1999–present
    Range,
    /// c. 1200, circa 450 BC, ca. 1990s
    Circa,
    /// 450 BCE, 70 AD, AD 70
    Era,
    /// 1990s
    Decade,
    /// 1999
    BareYear,
}

impl PatternId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Iso => "iso",
            Self::LongMonthFirst => "long_month_first",
            Self::LongDayFirst => "long_day_first",
            Self::Slash => "slash",
            Self::Range => "range",
            Self::Circa => "circa",
            Self::Era => "era",
            Self::Decade => "decade",
            Self::BareYear => "bare_year",
        }
    }
}

// ── Pattern table ────────────────────────────────────────────────────

pub struct DatePattern {
    pub id: PatternId,
    pub regex: Regex,
}

static PATTERNS: LazyLock<Vec<DatePattern>> = LazyLock::new(|| {
    let months = MONTH_NAMES.join("|");
    let table: Vec<(PatternId, String)> = vec![
        (PatternId::Iso, r"\b\d{4}-\d{2}-\d{2}\b".to_string()),
        (
            PatternId::LongMonthFirst,
            format!(r"(?i)\b(?:{months})\s+\d{{1,2}}(?:st|nd|rd|th)?,?\s+\d{{4}}\b"),
        ),
        (
            PatternId::LongDayFirst,
            format!(r"(?i)\b\d{{1,2}}(?:st|nd|rd|th)?\s+(?:{months}),?\s+\d{{4}}\b"),
        ),
        (PatternId::Slash, r"\b\d{1,2}/\d{1,2}/\d{4}\b".to_string()),
        (
            PatternId::Range,
            r"(?i)\b\d{4}\s*[-–]\s*(?:\d{4}|present)\b".to_string(),
        ),
        // An upper-case "C" needs its dot: "Appendix C 1999" is not approximate.
        (
            PatternId::Circa,
            r"\b(?:(?i:circa|ca\.)|C\.|c\.?)\s*(?:\d{1,4}\s*(?i:BCE|BC|CE|AD)\b|\d{3}0'?s\b|\d{4}\b)"
                .to_string(),
        ),
        // The prefix form is case-sensitive: a lowercase "ad 12" is far more
        // likely to be noise than an era.
        (
            PatternId::Era,
            r"(?i:\b\d{1,4}\s*(?:BCE|BC|CE|AD)\b)|\bAD\s+\d{1,4}\b".to_string(),
        ),
        (PatternId::Decade, r"\b\d{3}0'?s\b".to_string()),
        (PatternId::BareYear, r"\b\d{4}\b".to_string()),
    ];

    table
        .into_iter()
        .map(|(id, re)| DatePattern {
            id,
            regex: Regex::new(&re).unwrap_or_else(|e| panic!("{} regex: {e}", id.as_str())),
        })
        .collect()
});

// ── Library ──────────────────────────────────────────────────────────

/// The pattern table plus the plausible range for bare years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternLibrary {
    year_min: i32,
    year_max: i32,
}

impl Default for PatternLibrary {
    fn default() -> Self {
        let c = ExtractConfig::default();
        PatternLibrary::new(c.year_min, c.year_max)
    }
}

impl PatternLibrary {
    pub fn new(year_min: i32, year_max: i32) -> Self {
        PatternLibrary { year_min, year_max }
    }

    pub fn from_config(config: &ExtractConfig) -> Self {
        PatternLibrary::new(config.year_min, config.year_max)
    }

    /// All recognizers, highest priority first.
    pub fn patterns(&self) -> &'static [DatePattern] {
        &PATTERNS
    }

    pub fn is_plausible_year(&self, year: i32) -> bool {
        (self.year_min..=self.year_max).contains(&year)
    }

    /// Post-filter for things the regex engine cannot express: bare years
    /// must be in range and must not be a fragment of a decimal or
    /// thousands-separated number ("3.1415", "12,1999").
    pub fn admits(&self, id: PatternId, text: &str, start: usize, end: usize) -> bool {
        if id != PatternId::BareYear {
            return true;
        }
        let Ok(year) = text[start..end].parse::<i32>() else {
            return false;
        };
        self.is_plausible_year(year) && !is_embedded_in_number(text, start, end)
    }
}

/// True when `text[start..end]` is glued to more digits by `.` or `,`.
fn is_embedded_in_number(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].as_bytes();
    let after = text[end..].as_bytes();
    let glued_before = matches!(before, [.., d, b'.' | b','] if d.is_ascii_digit());
    let glued_after = matches!(after, [b'.' | b',', d, ..] if d.is_ascii_digit());
    glued_before || glued_after
}
