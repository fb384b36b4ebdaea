//! Free-text date → `CanonicalDate`.
//!
//! The rules form a table tried top to bottom after the circa marker has
//! been stripped. The first rule whose regex matches decides the outcome:
//! if its builder rejects the values (31 February, year zero, a reversed
//! range) the whole string is unrecognized rather than retried further down.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};

use crate::date::{CanonicalDate, Era, RangeEnd};
use crate::error::{Error, Result};
use crate::patterns::{MONTH_NAMES, month_number};

type Build = fn(text: &str, caps: &Captures<'_>, circa: bool) -> Option<CanonicalDate>;

struct NormalizeRule {
    name: &'static str,
    regex: Regex,
    build: Build,
}

static CIRCA_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(?:(?i:circa|ca\.)|C\.|c\.?)\s*(\d.*)$").unwrap());

static FIRST_INT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

static RULES: LazyLock<Vec<NormalizeRule>> = LazyLock::new(|| {
    let months = MONTH_NAMES.join("|");
    vec![
        rule("bce", r"(?i)\b(?:BCE|BC)\b", |text, _, circa| {
            era_year(text, Era::Bce, circa)
        }),
        rule("ce", r"(?i)\b(?:CE|AD)\b", |text, _, circa| {
            era_year(text, Era::Ce, circa)
        }),
        rule("decade", r"^(\d{3}0)'?s$", |_, caps, circa| {
            Some(CanonicalDate::Decade {
                start_year: caps[1].parse().ok()?,
                circa,
            })
        }),
        rule(
            "long_month_first",
            &format!(r"(?i)^({months})\s+(\d{{1,2}})(?:st|nd|rd|th)?,?\s+(\d{{4}})$"),
            |_, caps, circa| {
                full_date(&caps[3], month_number(&caps[1])?, &caps[2], circa)
            },
        ),
        rule(
            "long_day_first",
            &format!(r"(?i)^(\d{{1,2}})(?:st|nd|rd|th)?\s+({months}),?\s+(\d{{4}})$"),
            |_, caps, circa| {
                full_date(&caps[3], month_number(&caps[2])?, &caps[1], circa)
            },
        ),
        // Month first. Day-first locales will be misread; there is no signal
        // in the text to tell them apart.
        rule("slash", r"^(\d{1,2})/(\d{1,2})/(\d{4})$", |_, caps, circa| {
            full_date(&caps[3], caps[1].parse().ok()?, &caps[2], circa)
        }),
        rule("iso", r"^(\d{4})-(\d{2})-(\d{2})$", |_, caps, circa| {
            full_date(&caps[1], caps[2].parse().ok()?, &caps[3], circa)
        }),
        rule(
            "range",
            r"(?i)^(\d{4})\s*[-–]\s*(\d{4}|present)$",
            |_, caps, _| {
                let start_year: i32 = caps[1].parse().ok()?;
                let end = if caps[2].eq_ignore_ascii_case("present") {
                    RangeEnd::Present
                } else {
                    let end: i32 = caps[2].parse().ok()?;
                    if end < start_year {
                        return None;
                    }
                    RangeEnd::Year(end)
                };
                Some(CanonicalDate::Range { start_year, end })
            },
        ),
        rule("year", r"^(\d{4})$", |_, caps, circa| {
            Some(CanonicalDate::YearOnly {
                year: caps[1].parse().ok()?,
                circa,
            })
        }),
    ]
});

fn rule(name: &'static str, re: &str, build: Build) -> NormalizeRule {
    NormalizeRule {
        name,
        regex: Regex::new(re).unwrap_or_else(|e| panic!("{name} rule: {e}")),
        build,
    }
}

/// Map a matched date string to its canonical shape.
pub fn normalize(raw: &str) -> Result<CanonicalDate> {
    let trimmed = raw.trim();
    let (circa, text) = match CIRCA_PREFIX.captures(trimmed) {
        Some(caps) => (true, caps.get(1).map_or(trimmed, |m| m.as_str())),
        None => (false, trimmed),
    };

    for rule in RULES.iter() {
        let Some(caps) = rule.regex.captures(text) else {
            continue;
        };
        return match (rule.build)(text, &caps, circa) {
            Some(date) => Ok(date),
            None => {
                tracing::trace!(raw, rule = rule.name, "date rule rejected values");
                Err(Error::UnrecognizedFormat(raw.to_string()))
            }
        };
    }

    Err(Error::UnrecognizedFormat(raw.to_string()))
}

fn era_year(text: &str, era: Era, circa: bool) -> Option<CanonicalDate> {
    let magnitude: u32 = FIRST_INT.find(text)?.as_str().parse().ok()?;
    (magnitude > 0 && i32::try_from(magnitude).is_ok()).then_some(CanonicalDate::EraYear {
        magnitude,
        era,
        circa,
    })
}

fn full_date(year: &str, month: u32, day: &str, circa: bool) -> Option<CanonicalDate> {
    let year: i32 = year.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)?;
    Some(CanonicalDate::FullDate {
        year,
        month,
        day,
        circa,
    })
}
