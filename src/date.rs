//! Canonical date values and their string form.
//!
//! The string form is what downstream consumers see, so `Display` and
//! `FromStr` must stay exact inverses for every value `normalize` can
//! produce.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Era {
    Bce,
    Ce,
}

impl Era {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bce => "BCE",
            Self::Ce => "CE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeEnd {
    Year(i32),
    Present,
}

/// A recognized date, reduced to one comparable shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalDate {
    FullDate {
        year: i32,
        month: u32,
        day: u32,
        circa: bool,
    },
    YearOnly {
        year: i32,
        circa: bool,
    },
    /// `start_year` is a multiple of 10.
    Decade {
        start_year: i32,
        circa: bool,
    },
    /// `magnitude` is in `1..=i32::MAX`; the era carries the sign.
    EraYear {
        magnitude: u32,
        era: Era,
        circa: bool,
    },
    Range {
        start_year: i32,
        end: RangeEnd,
    },
}

/// (signed year, month, day); month and day are 0 when unknown.
pub type SortKey = (i32, u32, u32);

impl CanonicalDate {
    pub fn sort_key(&self) -> SortKey {
        match *self {
            Self::FullDate {
                year, month, day, ..
            } => (year, month, day),
            Self::YearOnly { year, .. } => (year, 0, 0),
            Self::Decade { start_year, .. } => (start_year, 0, 0),
            Self::EraYear { magnitude, era, .. } => {
                let year = i32::try_from(magnitude).unwrap_or(i32::MAX);
                match era {
                    Era::Bce => (-year, 0, 0),
                    Era::Ce => (year, 0, 0),
                }
            }
            Self::Range { start_year, .. } => (start_year, 0, 0),
        }
    }

    pub fn is_circa(&self) -> bool {
        match *self {
            Self::FullDate { circa, .. }
            | Self::YearOnly { circa, .. }
            | Self::Decade { circa, .. }
            | Self::EraYear { circa, .. } => circa,
            Self::Range { .. } => false,
        }
    }

    /// The canonical string used as the map key.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CanonicalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_circa() {
            f.write_str("c. ")?;
        }
        match *self {
            Self::FullDate {
                year, month, day, ..
            } => write!(f, "{year:04}-{month:02}-{day:02}"),
            Self::YearOnly { year, .. } => write!(f, "{year:04}"),
            Self::Decade { start_year, .. } => write!(f, "{start_year:04}s"),
            Self::EraYear { magnitude, era, .. } => write!(f, "{magnitude} {}", era.as_str()),
            Self::Range {
                start_year,
                end: RangeEnd::Year(end),
            } => write!(f, "{start_year:04}-{end:04}"),
            Self::Range {
                start_year,
                end: RangeEnd::Present,
            } => write!(f, "{start_year:04}-present"),
        }
    }
}

/// Parses the canonical string form only, not free text (see `normalize`).
impl FromStr for CanonicalDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unrecognized = || Error::UnrecognizedFormat(s.to_string());
        let (circa, body) = match s.strip_prefix("c. ") {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        if let Some(mag) = body.strip_suffix(" BCE") {
            return era_year(mag, Era::Bce, circa).ok_or_else(unrecognized);
        }
        if let Some(mag) = body.strip_suffix(" CE") {
            return era_year(mag, Era::Ce, circa).ok_or_else(unrecognized);
        }

        let parts: Vec<&str> = body.split('-').collect();
        let date = match parts.as_slice() {
            [y] => match y.strip_suffix('s') {
                Some(d) if is_digits(d, 4) && d.ends_with('0') => Self::Decade {
                    start_year: d.parse().map_err(|_| unrecognized())?,
                    circa,
                },
                Some(_) => return Err(unrecognized()),
                None if is_digits(y, 4) => Self::YearOnly {
                    year: y.parse().map_err(|_| unrecognized())?,
                    circa,
                },
                None => return Err(unrecognized()),
            },
            [y, "present"] if !circa && is_digits(y, 4) => Self::Range {
                start_year: y.parse().map_err(|_| unrecognized())?,
                end: RangeEnd::Present,
            },
            [y, e] if !circa && is_digits(y, 4) && is_digits(e, 4) => Self::Range {
                start_year: y.parse().map_err(|_| unrecognized())?,
                end: RangeEnd::Year(e.parse().map_err(|_| unrecognized())?),
            },
            [y, m, d] if is_digits(y, 4) && is_digits(m, 2) && is_digits(d, 2) => {
                let month: u32 = m.parse().map_err(|_| unrecognized())?;
                let day: u32 = d.parse().map_err(|_| unrecognized())?;
                if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
                    return Err(unrecognized());
                }
                Self::FullDate {
                    year: y.parse().map_err(|_| unrecognized())?,
                    month,
                    day,
                    circa,
                }
            }
            _ => return Err(unrecognized()),
        };
        Ok(date)
    }
}

fn era_year(magnitude: &str, era: Era, circa: bool) -> Option<CanonicalDate> {
    if magnitude.is_empty() || !magnitude.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let magnitude: u32 = magnitude.parse().ok()?;
    (magnitude > 0 && i32::try_from(magnitude).is_ok()).then_some(CanonicalDate::EraYear {
        magnitude,
        era,
        circa,
    })
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> CanonicalDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_display_forms() {
        let cases = [
            (
                CanonicalDate::FullDate {
                    year: 2023,
                    month: 1,
                    day: 5,
                    circa: false,
                },
                "2023-01-05",
            ),
            (CanonicalDate::YearOnly { year: 1999, circa: false }, "1999"),
            (CanonicalDate::Decade { start_year: 1990, circa: false }, "1990s"),
            (
                CanonicalDate::EraYear {
                    magnitude: 450,
                    era: Era::Bce,
                    circa: true,
                },
                "c. 450 BCE",
            ),
            (
                CanonicalDate::EraYear {
                    magnitude: 70,
                    era: Era::Ce,
                    circa: false,
                },
                "70 CE",
            ),
            (
                CanonicalDate::Range {
                    start_year: 1999,
                    end: RangeEnd::Year(2005),
                },
                "1999-2005",
            ),
            (
                CanonicalDate::Range {
                    start_year: 2010,
                    end: RangeEnd::Present,
                },
                "2010-present",
            ),
            (CanonicalDate::YearOnly { year: 1200, circa: true }, "c. 1200"),
        ];
        for (date, expected) in cases {
            assert_eq!(date.to_string(), expected);
            assert_eq!(parse(expected), date, "parsing {expected}");
        }
    }

    #[test]
    fn test_sort_key_bce_is_negative() {
        assert_eq!(parse("450 BCE").sort_key(), (-450, 0, 0));
        assert_eq!(parse("c. 100 BCE").sort_key(), (-100, 0, 0));
        assert_eq!(parse("70 CE").sort_key(), (70, 0, 0));
        assert_eq!(parse("2147483647 BCE").sort_key(), (-i32::MAX, 0, 0));
    }

    #[test]
    fn test_sort_key_saturates_oversized_magnitude() {
        let date = CanonicalDate::EraYear {
            magnitude: u32::MAX,
            era: Era::Bce,
            circa: false,
        };
        assert_eq!(date.sort_key(), (-i32::MAX, 0, 0));
    }

    #[test]
    fn test_sort_key_partial_dates() {
        assert_eq!(parse("2023-01-15").sort_key(), (2023, 1, 15));
        assert_eq!(parse("2023").sort_key(), (2023, 0, 0));
        assert_eq!(parse("1990s").sort_key(), (1990, 0, 0));
        assert_eq!(parse("1999-present").sort_key(), (1999, 0, 0));
        assert!(parse("2023").sort_key() < parse("2023-01-01").sort_key());
    }

    #[test]
    fn test_from_str_rejects_free_text() {
        for s in [
            "",
            "January 15, 2023",
            "0 BCE",
            "1995s",
            "c. 1999-2005",
            "2023-13-01",
            "12345",
            "19x9",
            "2147483648 BCE",
            "3000000000 CE",
        ] {
            assert!(s.parse::<CanonicalDate>().is_err(), "{s:?} should not parse");
        }
    }
}
