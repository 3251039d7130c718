//! Calendar dates with explicit precision.
//!
//! Upstream sources disagree on date formats and completeness: EPO emits
//! `YYYYMMDD`, INPI emits `DD/MM/YYYY`, and scraped records sometimes carry
//! only a year. A partial date keeps its precision instead of being guessed
//! up to a full day.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// A calendar date at day, month, or year precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartialDate {
    Day(NaiveDate),
    Month { year: i32, month: u32 },
    Year(i32),
}

impl PartialDate {
    /// Parse the formats observed across the upstream sources:
    /// `YYYY-MM-DD` (optionally with a time suffix), `DD/MM/YYYY`,
    /// `YYYYMMDD`, `YYYY-MM`, and bare `YYYY`.
    pub fn parse(raw: &str) -> Option<PartialDate> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }

        // ISO timestamps: keep the calendar part only.
        let s = match s.split_once('T') {
            Some((date, _)) => date,
            None => s,
        };

        if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Some(PartialDate::Day(d));
        }
        if let Ok(d) = NaiveDate::parse_from_str(s, "%d/%m/%Y") {
            return Some(PartialDate::Day(d));
        }
        if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(d) = NaiveDate::parse_from_str(s, "%Y%m%d") {
                return Some(PartialDate::Day(d));
            }
        }
        if let Some((y, m)) = s.split_once('-') {
            if y.len() == 4 && !m.contains('-') {
                if let (Ok(year), Ok(month)) = (y.parse::<i32>(), m.parse::<u32>()) {
                    if (1..=12).contains(&month) {
                        return Some(PartialDate::Month { year, month });
                    }
                }
            }
        }
        if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(year) = s.parse::<i32>() {
                return Some(PartialDate::Year(year));
            }
        }

        None
    }

    /// The earliest calendar day consistent with this date.
    ///
    /// Used for ordering and for expiration arithmetic on partial dates.
    pub fn earliest_day(&self) -> NaiveDate {
        match *self {
            PartialDate::Day(d) => d,
            PartialDate::Month { year, month } => {
                NaiveDate::from_ymd_opt(year, month, 1)
                    .unwrap_or(NaiveDate::MIN)
            }
            PartialDate::Year(year) => {
                NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN)
            }
        }
    }

    /// Precision rank: day < month < year. Finer precision wins ties.
    fn precision_rank(&self) -> u8 {
        match self {
            PartialDate::Day(_) => 0,
            PartialDate::Month { .. } => 1,
            PartialDate::Year(_) => 2,
        }
    }

    pub fn year(&self) -> i32 {
        match *self {
            PartialDate::Day(d) => chrono::Datelike::year(&d),
            PartialDate::Month { year, .. } => year,
            PartialDate::Year(year) => year,
        }
    }
}

impl fmt::Display for PartialDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PartialDate::Day(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            PartialDate::Month { year, month } => write!(f, "{year:04}-{month:02}"),
            PartialDate::Year(year) => write!(f, "{year:04}"),
        }
    }
}

impl Ord for PartialDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.earliest_day()
            .cmp(&other.earliest_day())
            .then_with(|| self.precision_rank().cmp(&other.precision_rank()))
    }
}

impl PartialOrd for PartialDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for PartialDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PartialDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PartialDateVisitor;

        impl Visitor<'_> for PartialDateVisitor {
            type Value = PartialDate;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a date string at day, month, or year precision")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<PartialDate, E> {
                PartialDate::parse(v)
                    .ok_or_else(|| E::custom(format!("unparseable date: {v:?}")))
            }
        }

        deserializer.deserialize_str(PartialDateVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_day() {
        assert_eq!(
            PartialDate::parse("2015-05-27"),
            Some(PartialDate::Day(
                NaiveDate::from_ymd_opt(2015, 5, 27).unwrap()
            ))
        );
    }

    #[test]
    fn parses_iso_timestamp() {
        assert_eq!(
            PartialDate::parse("2015-05-27T10:30:00Z"),
            Some(PartialDate::Day(
                NaiveDate::from_ymd_opt(2015, 5, 27).unwrap()
            ))
        );
    }

    #[test]
    fn parses_compact_and_slashed_days() {
        let expected = PartialDate::Day(NaiveDate::from_ymd_opt(2017, 6, 9).unwrap());
        assert_eq!(PartialDate::parse("20170609"), Some(expected));
        assert_eq!(PartialDate::parse("09/06/2017"), Some(expected));
    }

    #[test]
    fn parses_partial_precisions() {
        assert_eq!(
            PartialDate::parse("2015-05"),
            Some(PartialDate::Month { year: 2015, month: 5 })
        );
        assert_eq!(PartialDate::parse("2015"), Some(PartialDate::Year(2015)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(PartialDate::parse(""), None);
        assert_eq!(PartialDate::parse("unknown"), None);
        assert_eq!(PartialDate::parse("2015-13"), None);
        assert_eq!(PartialDate::parse("20151350"), None);
    }

    #[test]
    fn display_preserves_precision() {
        assert_eq!(PartialDate::parse("2015-05-27").unwrap().to_string(), "2015-05-27");
        assert_eq!(PartialDate::parse("2015-05").unwrap().to_string(), "2015-05");
        assert_eq!(PartialDate::parse("2015").unwrap().to_string(), "2015");
    }

    #[test]
    fn ordering_uses_earliest_day_then_precision() {
        let day = PartialDate::parse("2015-01-01").unwrap();
        let year = PartialDate::parse("2015").unwrap();
        let later = PartialDate::parse("2015-02").unwrap();
        assert!(day < year);
        assert!(year < later);
    }

    #[test]
    fn serde_round_trip() {
        let d = PartialDate::parse("2015-05").unwrap();
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "\"2015-05\"");
        let back: PartialDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}
