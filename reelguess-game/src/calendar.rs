//! Calendar day keys for daily puzzles.
use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::constants::DATE_FORMAT;

/// A local calendar day, rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateKey(NaiveDate);

impl DateKey {
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Today in the local timezone.
    #[must_use]
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }

    /// Time left before the next daily puzzle, measured from `now`.
    #[must_use]
    pub fn time_until_next(self, now: NaiveDateTime) -> Duration {
        let next_midnight = self
            .0
            .succ_opt()
            .and_then(|next| next.and_hms_opt(0, 0, 0));
        match next_midnight {
            Some(midnight) => (midnight - now).max(Duration::zero()),
            None => Duration::zero(),
        }
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map(Self)
    }
}

impl Serialize for DateKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_iso_days() {
        let key: DateKey = "2026-10-16".parse().unwrap();
        assert_eq!(key.to_string(), "2026-10-16");
        assert!("16/10/2026".parse::<DateKey>().is_err());
    }

    #[test]
    fn serde_uses_plain_string() {
        let key: DateKey = "2024-02-29".parse().unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2024-02-29\"");
        let back: DateKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<DateKey>("\"yesterday\"").is_err());
    }

    #[test]
    fn countdown_reaches_local_midnight() {
        let key: DateKey = "2026-10-16".parse().unwrap();
        let now = key.date().and_hms_opt(22, 30, 15).unwrap();
        let left = key.time_until_next(now);
        assert_eq!(left.num_seconds(), 5_385);

        let late = "2026-10-17".parse::<DateKey>().unwrap().date().and_hms_opt(1, 0, 0).unwrap();
        assert_eq!(key.time_until_next(late), Duration::zero());
    }
}
