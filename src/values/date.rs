//! Calendar dates and wall-clock times.
//!
//! The current API generation writes dates as `2024-01-31`; legacy endpoints
//! write the same date as `20240131`. Both types below accept either form on
//! decode and write their own generation's form on encode, so a value read
//! from one generation can be sent to the other unchanged.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde_with::{DeserializeFromStr, SerializeDisplay};

const ISO_FORMAT: &str = "%Y-%m-%d";
const LEGACY_FORMAT: &str = "%Y%m%d";
const TIME_FORMAT: &str = "%H:%M:%S";
const SHORT_TIME_FORMAT: &str = "%H:%M";

/// Parse either wire form of a date.
fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    let s = s.trim();
    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        NaiveDate::parse_from_str(s, LEGACY_FORMAT)
    } else {
        NaiveDate::parse_from_str(s, ISO_FORMAT)
    }
}

/// A date-only value for current-generation endpoints (`2024-01-31`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct Date(pub NaiveDate);

impl Date {
    /// Build a date from its parts. Returns `None` for impossible dates.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The underlying calendar date.
    pub fn naive(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(ISO_FORMAT))
    }
}

impl FromStr for Date {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_date(s).map(Self)
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl From<LegacyDate> for Date {
    fn from(date: LegacyDate) -> Self {
        Self(date.0)
    }
}

/// A date-only value for legacy endpoints (`20240131`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct LegacyDate(pub NaiveDate);

impl LegacyDate {
    /// Build a date from its parts. Returns `None` for impossible dates.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The underlying calendar date.
    pub fn naive(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for LegacyDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // chrono pads %Y only to four digits; the legacy form is fixed width.
        write!(
            f,
            "{:04}{:02}{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

impl FromStr for LegacyDate {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_date(s).map(Self)
    }
}

impl From<NaiveDate> for LegacyDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl From<Date> for LegacyDate {
    fn from(date: Date) -> Self {
        Self(date.0)
    }
}

/// A wall-clock time without zone (`14:30:00`), used when logging time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct Time(pub NaiveTime);

impl Time {
    /// Build a time from hour, minute and second.
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, second).map(Self)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIME_FORMAT))
    }
}

impl FromStr for Time {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        NaiveTime::parse_from_str(s, TIME_FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(s, SHORT_TIME_FORMAT))
            .map(Self)
    }
}

impl From<NaiveTime> for Time {
    fn from(time: NaiveTime) -> Self {
        Self(time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan_31() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
    }

    #[test]
    fn test_date_encodes_iso() {
        let json = serde_json::to_string(&Date(jan_31())).unwrap();
        assert_eq!(json, "\"2024-01-31\"");
    }

    #[test]
    fn test_legacy_date_encodes_compact() {
        let json = serde_json::to_string(&LegacyDate(jan_31())).unwrap();
        assert_eq!(json, "\"20240131\"");
    }

    #[test]
    fn test_both_wire_forms_decode_to_same_date() {
        let from_iso: Date = serde_json::from_str("\"2024-01-31\"").unwrap();
        let from_legacy: Date = serde_json::from_str("\"20240131\"").unwrap();
        assert_eq!(from_iso, from_legacy);

        let legacy_from_iso: LegacyDate = serde_json::from_str("\"2024-01-31\"").unwrap();
        let legacy_from_legacy: LegacyDate = serde_json::from_str("\"20240131\"").unwrap();
        assert_eq!(legacy_from_iso, legacy_from_legacy);
        assert_eq!(legacy_from_iso.naive(), from_iso.naive());
    }

    #[test]
    fn test_date_round_trip_through_either_generation() {
        let date = Date(jan_31());

        let encoded = serde_json::to_string(&date).unwrap();
        let decoded: Date = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, date);

        let legacy: LegacyDate = date.into();
        let encoded = serde_json::to_string(&legacy).unwrap();
        let decoded: Date = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, date);
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        assert!(serde_json::from_str::<Date>("\"2024-02-30\"").is_err());
        assert!(serde_json::from_str::<LegacyDate>("\"not a date\"").is_err());
        assert!(serde_json::from_str::<Date>("\"\"").is_err());
    }

    #[test]
    fn test_legacy_date_pads_small_years() {
        let date = LegacyDate::from_ymd(987, 3, 4).unwrap();
        assert_eq!(date.to_string(), "09870304");
    }

    #[test]
    fn test_time_accepts_short_form() {
        let full: Time = serde_json::from_str("\"14:30:00\"").unwrap();
        let short: Time = serde_json::from_str("\"14:30\"").unwrap();
        assert_eq!(full, short);
        assert_eq!(serde_json::to_string(&short).unwrap(), "\"14:30:00\"");
    }
}
