//! Calendar dates as the row API and browsers send them
//!
//! Date columns arrive as `YYYY-MM-DD`, but values that went through a
//! timestamp (`2020-01-01T00:00:00Z`) are accepted by keeping the date part.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serializer};

/// Date part of `raw`, cut at the first `T`.
pub fn date_part(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed.split_once('T').map_or(trimmed, |(date, _)| date)
}

pub fn parse(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_part(raw), "%Y-%m-%d").ok()
}

/// Whole years between `birthdate` and `today`, counting a year only once
/// the birthday has been reached.
pub fn age_on(birthdate: NaiveDate, today: NaiveDate) -> u32 {
    today.years_since(birthdate).unwrap_or(0)
}

/// serde helpers for `#[serde(with = "birthdate")]`
pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", raw)))
}
