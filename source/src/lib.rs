pub mod adapter;
pub mod client;

pub use adapter::{AdapterError, Resource};

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};

use std::collections::BTreeSet;

/// A single measurement attributed to one calendar day.
///
/// Every backend resource (honey harvests, milk collections, financial
/// entries, water samples) is flattened into this shape before any
/// windowing or aggregation happens.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedRecord {
    pub date: NaiveDate,
    pub value: f64,
    pub group_key: Option<String>,
}

impl DatedRecord {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self {
            date,
            value,
            group_key: None,
        }
    }

    pub fn with_group(mut self, key: impl Into<String>) -> Self {
        self.group_key = Some(key.into());
        self
    }

    pub fn matches_group(&self, filter: Option<&str>) -> bool {
        match filter {
            Some(key) => self.group_key.as_deref() == Some(key),
            None => true,
        }
    }
}

pub fn earliest_date(records: &[DatedRecord]) -> Option<NaiveDate> {
    records.iter().map(|r| r.date).min()
}

/// Distinct group keys, sorted.
pub fn group_keys(records: &[DatedRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.group_key.as_deref())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

/// Accepts both `12.5` and `"12.5"`, which the backend mixes freely. Only
/// finite values pass.
pub(crate) fn de_string_to_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => n,
        NumberOrString::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid number {s:?}: {e}")))?,
    };

    // "NaN" and "inf" parse as f64 but would poison every sum they reach
    if value.is_finite() {
        Ok(value)
    } else {
        Err(serde::de::Error::custom(format!("non-finite number {value}")))
    }
}

pub(crate) fn de_calendar_day<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_calendar_day(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date {raw:?}")))
}

/// `YYYY-MM-DD`, or an RFC 3339 timestamp taken in its own offset.
pub fn parse_calendar_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|datetime| datetime.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn timestamps_keep_their_own_calendar_day() {
        assert_eq!(
            parse_calendar_day("2024-06-10T23:30:00-05:00"),
            Some(day(2024, 6, 10))
        );
        assert_eq!(parse_calendar_day(" 2024-06-10 "), Some(day(2024, 6, 10)));
        assert_eq!(parse_calendar_day("2024-02-30"), None);
        assert_eq!(parse_calendar_day("yesterday"), None);
    }

    #[test]
    fn group_keys_are_distinct_and_sorted() {
        let records = vec![
            DatedRecord::new(day(2024, 1, 1), 1.0).with_group("Daisy"),
            DatedRecord::new(day(2024, 1, 2), 1.0).with_group("Bella"),
            DatedRecord::new(day(2024, 1, 3), 1.0),
            DatedRecord::new(day(2024, 1, 4), 1.0).with_group("Daisy"),
        ];

        assert_eq!(group_keys(&records), vec!["Bella", "Daisy"]);
        assert_eq!(earliest_date(&records), Some(day(2024, 1, 1)));
        assert_eq!(earliest_date(&[]), None);
    }

    #[test]
    fn group_filter_matching() {
        let record = DatedRecord::new(day(2024, 1, 1), 1.0).with_group("ph");

        assert!(record.matches_group(None));
        assert!(record.matches_group(Some("ph")));
        assert!(!record.matches_group(Some("ammonia")));
        assert!(!DatedRecord::new(day(2024, 1, 1), 1.0).matches_group(Some("ph")));
    }
}
