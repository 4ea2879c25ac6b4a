//! Serde helpers for the remote service's JSON.
//!
//! The remote store hands back timestamps without an offset once they have
//! round-tripped through its database, leaves unset macro values as `null`, and
//! stores goal target dates as full timestamps. These helpers accept all of
//! those shapes while our own records stay strictly typed.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Parse an RFC 3339 timestamp, or a naive ISO-8601 one taken as UTC
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Parse a calendar date given either as `YYYY-MM-DD` or as a timestamp
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(raw).map(|dt| dt.date_naive()))
}

pub(crate) fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp `{raw}`")))
}

pub(crate) fn opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_date(&raw)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid date `{raw}`"))),
    }
}

/// Dates go out as midnight UTC, the form the remote service parses
pub(crate) fn date_as_midnight<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match date.and_then(|d| d.and_hms_opt(0, 0, 0)) {
        Some(naive) => serializer.serialize_str(&naive.and_utc().to_rfc3339()),
        None => serializer.serialize_none(),
    }
}

pub(crate) fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_timestamp_accepts_offset_and_naive() {
        let with_offset = parse_timestamp("2024-01-15T10:30:00+02:00").unwrap();
        assert_eq!(with_offset.hour(), 8);

        let naive = parse_timestamp("2024-01-15T10:30:00.123000").unwrap();
        assert_eq!(naive.hour(), 10);
        assert_eq!(naive.day(), 15);

        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_parse_date_keeps_calendar_day() {
        assert_eq!(
            parse_date("2025-06-01"),
            NaiveDate::from_ymd_opt(2025, 6, 1)
        );
        assert_eq!(
            parse_date("2025-06-01T00:00:00Z"),
            NaiveDate::from_ymd_opt(2025, 6, 1)
        );
        assert!(parse_date("06/01/2025").is_none());
    }
}
