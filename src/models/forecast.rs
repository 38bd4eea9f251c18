use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Inclusive year range of every date read or produced by the forecaster.
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

fn default_horizon_days() -> i64 { 90 }

/// One observed consumption sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    /// Calendar date (`YYYY-MM-DD`) or timestamp; only the date part is used.
    #[serde(deserialize_with = "calendar_date::deserialize")]
    #[schema(value_type = String, example = "2025-03-01")]
    pub date: NaiveDate,
    /// Quantity consumed on that date. Not range-checked.
    pub quantity_used: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRequest {
    pub material_id: String,
    /// Unordered; may be empty.
    pub history: Vec<HistoryPoint>,
    /// Number of days to project. Values `<= 0` produce an empty forecast.
    /// Floats without a fractional part (`3.0`) are accepted.
    #[serde(default = "default_horizon_days", deserialize_with = "whole_number::deserialize")]
    #[schema(default = 90)]
    pub horizon_days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    #[schema(value_type = String, example = "2025-03-02")]
    pub date: NaiveDate,
    pub quantity_forecast: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResponse {
    pub material_id: String,
    pub horizon_days: i64,
    pub forecast: Vec<ForecastPoint>,
}

/// Accepts `2025-03-01`, `2025-03-01T08:30:00Z`, `2025-03-01T08:30:00+02:00`
/// or the naive `2025-03-01T08:30:00`. Timestamps keep their own offset.
/// Years outside `MIN_YEAR..=MAX_YEAR` are rejected.
pub mod calendar_date {
    use super::*;
    use serde::de::Error;

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        parse_any(raw.trim()).filter(|d| (MIN_YEAR..=MAX_YEAR).contains(&d.year()))
    }

    fn parse_any(raw: &str) -> Option<NaiveDate> {
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date);
        }
        if let Ok(ts) = DateTime::<FixedOffset>::parse_from_rfc3339(raw) {
            return Some(ts.date_naive());
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|ts| ts.date())
    }

    pub fn deserialize<'de, D>(d: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(d)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("input is not a valid date: `{raw}`")))
    }
}

/// Signed integer that may also arrive as an integral float such as `3.0`.
pub mod whole_number {
    use std::fmt;

    use serde::de::{self, Unexpected, Visitor};
    use serde::Deserializer;

    struct WholeNumber;

    impl Visitor<'_> for WholeNumber {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an integer")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            i64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            // i64::MAX as f64 rounds up to 2^63, which is out of range
            if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
                Ok(v as i64)
            } else {
                Err(E::invalid_value(Unexpected::Float(v), &self))
            }
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        d.deserialize_any(WholeNumber)
    }
}
