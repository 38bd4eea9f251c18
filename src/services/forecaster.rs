/// ============================================================
///  Baseline material-usage forecaster
///
///   1. Empty history   → zero forecast anchored on today (UTC)
///   2. Moving average  → mean of the trailing `window` samples,
///                        taken in the order the caller sent them
///   3. Anchor          → latest date present in the history
///   4. Projection      → flat value for anchor+1 … anchor+horizon,
///                        never past 9999-12-31
/// ============================================================

use chrono::{Datelike, Days, NaiveDate};
use thiserror::Error;

use crate::models::forecast::{ForecastPoint, HistoryPoint, MAX_YEAR};

pub const DEFAULT_WINDOW: usize = 30;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("a horizon of {horizon_days} days from {anchor} ends after year {MAX_YEAR}")]
pub struct HorizonOutOfRange {
    pub anchor: NaiveDate,
    pub horizon_days: i64,
}

/// Mean of the last `min(window, len)` entries in list order.
///
/// The list is not sorted by date first: for callers that submit history in
/// ascending date order this is the most recent `window` samples.
pub fn trailing_mean(history: &[HistoryPoint], window: usize) -> Option<f64> {
    let n = window.min(history.len());
    if n == 0 {
        return None;
    }
    let tail = &history[history.len() - n..];
    let sum: f64 = tail.iter().map(|p| p.quantity_used).sum();
    if sum.is_finite() {
        return Some(sum / n as f64);
    }
    // sum overflowed; each scaled term is bounded by the largest input
    Some(tail.iter().map(|p| p.quantity_used / n as f64).sum())
}

/// Builds the flat projection.
///
/// * `today` – anchor used when `history` is empty
/// * `horizon_days` – non-positive values yield an empty forecast
///
/// Fails instead of truncating when the last day would fall after year 9999.
pub fn moving_average(
    history: &[HistoryPoint],
    horizon_days: i64,
    window: usize,
    today: NaiveDate,
) -> Result<Vec<ForecastPoint>, HorizonOutOfRange> {
    let (anchor, value) = match history.iter().map(|p| p.date).max() {
        Some(last) => (last, trailing_mean(history, window).unwrap_or(0.0)),
        None => (today, 0.0),
    };

    let horizon = u64::try_from(horizon_days).unwrap_or(0);
    let out_of_range = HorizonOutOfRange { anchor, horizon_days };
    match anchor.checked_add_days(Days::new(horizon)) {
        Some(last) if last.year() <= MAX_YEAR => {}
        _ => return Err(out_of_range),
    }
    let len = usize::try_from(horizon).map_err(|_| out_of_range)?;

    Ok(anchor
        .iter_days()
        .skip(1)
        .take(len)
        .map(|date| ForecastPoint { date, quantity_forecast: value })
        .collect())
}
