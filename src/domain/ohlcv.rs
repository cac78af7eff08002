//! OHLCV bar representation.

use chrono::{DateTime, NaiveDateTime};

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub symbol: String,
    /// Bar open time, milliseconds since the Unix epoch.
    pub ts: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }

    /// UTC wall-clock time of the bar, if `ts` is in range.
    pub fn datetime(&self) -> Option<NaiveDateTime> {
        DateTime::from_timestamp_millis(self.ts).map(|dt| dt.naive_utc())
    }

    /// "HH:MM" form of the bar's open time, used by the time-of-day filter.
    pub fn time_of_day(&self) -> Option<String> {
        self.datetime().map(|dt| dt.format("%H:%M").to_string())
    }
}
