//! Series preparation: ordering checks and per-bar returns.
//!
//! The core assumes a strictly time-ordered, duplicate-free series; violations
//! are rejected here, at the boundary, so downstream code never re-checks.

use crate::domain::error::AdaptraderError;
use crate::domain::ohlcv::OhlcvBar;

/// A prepared bar series with simple returns.
///
/// `returns[t] = close[t] / close[t-1] - 1`; `returns[0]` is `None`.
#[derive(Debug, Clone)]
pub struct Series {
    pub bars: Vec<OhlcvBar>,
    pub returns: Vec<Option<f64>>,
}

impl Series {
    /// Sort bars by timestamp, reject duplicates, and compute returns.
    pub fn prepare(mut bars: Vec<OhlcvBar>) -> Result<Self, AdaptraderError> {
        bars.sort_by_key(|b| b.ts);

        for i in 1..bars.len() {
            if bars[i].ts == bars[i - 1].ts {
                return Err(AdaptraderError::DuplicateTimestamp {
                    row: i,
                    ts: bars[i].ts,
                });
            }
        }

        let returns = compute_returns(&bars);
        Ok(Series { bars, returns })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

fn compute_returns(bars: &[OhlcvBar]) -> Vec<Option<f64>> {
    let mut returns = Vec::with_capacity(bars.len());
    for i in 0..bars.len() {
        if i == 0 || bars[i - 1].close == 0.0 {
            returns.push(None);
        } else {
            returns.push(Some(bars[i].close / bars[i - 1].close - 1.0));
        }
    }
    returns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bar(ts: i64, close: f64) -> OhlcvBar {
        OhlcvBar {
            symbol: "TEST".into(),
            ts,
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000.0,
        }
    }

    #[test]
    fn prepare_sorts_by_timestamp() {
        let bars = vec![make_bar(3000, 103.0), make_bar(1000, 101.0), make_bar(2000, 102.0)];
        let series = Series::prepare(bars).unwrap();
        let ts: Vec<i64> = series.bars.iter().map(|b| b.ts).collect();
        assert_eq!(ts, vec![1000, 2000, 3000]);
    }

    #[test]
    fn prepare_rejects_duplicates() {
        let bars = vec![make_bar(1000, 100.0), make_bar(1000, 101.0)];
        let err = Series::prepare(bars).unwrap_err();
        assert!(matches!(
            err,
            AdaptraderError::DuplicateTimestamp { ts: 1000, .. }
        ));
    }

    #[test]
    fn first_return_is_none() {
        let bars = vec![make_bar(1000, 100.0), make_bar(2000, 110.0)];
        let series = Series::prepare(bars).unwrap();
        assert!(series.returns[0].is_none());
        assert!((series.returns[1].unwrap() - 0.10).abs() < 1e-12);
    }

    #[test]
    fn negative_return() {
        let bars = vec![make_bar(1000, 100.0), make_bar(2000, 95.0)];
        let series = Series::prepare(bars).unwrap();
        assert!((series.returns[1].unwrap() + 0.05).abs() < 1e-12);
    }

    #[test]
    fn zero_prev_close_yields_none() {
        let bars = vec![make_bar(1000, 0.0), make_bar(2000, 95.0)];
        let series = Series::prepare(bars).unwrap();
        assert!(series.returns[1].is_none());
    }

    #[test]
    fn empty_series_ok() {
        let series = Series::prepare(vec![]).unwrap();
        assert!(series.is_empty());
        assert!(series.returns.is_empty());
    }
}
