//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = mean of the last n closes ending at i.
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());
    let warmup = period.saturating_sub(1);

    for i in 0..bars.len() {
        let valid = period > 0 && i >= warmup;
        let value = if valid {
            let start = i + 1 - period;
            bars[start..=i].iter().map(|b| b.close).sum::<f64>() / period as f64
        } else {
            0.0
        };

        values.push(IndicatorPoint {
            ts: bars[i].ts,
            valid,
            value: IndicatorValue::Simple(value),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}

/// Rolling mean over another simple-valued series, preserving its warm-up.
///
/// A point is valid only when all `window` source points ending there are
/// valid. Used for smoothing the RSI series.
pub fn rolling_mean_of(
    source: &IndicatorSeries,
    window: usize,
    indicator_type: IndicatorType,
) -> IndicatorSeries {
    let mut values = Vec::with_capacity(source.values.len());

    for i in 0..source.values.len() {
        let mut sum = 0.0;
        let mut defined = window > 0 && i + 1 >= window;
        if defined {
            let start = i + 1 - window;
            for j in start..=i {
                match source.simple_at(j) {
                    Some(v) => sum += v,
                    None => {
                        defined = false;
                        break;
                    }
                }
            }
        }

        values.push(IndicatorPoint {
            ts: source.values[i].ts,
            valid: defined,
            value: IndicatorValue::Simple(if defined { sum / window as f64 } else { 0.0 }),
        });
    }

    IndicatorSeries {
        indicator_type,
        values,
    }
}
