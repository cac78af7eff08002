//! Volume moving average and volume strength.
//!
//! Volume strength = volume / rolling_mean(volume, n): above 1 means the bar
//! traded heavier than its recent average. Warmup: first (n-1) bars invalid;
//! a zero rolling average also yields an invalid point.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_volume_ma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());
    let warmup = period.saturating_sub(1);

    for i in 0..bars.len() {
        let valid = period > 0 && i >= warmup;
        let value = if valid {
            let start = i + 1 - period;
            bars[start..=i].iter().map(|b| b.volume).sum::<f64>() / period as f64
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
        indicator_type: IndicatorType::VolumeMa(period),
        values,
    }
}

pub fn calculate_volume_strength(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let ma = calculate_volume_ma(bars, period);
    let mut values = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let point = match ma.simple_at(i) {
            Some(avg) if avg > 0.0 => IndicatorPoint {
                ts: bar.ts,
                valid: true,
                value: IndicatorValue::Simple(bar.volume / avg),
            },
            _ => IndicatorPoint {
                ts: bar.ts,
                valid: false,
                value: IndicatorValue::Simple(0.0),
            },
        };
        values.push(point);
    }

    IndicatorSeries {
        indicator_type: IndicatorType::VolumeStrength(period),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bars(volumes: &[f64]) -> Vec<OhlcvBar> {
        volumes
            .iter()
            .enumerate()
            .map(|(i, &volume)| OhlcvBar {
                symbol: "TEST".into(),
                ts: (i as i64 + 1) * 60_000,
                open: 100.0,
                high: 100.0,
                low: 100.0,
                close: 100.0,
                volume,
            })
            .collect()
    }

    #[test]
    fn volume_ma_values() {
        let bars = make_bars(&[100.0, 200.0, 300.0, 400.0]);
        let series = calculate_volume_ma(&bars, 2);
        assert!(!series.values[0].valid);
        assert_eq!(series.simple_at(1), Some(150.0));
        assert_eq!(series.simple_at(2), Some(250.0));
        assert_eq!(series.simple_at(3), Some(350.0));
    }

    #[test]
    fn volume_strength_above_one_on_spike() {
        let bars = make_bars(&[100.0, 100.0, 100.0, 300.0]);
        let series = calculate_volume_strength(&bars, 3);

        // Window at index 3: mean(100, 100, 300) = 166.67; 300 / 166.67 = 1.8
        let strength = series.simple_at(3).unwrap();
        assert!((strength - 1.8).abs() < 1e-9);
    }

    #[test]
    fn volume_strength_is_one_on_flat_volume() {
        let bars = make_bars(&[500.0; 6]);
        let series = calculate_volume_strength(&bars, 4);
        for i in 3..6 {
            assert!((series.simple_at(i).unwrap() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn volume_strength_invalid_on_zero_average() {
        let bars = make_bars(&[0.0, 0.0, 0.0, 100.0]);
        let series = calculate_volume_strength(&bars, 3);
        assert_eq!(series.simple_at(2), None);
    }
}
