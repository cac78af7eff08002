//! ADX (Average Directional Index) indicator.
//!
//! Wilder's directional movement system:
//! - +DM[i] = high[i]-high[i-1] when it exceeds low[i-1]-low[i] and is positive
//! - -DM[i] = low[i-1]-low[i] under the mirror condition
//! - TR, +DM, -DM are Wilder-smoothed over n; ±DI = 100·smoothed DM / smoothed TR
//! - DX = 100·|+DI - -DI| / (+DI + -DI); ADX = Wilder-smoothed DX
//!
//! Bounded [0, 100]. Warmup: first 2n-1 bars are invalid (n bars to seed the
//! DM averages, n more DX values to seed the ADX average).

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_adx(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let invalid = |ts: i64| IndicatorPoint {
        ts,
        valid: false,
        value: IndicatorValue::Simple(0.0),
    };

    if period == 0 || bars.len() < 2 * period {
        return IndicatorSeries {
            indicator_type: IndicatorType::Adx(period),
            values: bars.iter().map(|b| invalid(b.ts)).collect(),
        };
    }

    let n = bars.len();
    let mut tr = vec![0.0; n];
    let mut plus_dm = vec![0.0; n];
    let mut minus_dm = vec![0.0; n];

    for i in 1..n {
        tr[i] = bars[i].true_range(bars[i - 1].close);
        let up = bars[i].high - bars[i - 1].high;
        let down = bars[i - 1].low - bars[i].low;
        if up > down && up > 0.0 {
            plus_dm[i] = up;
        }
        if down > up && down > 0.0 {
            minus_dm[i] = down;
        }
    }

    // DX values, defined from index `period` onward.
    let mut dx = vec![0.0; n];
    let mut smooth_tr: f64 = tr[1..=period].iter().sum();
    let mut smooth_plus: f64 = plus_dm[1..=period].iter().sum();
    let mut smooth_minus: f64 = minus_dm[1..=period].iter().sum();

    for i in period..n {
        if i > period {
            smooth_tr = smooth_tr - smooth_tr / period as f64 + tr[i];
            smooth_plus = smooth_plus - smooth_plus / period as f64 + plus_dm[i];
            smooth_minus = smooth_minus - smooth_minus / period as f64 + minus_dm[i];
        }

        let (plus_di, minus_di) = if smooth_tr == 0.0 {
            (0.0, 0.0)
        } else {
            (
                100.0 * smooth_plus / smooth_tr,
                100.0 * smooth_minus / smooth_tr,
            )
        };

        let di_sum = plus_di + minus_di;
        dx[i] = if di_sum == 0.0 {
            0.0
        } else {
            100.0 * (plus_di - minus_di).abs() / di_sum
        };
    }

    let mut values: Vec<IndicatorPoint> = bars[..2 * period - 1].iter().map(|b| invalid(b.ts)).collect();

    let mut adx: f64 = dx[period..2 * period].iter().sum::<f64>() / period as f64;
    values.push(IndicatorPoint {
        ts: bars[2 * period - 1].ts,
        valid: true,
        value: IndicatorValue::Simple(adx),
    });

    for i in 2 * period..n {
        adx = (adx * (period - 1) as f64 + dx[i]) / period as f64;
        values.push(IndicatorPoint {
            ts: bars[i].ts,
            valid: true,
            value: IndicatorValue::Simple(adx),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Adx(period),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bar(ts: i64, high: f64, low: f64, close: f64) -> OhlcvBar {
        OhlcvBar {
            symbol: "TEST".into(),
            ts,
            open: close,
            high,
            low,
            close,
            volume: 1000.0,
        }
    }

    fn trending_bars(n: usize, step: f64) -> Vec<OhlcvBar> {
        (0..n)
            .map(|i| {
                let base = 100.0 + step * i as f64;
                make_bar((i as i64 + 1) * 60_000, base + 1.0, base - 1.0, base)
            })
            .collect()
    }

    #[test]
    fn adx_warmup() {
        let bars = trending_bars(30, 1.0);
        let series = calculate_adx(&bars, 5);

        for i in 0..9 {
            assert!(!series.values[i].valid, "bar {} should be invalid", i);
        }
        assert!(series.values[9].valid, "bar 2n-1 should be valid");
    }

    #[test]
    fn adx_in_range() {
        let bars: Vec<OhlcvBar> = (0..60)
            .map(|i| {
                let base = 100.0 + ((i % 13) as f64 - 6.0) * 2.0;
                make_bar((i as i64 + 1) * 60_000, base + 2.0, base - 2.0, base)
            })
            .collect();
        let series = calculate_adx(&bars, 14);

        for i in 0..series.values.len() {
            if let Some(adx) = series.simple_at(i) {
                assert!((0.0..=100.0).contains(&adx), "ADX {} out of range", adx);
            }
        }
    }

    #[test]
    fn adx_strong_trend_reads_high() {
        let bars = trending_bars(60, 2.0);
        let series = calculate_adx(&bars, 14);
        let adx = series.simple_at(59).unwrap();
        assert!(adx > 50.0, "steady uptrend should score a strong ADX, got {adx}");
    }

    #[test]
    fn adx_insufficient_bars_all_invalid() {
        let bars = trending_bars(10, 1.0);
        let series = calculate_adx(&bars, 14);
        assert_eq!(series.values.len(), 10);
        assert!(series.values.iter().all(|p| !p.valid));
    }

    #[test]
    fn adx_series_length_matches_input() {
        let bars = trending_bars(40, 0.5);
        let series = calculate_adx(&bars, 5);
        assert_eq!(series.values.len(), bars.len());
    }
}
