//! Indicator engine: a prepared series with every indicator column attached.
//!
//! All columns are computed once, up front, from the bar series; the per-bar
//! backtest loop only ever reads. Struct fields (rather than a keyed map) make
//! a missing input a compile error instead of a runtime lookup failure.

use crate::domain::indicator::adx::calculate_adx;
use crate::domain::indicator::bollinger::calculate_bollinger;
use crate::domain::indicator::ema::calculate_ema;
use crate::domain::indicator::macd::calculate_macd;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::sma::{calculate_sma, rolling_mean_of};
use crate::domain::indicator::volume::{calculate_volume_ma, calculate_volume_strength};
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::series::Series;
use crate::domain::settings::EngineConfig;

#[derive(Debug, Clone)]
pub struct IndicatorTable {
    pub series: Series,
    pub rsi: IndicatorSeries,
    pub rsi_ma: IndicatorSeries,
    pub ma_short: IndicatorSeries,
    pub ma_long: IndicatorSeries,
    pub ema_short: IndicatorSeries,
    pub ema_long: IndicatorSeries,
    pub bollinger: IndicatorSeries,
    pub macd: IndicatorSeries,
    pub adx: IndicatorSeries,
    pub volume_ma: IndicatorSeries,
    pub volume_strength: IndicatorSeries,
}

impl IndicatorTable {
    pub fn compute(series: Series, config: &EngineConfig) -> Self {
        let bars = &series.bars;

        let rsi = calculate_rsi(bars, config.rsi_period);
        let rsi_ma = rolling_mean_of(
            &rsi,
            config.rsi_ma_period,
            IndicatorType::RsiMa {
                rsi: config.rsi_period,
                smoothing: config.rsi_ma_period,
            },
        );

        IndicatorTable {
            rsi_ma,
            ma_short: calculate_sma(bars, config.ma_short),
            ma_long: calculate_sma(bars, config.ma_long),
            ema_short: calculate_ema(bars, config.ema_short),
            ema_long: calculate_ema(bars, config.ema_long),
            bollinger: calculate_bollinger(
                bars,
                config.bb_period,
                (config.bb_mult * 100.0).round() as u32,
            ),
            macd: calculate_macd(bars, config.macd_fast, config.macd_slow, config.macd_signal),
            adx: calculate_adx(bars, config.adx_period),
            volume_ma: calculate_volume_ma(bars, config.volume_period),
            volume_strength: calculate_volume_strength(bars, config.volume_period),
            rsi,
            series,
        }
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn bar(&self, index: usize) -> &OhlcvBar {
        &self.series.bars[index]
    }

    /// Simple return at `index`, `None` for the first bar.
    pub fn ret(&self, index: usize) -> Option<f64> {
        self.series.returns.get(index).copied().flatten()
    }
}
