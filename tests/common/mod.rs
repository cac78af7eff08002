#![allow(dead_code)]

use adaptrader::domain::error::AdaptraderError;
pub use adaptrader::domain::ohlcv::OhlcvBar;
use adaptrader::domain::settings::EngineConfig;
use adaptrader::ports::data_port::DataPort;

pub const BAR_MS: i64 = 900_000; // 15 minutes

/// One bar per close, 15 minutes apart, starting at the epoch + one bar.
pub fn make_bars(closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_bar(i, close))
        .collect()
}

pub fn make_bar(index: usize, close: f64) -> OhlcvBar {
    OhlcvBar {
        symbol: "BTCUSDT".to_string(),
        ts: (index as i64 + 1) * BAR_MS,
        open: close,
        high: close + 0.5,
        low: close - 0.5,
        close,
        volume: 1_000.0,
    }
}

/// A gently oscillating price path long enough to clear every warm-up window.
pub fn wave_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + ((i * 7) % 13) as f64 - 6.0 + (i as f64) * 0.05)
        .collect()
}

/// A config with short windows so small fixtures clear the warm-up.
pub fn small_config() -> EngineConfig {
    EngineConfig {
        lookback_window: 12,
        rsi_period: 4,
        rsi_ma_period: 3,
        ma_short: 3,
        ma_long: 6,
        ema_short: 3,
        ema_long: 6,
        bb_period: 5,
        macd_fast: 3,
        macd_slow: 6,
        macd_signal: 3,
        adx_period: 3,
        volume_period: 3,
        volatility_window: 5,
        ..EngineConfig::daily()
    }
}

/// In-memory data source; ignores the `source` argument.
pub struct MockDataPort {
    pub bars: Vec<OhlcvBar>,
}

impl DataPort for MockDataPort {
    fn load_series(&self, _source: &str) -> Result<Vec<OhlcvBar>, AdaptraderError> {
        Ok(self.bars.clone())
    }
}

/// CSV text for the bar set, in the column order the loader expects by name.
pub fn bars_to_csv(bars: &[OhlcvBar]) -> String {
    let mut out = String::from("timestamp,symbol,open,high,low,close,volume\n");
    for bar in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            bar.ts, bar.symbol, bar.open, bar.high, bar.low, bar.close, bar.volume
        ));
    }
    out
}
