//! Engine configuration value object.
//!
//! All tunables live in one immutable struct passed by reference to every
//! component; there is no global state. Two presets mirror the parameter sets
//! the system is normally run with (daily candles and 15-minute candles); an
//! INI file can override any field through [`EngineConfig::from_config`].

use crate::domain::error::AdaptraderError;
use crate::ports::config_port::ConfigPort;
use std::fmt;
use std::str::FromStr;

/// How the classification threshold is derived each bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdMethod {
    /// Constant base threshold.
    Fixed,
    /// Base threshold scaled by the fraction of rules carrying significant weight.
    Adaptive,
    /// Base threshold scaled by recent return volatility.
    Volatility,
}

impl FromStr for ThresholdMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed" => Ok(ThresholdMethod::Fixed),
            "adaptive" => Ok(ThresholdMethod::Adaptive),
            "volatility" => Ok(ThresholdMethod::Volatility),
            other => Err(format!(
                "unknown threshold method '{other}', expected fixed, adaptive or volatility"
            )),
        }
    }
}

impl fmt::Display for ThresholdMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdMethod::Fixed => write!(f, "fixed"),
            ThresholdMethod::Adaptive => write!(f, "adaptive"),
            ThresholdMethod::Volatility => write!(f, "volatility"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    // [engine]
    pub lookback_window: usize,
    /// Softmax sharpness applied to per-rule performance.
    pub sensitivity: f64,
    /// Floor applied to per-rule performance before exponentiating.
    /// An overflow guard, not a contract; see the scorer.
    pub perf_floor: f64,

    // [indicators]
    pub rsi_period: usize,
    pub ma_short: usize,
    pub ma_long: usize,
    pub ema_short: usize,
    pub ema_long: usize,
    pub bb_period: usize,
    pub bb_mult: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub adx_period: usize,
    pub volume_period: usize,

    // [rules]
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    /// SMA window applied to RSI for the rsi_ma cross rule.
    pub rsi_ma_period: usize,
    pub cross_overbought: f64,
    pub cross_oversold: f64,

    // [decision]
    pub threshold_method: ThresholdMethod,
    pub base_threshold: f64,
    pub min_threshold: f64,
    pub max_threshold: f64,
    /// Minimum weight for a rule to count as significant under the adaptive policy.
    pub weight_significance: f64,

    // [strict]
    /// Enables strict filtering without the CLI flag.
    pub strict: bool,
    pub max_volatility: f64,
    pub volatility_window: usize,
    /// "HH:MM" bar-open times during which strict mode refuses to trade.
    pub avoid_times: Vec<String>,
    pub moderate_threshold: f64,
    pub confirmation_bars: usize,
    pub persistence_length: usize,
}

impl EngineConfig {
    /// Parameter set for daily candles.
    pub fn daily() -> Self {
        EngineConfig {
            lookback_window: 90,
            sensitivity: 10.0,
            perf_floor: -0.5,
            rsi_period: 14,
            ma_short: 50,
            ma_long: 200,
            ema_short: 12,
            ema_long: 26,
            bb_period: 20,
            bb_mult: 2.0,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            adx_period: 14,
            volume_period: 20,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            rsi_ma_period: 9,
            cross_overbought: 60.0,
            cross_oversold: 40.0,
            threshold_method: ThresholdMethod::Fixed,
            base_threshold: 0.3,
            min_threshold: 0.1,
            max_threshold: 0.6,
            weight_significance: 0.25,
            strict: false,
            max_volatility: 0.02,
            volatility_window: 10,
            avoid_times: vec!["00:00".into(), "06:00".into()],
            moderate_threshold: 0.25,
            confirmation_bars: 2,
            persistence_length: 5,
        }
    }

    /// Parameter set for 15-minute candles: shorter averages, sharper scoring.
    pub fn intraday() -> Self {
        EngineConfig {
            sensitivity: 15.0,
            rsi_period: 9,
            rsi_overbought: 65.0,
            rsi_oversold: 35.0,
            ma_short: 5,
            ma_long: 20,
            ..Self::daily()
        }
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "daily" => Some(Self::daily()),
            "intraday" | "15m" => Some(Self::intraday()),
            _ => None,
        }
    }

    /// Build a config from an INI source, starting from `base` for defaults.
    pub fn from_config(
        config: &dyn ConfigPort,
        base: EngineConfig,
    ) -> Result<Self, AdaptraderError> {
        let threshold_method = match config.get_string("decision", "threshold_method") {
            None => base.threshold_method,
            Some(s) => {
                s.parse::<ThresholdMethod>()
                    .map_err(|reason| AdaptraderError::ConfigInvalid {
                        section: "decision".into(),
                        key: "threshold_method".into(),
                        reason,
                    })?
            }
        };

        let avoid_times = match config.get_string("strict", "avoid_times") {
            None => base.avoid_times.clone(),
            Some(s) => s
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        };

        let get_usize = |section: &str, key: &str, default: usize| -> usize {
            config.get_int(section, key, default as i64).max(0) as usize
        };

        Ok(EngineConfig {
            lookback_window: get_usize("engine", "lookback_window", base.lookback_window),
            sensitivity: config.get_double("engine", "sensitivity", base.sensitivity),
            perf_floor: config.get_double("engine", "perf_floor", base.perf_floor),
            rsi_period: get_usize("indicators", "rsi_period", base.rsi_period),
            ma_short: get_usize("indicators", "ma_short", base.ma_short),
            ma_long: get_usize("indicators", "ma_long", base.ma_long),
            ema_short: get_usize("indicators", "ema_short", base.ema_short),
            ema_long: get_usize("indicators", "ema_long", base.ema_long),
            bb_period: get_usize("indicators", "bb_period", base.bb_period),
            bb_mult: config.get_double("indicators", "bb_mult", base.bb_mult),
            macd_fast: get_usize("indicators", "macd_fast", base.macd_fast),
            macd_slow: get_usize("indicators", "macd_slow", base.macd_slow),
            macd_signal: get_usize("indicators", "macd_signal", base.macd_signal),
            adx_period: get_usize("indicators", "adx_period", base.adx_period),
            volume_period: get_usize("indicators", "volume_period", base.volume_period),
            rsi_overbought: config.get_double("rules", "rsi_overbought", base.rsi_overbought),
            rsi_oversold: config.get_double("rules", "rsi_oversold", base.rsi_oversold),
            rsi_ma_period: get_usize("rules", "rsi_ma_period", base.rsi_ma_period),
            cross_overbought: config.get_double("rules", "cross_overbought", base.cross_overbought),
            cross_oversold: config.get_double("rules", "cross_oversold", base.cross_oversold),
            threshold_method,
            base_threshold: config.get_double("decision", "base_threshold", base.base_threshold),
            min_threshold: config.get_double("decision", "min_threshold", base.min_threshold),
            max_threshold: config.get_double("decision", "max_threshold", base.max_threshold),
            weight_significance: config.get_double(
                "decision",
                "weight_significance",
                base.weight_significance,
            ),
            strict: config.get_bool("strict", "enabled", base.strict),
            max_volatility: config.get_double("strict", "max_volatility", base.max_volatility),
            volatility_window: get_usize("strict", "volatility_window", base.volatility_window),
            avoid_times,
            moderate_threshold: config.get_double(
                "strict",
                "moderate_threshold",
                base.moderate_threshold,
            ),
            confirmation_bars: get_usize("strict", "confirmation_bars", base.confirmation_bars),
            persistence_length: get_usize("strict", "persistence_length", base.persistence_length),
        })
    }

    /// Bars needed before every indicator column is defined.
    pub fn max_warmup(&self) -> usize {
        let macd_warmup = self.macd_slow.saturating_sub(1) + self.macd_signal.saturating_sub(1);
        let adx_warmup = 2 * self.adx_period;
        [
            self.rsi_period + 1,
            self.ma_long,
            self.ema_long,
            self.bb_period,
            macd_warmup + 1,
            adx_warmup,
            self.volume_period,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}
