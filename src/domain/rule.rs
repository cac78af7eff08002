//! Signal rules and the rule registry.
//!
//! Each rule is a pure function over the indicator table, producing one signal
//! per bar in [-1, 1] (canonically -1/0/+1). Rules must be causal: the signal
//! at bar t reads only data at or before t. Any bar where a required indicator
//! point is still in warm-up yields 0.
//!
//! Crossing rules are edge-triggered: they fire on the transition bar only,
//! not while the condition persists. The Bollinger rule is level-triggered by
//! design (mean reversion wants the signal for as long as price pins a band).
//!
//! The registry is an ordered list fixed at startup; scorer and decision maker
//! see rules only as (name, signal column) pairs, so adding a rule is local to
//! this module.

use crate::domain::indicator_table::IndicatorTable;
use crate::domain::settings::EngineConfig;

pub trait SignalRule {
    /// Stable name, used as the weight key and the `signal_<name>` CSV column.
    fn name(&self) -> &'static str;

    fn compute(&self, table: &IndicatorTable, config: &EngineConfig) -> Vec<f64>;
}

/// One computed signal column.
#[derive(Debug, Clone)]
pub struct SignalColumn {
    pub name: &'static str,
    pub values: Vec<f64>,
}

/// All signal columns for a table, in registry order.
#[derive(Debug, Clone)]
pub struct SignalSet {
    pub columns: Vec<SignalColumn>,
}

impl SignalSet {
    pub fn names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    /// Per-rule signals at one bar, in registry order.
    pub fn at(&self, index: usize) -> Vec<(&'static str, f64)> {
        self.columns
            .iter()
            .map(|c| (c.name, c.values.get(index).copied().unwrap_or(0.0)))
            .collect()
    }

    pub fn column(&self, name: &str) -> Option<&SignalColumn> {
        self.columns.iter().find(|c| c.name == name)
    }
}

pub struct RuleRegistry {
    rules: Vec<Box<dyn SignalRule>>,
}

impl RuleRegistry {
    /// The canonical rule set, in scoring order.
    pub fn standard() -> Self {
        RuleRegistry {
            rules: vec![
                Box::new(RsiMomentumRule),
                Box::new(MaCrossoverRule),
                Box::new(BollingerReversionRule),
                Box::new(RsiMaCrossRule),
                Box::new(MacdCrossRule),
            ],
        }
    }

    pub fn with_rules(rules: Vec<Box<dyn SignalRule>>) -> Self {
        RuleRegistry { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&dyn SignalRule> {
        self.rules
            .iter()
            .find(|r| r.name() == name)
            .map(|r| r.as_ref())
    }

    pub fn compute_signals(&self, table: &IndicatorTable, config: &EngineConfig) -> SignalSet {
        SignalSet {
            columns: self
                .rules
                .iter()
                .map(|rule| SignalColumn {
                    name: rule.name(),
                    values: rule.compute(table, config),
                })
                .collect(),
        }
    }
}

/// RSI momentum, edge-triggered on threshold crossings:
/// +1 where RSI exits the oversold zone, -1 where it exits the overbought zone.
pub struct RsiMomentumRule;

impl SignalRule for RsiMomentumRule {
    fn name(&self) -> &'static str {
        "rsi"
    }

    fn compute(&self, table: &IndicatorTable, config: &EngineConfig) -> Vec<f64> {
        let n = table.len();
        let mut signals = vec![0.0; n];

        for i in 1..n {
            let (Some(prev), Some(curr)) = (table.rsi.simple_at(i - 1), table.rsi.simple_at(i))
            else {
                continue;
            };

            if prev <= config.rsi_oversold && curr > config.rsi_oversold {
                signals[i] = 1.0;
            } else if prev >= config.rsi_overbought && curr < config.rsi_overbought {
                signals[i] = -1.0;
            }
        }
        signals
    }
}

/// SMA golden/death cross, edge-triggered.
pub struct MaCrossoverRule;

impl SignalRule for MaCrossoverRule {
    fn name(&self) -> &'static str {
        "ma"
    }

    fn compute(&self, table: &IndicatorTable, config: &EngineConfig) -> Vec<f64> {
        let _ = config;
        let n = table.len();
        let mut signals = vec![0.0; n];

        for i in 1..n {
            let points = (
                table.ma_short.simple_at(i - 1),
                table.ma_long.simple_at(i - 1),
                table.ma_short.simple_at(i),
                table.ma_long.simple_at(i),
            );
            let (Some(prev_short), Some(prev_long), Some(short), Some(long)) = points else {
                continue;
            };

            if short > long && prev_short <= prev_long {
                signals[i] = 1.0;
            } else if short < long && prev_short >= prev_long {
                signals[i] = -1.0;
            }
        }
        signals
    }
}

/// Bollinger mean reversion, level-triggered:
/// +1 while close sits at or below the lower band, -1 at or above the upper.
pub struct BollingerReversionRule;

impl SignalRule for BollingerReversionRule {
    fn name(&self) -> &'static str {
        "bb"
    }

    fn compute(&self, table: &IndicatorTable, config: &EngineConfig) -> Vec<f64> {
        let _ = config;
        let n = table.len();
        let mut signals = vec![0.0; n];

        for i in 0..n {
            let Some((upper, _, lower)) = table.bollinger.bollinger_at(i) else {
                continue;
            };
            let close = table.bar(i).close;

            if close <= lower {
                signals[i] = 1.0;
            } else if close >= upper {
                signals[i] = -1.0;
            }
        }
        signals
    }
}

/// RSI crossing its own moving average, gated to the extremes:
/// the upward cross only counts with both below the cross-oversold level, the
/// downward cross only with both above the cross-overbought level.
pub struct RsiMaCrossRule;

impl SignalRule for RsiMaCrossRule {
    fn name(&self) -> &'static str {
        "rsi_ma"
    }

    fn compute(&self, table: &IndicatorTable, config: &EngineConfig) -> Vec<f64> {
        let n = table.len();
        let mut signals = vec![0.0; n];

        for i in 1..n {
            let points = (
                table.rsi.simple_at(i - 1),
                table.rsi_ma.simple_at(i - 1),
                table.rsi.simple_at(i),
                table.rsi_ma.simple_at(i),
            );
            let (Some(prev_rsi), Some(prev_ma), Some(rsi), Some(ma)) = points else {
                continue;
            };

            let crossed_up = rsi > ma && prev_rsi <= prev_ma;
            let crossed_down = rsi < ma && prev_rsi >= prev_ma;

            if crossed_up && rsi < config.cross_oversold && ma < config.cross_oversold {
                signals[i] = 1.0;
            } else if crossed_down && rsi > config.cross_overbought && ma > config.cross_overbought
            {
                signals[i] = -1.0;
            }
        }
        signals
    }
}

/// MACD/signal-line cross, gated by the zero line:
/// +1 on an upward cross while both lines are negative, -1 on a downward
/// cross while both are positive.
pub struct MacdCrossRule;

impl SignalRule for MacdCrossRule {
    fn name(&self) -> &'static str {
        "macd"
    }

    fn compute(&self, table: &IndicatorTable, config: &EngineConfig) -> Vec<f64> {
        let _ = config;
        let n = table.len();
        let mut signals = vec![0.0; n];

        for i in 1..n {
            let (Some((prev_line, prev_signal, _)), Some((line, signal, histogram))) =
                (table.macd.macd_at(i - 1), table.macd.macd_at(i))
            else {
                continue;
            };

            let crossed_up = line > signal && prev_line <= prev_signal;
            let crossed_down = line < signal && prev_line >= prev_signal;

            if crossed_up && line < 0.0 && signal < 0.0 && histogram > 0.0 {
                signals[i] = 1.0;
            } else if crossed_down && line > 0.0 && signal > 0.0 && histogram < 0.0 {
                signals[i] = -1.0;
            }
        }
        signals
    }
}
