//! Composite scoring, threshold policies and the decision maker.
//!
//! The composite score is the weight-blended sum of all rule signals at one
//! bar. Classification compares it against a threshold picked by the active
//! policy; strict mode additionally runs confirmation filters and can demote
//! a BUY/SELL to HOLD, never the reverse.
//!
//! The persistence buffer is the only cross-bar mutable state in the whole
//! decision path: a bounded queue of recent composites, oldest evicted.

use crate::domain::scorer::WeightMap;
use crate::domain::settings::{EngineConfig, ThresholdMethod};
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
            Action::Hold => write!(f, "HOLD"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub composite: f64,
    pub threshold: f64,
}

/// Per-bar context the decision maker cannot compute for itself.
#[derive(Debug, Clone)]
pub struct DecisionContext {
    pub index: usize,
    /// "HH:MM" bar-open time, if the timestamp is representable.
    pub time_of_day: Option<String>,
    /// Returns of the bars strictly before the current one, most recent last,
    /// at most `volatility_window - 1` values.
    pub trailing_returns: Vec<f64>,
}

pub struct DecisionMaker {
    config: EngineConfig,
    strict: bool,
    history: VecDeque<f64>,
}

impl DecisionMaker {
    pub fn new(config: &EngineConfig, strict: bool) -> Self {
        DecisionMaker {
            config: config.clone(),
            strict,
            history: VecDeque::with_capacity(config.persistence_length),
        }
    }

    /// Weighted sum over the name intersection; missing entries contribute 0.
    pub fn composite_signal(signals: &[(&'static str, f64)], weights: &WeightMap) -> f64 {
        signals
            .iter()
            .filter_map(|(name, signal)| weights.get(name).map(|w| signal * w))
            .sum()
    }

    pub fn decide(
        &mut self,
        signals: &[(&'static str, f64)],
        weights: &WeightMap,
        ctx: &DecisionContext,
    ) -> Decision {
        let composite = Self::composite_signal(signals, weights);
        let threshold = self.threshold(weights, &ctx.trailing_returns);

        self.push_history(composite);

        let action = if self.strict {
            self.strict_action(composite, threshold, ctx)
        } else {
            classify(composite, threshold)
        };

        Decision {
            action,
            composite,
            threshold,
        }
    }

    fn threshold(&self, weights: &WeightMap, trailing_returns: &[f64]) -> f64 {
        let base = self.config.base_threshold;
        match self.config.threshold_method {
            ThresholdMethod::Fixed => base,
            ThresholdMethod::Adaptive => {
                if weights.is_empty() {
                    return base;
                }
                let significant = weights
                    .iter()
                    .filter(|(_, w)| *w > self.config.weight_significance)
                    .count();
                let fraction = significant as f64 / weights.len() as f64;
                (base * fraction).clamp(self.config.min_threshold, self.config.max_threshold)
            }
            ThresholdMethod::Volatility => {
                let vol = sample_stdev(trailing_returns);
                (base * (1.0 + 10.0 * vol))
                    .clamp(self.config.min_threshold, self.config.max_threshold)
            }
        }
    }

    fn strict_action(
        &self,
        composite: f64,
        threshold: f64,
        ctx: &DecisionContext,
    ) -> Action {
        if !self.volatility_ok(&ctx.trailing_returns) || !self.time_ok(ctx) {
            return Action::Hold;
        }

        match classify(composite, threshold) {
            Action::Buy if self.confirmed(1.0) => Action::Buy,
            Action::Sell if self.confirmed(-1.0) => Action::Sell,
            _ => Action::Hold,
        }
    }

    /// The last `confirmation_bars` composites (newest included) must all
    /// clear the moderate threshold in `direction`.
    fn confirmed(&self, direction: f64) -> bool {
        let needed = self.config.confirmation_bars;
        if self.history.len() < needed {
            return false;
        }
        self.history
            .iter()
            .rev()
            .take(needed)
            .all(|&c| c * direction > self.config.moderate_threshold)
    }

    fn volatility_ok(&self, trailing_returns: &[f64]) -> bool {
        // Not enough bars to measure → pass, same as the warm-up convention.
        if trailing_returns.len() + 1 < self.config.volatility_window {
            return true;
        }
        sample_stdev(trailing_returns) <= self.config.max_volatility
    }

    fn time_ok(&self, ctx: &DecisionContext) -> bool {
        match &ctx.time_of_day {
            Some(t) => !self.config.avoid_times.iter().any(|avoid| avoid == t),
            None => true,
        }
    }

    fn push_history(&mut self, composite: f64) {
        if self.history.len() == self.config.persistence_length {
            self.history.pop_front();
        }
        self.history.push_back(composite);
    }

    #[cfg(test)]
    fn history_len(&self) -> usize {
        self.history.len()
    }
}

fn classify(composite: f64, threshold: f64) -> Action {
    if composite > threshold {
        Action::Buy
    } else if composite < -threshold {
        Action::Sell
    } else {
        Action::Hold
    }
}

fn sample_stdev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1) as f64;
    var.sqrt()
}
