//! Adaptive rule scoring: trailing performance → exponential weights.
//!
//! For each rule the scorer compounds the hypothetical return of trading its
//! signals over a trailing window, aligning each bar's signal with the NEXT
//! bar's return (a signal can only be acted on after the bar closes). The
//! window is half-open, `[index - lookback, index)`, so the current bar never
//! contributes — no look-ahead.
//!
//! Performances are clipped at `perf_floor` before exponentiating so that one
//! badly losing rule cannot collapse the distribution, then passed through
//! `exp(perf * sensitivity)` and normalized to sum to 1. Degenerate totals
//! fall back to uniform weights.

use crate::domain::indicator_table::IndicatorTable;
use crate::domain::rule::SignalSet;
use crate::domain::settings::EngineConfig;

/// A per-rule weight snapshot, in registry order. Weights sum to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMap {
    entries: Vec<(&'static str, f64)>,
}

impl WeightMap {
    pub fn uniform(names: &[&'static str]) -> Self {
        let n = names.len();
        let w = if n == 0 { 0.0 } else { 1.0 / n as f64 };
        WeightMap {
            entries: names.iter().map(|&name| (name, w)).collect(),
        }
    }

    pub fn from_entries(entries: Vec<(&'static str, f64)>) -> Self {
        WeightMap { entries }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, w)| *w)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w).sum()
    }
}

pub struct RuleScorer {
    lookback: usize,
    sensitivity: f64,
    perf_floor: f64,
}

impl RuleScorer {
    pub fn new(config: &EngineConfig) -> Self {
        RuleScorer {
            lookback: config.lookback_window,
            sensitivity: config.sensitivity,
            perf_floor: config.perf_floor,
        }
    }

    /// Weights for the bar at `index`, from the trailing window only.
    pub fn get_current_weights(
        &self,
        table: &IndicatorTable,
        signals: &SignalSet,
        index: usize,
    ) -> WeightMap {
        let names = signals.names();
        if index < self.lookback || names.is_empty() {
            return WeightMap::uniform(&names);
        }

        let start = index - self.lookback;
        match self.rule_performance(table, signals, start, index) {
            Some(performance) => self.weights_from_performance(&names, &performance),
            None => WeightMap::uniform(&names),
        }
    }

    /// Compounded hypothetical return per rule over `[start, end)`.
    ///
    /// Returns `None` when the window cannot align a single signal/return
    /// pair (too short, or all returns undefined).
    fn rule_performance(
        &self,
        table: &IndicatorTable,
        signals: &SignalSet,
        start: usize,
        end: usize,
    ) -> Option<Vec<f64>> {
        if end < start + 2 || end > table.len() {
            return None;
        }

        let mut aligned_any = false;
        let mut performance = Vec::with_capacity(signals.columns.len());

        for column in &signals.columns {
            let mut compounded = 1.0;
            for t in start..end - 1 {
                let Some(next_return) = table.ret(t + 1) else {
                    continue;
                };
                aligned_any = true;
                compounded *= 1.0 + column.values[t] * next_return;
            }
            performance.push(compounded - 1.0);
        }

        aligned_any.then_some(performance)
    }

    fn weights_from_performance(&self, names: &[&'static str], performance: &[f64]) -> WeightMap {
        let scores: Vec<f64> = performance
            .iter()
            .map(|&p| (p.max(self.perf_floor) * self.sensitivity).exp())
            .collect();

        let total: f64 = scores.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            return WeightMap::uniform(names);
        }

        WeightMap::from_entries(
            names
                .iter()
                .zip(&scores)
                .map(|(&name, &s)| (name, s / total))
                .collect(),
        )
    }
}
