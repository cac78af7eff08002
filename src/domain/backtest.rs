//! Backtest orchestrator: the per-bar scoring and decision loop.
//!
//! Indicators and signal columns are computed once for the whole series; the
//! loop then walks bars from `lookback_window` to the end, fetching weights
//! from the scorer and a decision from the decision maker at each step. The
//! run is a pure function of (series, config, strict flag) — identical input
//! always produces an identical record sequence.

use crate::domain::decision::{Decision, DecisionContext, DecisionMaker};
use crate::domain::error::AdaptraderError;
use crate::domain::indicator_table::IndicatorTable;
use crate::domain::rule::{RuleRegistry, SignalSet};
use crate::domain::scorer::{RuleScorer, WeightMap};
use crate::domain::series::Series;
use crate::domain::settings::EngineConfig;

/// One evaluated bar.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestRecord {
    pub index: usize,
    pub ts: i64,
    pub close: f64,
    pub signals: Vec<(&'static str, f64)>,
    pub weights: WeightMap,
    pub decision: Decision,
}

/// Everything a writer needs: the full table, all signal columns, and one
/// record per evaluated bar (bars before `lookback_window` have no record).
#[derive(Debug)]
pub struct BacktestOutcome {
    pub table: IndicatorTable,
    pub signals: SignalSet,
    pub records: Vec<BacktestRecord>,
}

pub fn run_backtest(
    series: Series,
    config: &EngineConfig,
    registry: &RuleRegistry,
    strict: bool,
) -> Result<BacktestOutcome, AdaptraderError> {
    if registry.is_empty() {
        return Err(AdaptraderError::EmptyRegistry);
    }
    if series.len() <= config.lookback_window {
        return Err(AdaptraderError::InsufficientData {
            bars: series.len(),
            minimum: config.lookback_window + 1,
        });
    }

    let table = IndicatorTable::compute(series, config);
    let signals = registry.compute_signals(&table, config);
    let scorer = RuleScorer::new(config);
    let mut decision_maker = DecisionMaker::new(config, strict);

    let mut records = Vec::with_capacity(table.len() - config.lookback_window);
    for index in config.lookback_window..table.len() {
        let snapshot = signals.at(index);
        let weights = scorer.get_current_weights(&table, &signals, index);

        let ctx = DecisionContext {
            index,
            time_of_day: table.bar(index).time_of_day(),
            trailing_returns: trailing_returns(&table, index, config.volatility_window),
        };
        let decision = decision_maker.decide(&snapshot, &weights, &ctx);

        records.push(BacktestRecord {
            index,
            ts: table.bar(index).ts,
            close: table.bar(index).close,
            signals: snapshot,
            weights,
            decision,
        });
    }

    Ok(BacktestOutcome {
        table,
        signals,
        records,
    })
}

/// Returns of the bars strictly before `index`, within `window` bars.
fn trailing_returns(table: &IndicatorTable, index: usize, window: usize) -> Vec<f64> {
    let start = index.saturating_sub(window.saturating_sub(1));
    (start..index).filter_map(|t| table.ret(t)).collect()
}
