//! Signal-quality summary over a backtest run.
//!
//! A decision is scored against the following bar: a BUY followed by a higher
//! close counts as profitable, a SELL followed by a lower close likewise.
//! HOLD bars are never scored.

use crate::domain::backtest::BacktestRecord;
use crate::domain::decision::Action;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalQuality {
    pub total_bars: usize,
    pub buys: usize,
    pub sells: usize,
    pub holds: usize,
    pub profitable_buys: usize,
    pub profitable_sells: usize,
}

impl SignalQuality {
    pub fn from_records(records: &[BacktestRecord]) -> Self {
        let mut quality = SignalQuality {
            total_bars: records.len(),
            ..Default::default()
        };

        for record in records {
            match record.decision.action {
                Action::Buy => quality.buys += 1,
                Action::Sell => quality.sells += 1,
                Action::Hold => quality.holds += 1,
            }
        }

        for pair in records.windows(2) {
            let (prev, curr) = (&pair[0], &pair[1]);
            match prev.decision.action {
                Action::Buy if curr.close > prev.close => quality.profitable_buys += 1,
                Action::Sell if curr.close < prev.close => quality.profitable_sells += 1,
                _ => {}
            }
        }

        quality
    }

    pub fn buy_success_rate(&self) -> f64 {
        rate(self.profitable_buys, self.buys)
    }

    pub fn sell_success_rate(&self) -> f64 {
        rate(self.profitable_sells, self.sells)
    }

    pub fn overall_quality(&self) -> f64 {
        (self.buy_success_rate() + self.sell_success_rate()) / 2.0
    }
}

fn rate(hits: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

impl fmt::Display for SignalQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total periods: {}", self.total_bars)?;
        writeln!(
            f,
            "Buy: {}  Sell: {}  Hold: {}",
            self.buys, self.sells, self.holds
        )?;
        writeln!(
            f,
            "Buy success rate: {:.1}%",
            self.buy_success_rate() * 100.0
        )?;
        writeln!(
            f,
            "Sell success rate: {:.1}%",
            self.sell_success_rate() * 100.0
        )?;
        write!(
            f,
            "Overall signal quality: {:.1}%",
            self.overall_quality() * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::decision::{Action, Decision};
    use crate::domain::scorer::WeightMap;

    fn record(index: usize, close: f64, action: Action) -> BacktestRecord {
        BacktestRecord {
            index,
            ts: index as i64 * 60_000,
            close,
            signals: vec![],
            weights: WeightMap::uniform(&["a"]),
            decision: Decision {
                action,
                composite: 0.0,
                threshold: 0.3,
            },
        }
    }

    #[test]
    fn counts_decisions() {
        let records = vec![
            record(0, 100.0, Action::Buy),
            record(1, 101.0, Action::Hold),
            record(2, 99.0, Action::Sell),
            record(3, 98.0, Action::Hold),
        ];
        let q = SignalQuality::from_records(&records);
        assert_eq!(q.buys, 1);
        assert_eq!(q.sells, 1);
        assert_eq!(q.holds, 2);
        assert_eq!(q.total_bars, 4);
    }

    #[test]
    fn buy_profitable_when_next_close_higher() {
        let records = vec![
            record(0, 100.0, Action::Buy),
            record(1, 105.0, Action::Hold),
        ];
        let q = SignalQuality::from_records(&records);
        assert_eq!(q.profitable_buys, 1);
        assert!((q.buy_success_rate() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sell_profitable_when_next_close_lower() {
        let records = vec![
            record(0, 100.0, Action::Sell),
            record(1, 95.0, Action::Hold),
            record(2, 97.0, Action::Sell),
            record(3, 99.0, Action::Hold),
        ];
        let q = SignalQuality::from_records(&records);
        assert_eq!(q.sells, 2);
        assert_eq!(q.profitable_sells, 1);
        assert!((q.sell_success_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_run_rates_are_zero() {
        let q = SignalQuality::from_records(&[]);
        assert_eq!(q.buy_success_rate(), 0.0);
        assert_eq!(q.overall_quality(), 0.0);
    }

    #[test]
    fn last_decision_is_never_scored() {
        let records = vec![record(0, 100.0, Action::Buy)];
        let q = SignalQuality::from_records(&records);
        assert_eq!(q.buys, 1);
        assert_eq!(q.profitable_buys, 0);
    }
}
