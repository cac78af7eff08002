//! Report-writing port.

use crate::domain::backtest::BacktestOutcome;
use crate::domain::error::AdaptraderError;

/// Port for writing the decision-augmented output table.
pub trait ReportPort {
    fn write(&self, outcome: &BacktestOutcome, output_path: &str) -> Result<(), AdaptraderError>;
}
