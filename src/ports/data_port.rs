//! Data access port.

use crate::domain::error::AdaptraderError;
use crate::domain::ohlcv::OhlcvBar;

/// Summary of a data source: (first_ts, last_ts, bar count, symbol).
pub type SourceInfo = (i64, i64, usize, String);

pub trait DataPort {
    /// Load all bars from `source` (a path for file-backed adapters).
    fn load_series(&self, source: &str) -> Result<Vec<OhlcvBar>, AdaptraderError>;

    /// Time range and size of `source` without preparing a full series.
    fn describe(&self, source: &str) -> Result<Option<SourceInfo>, AdaptraderError> {
        let bars = self.load_series(source)?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => {
                Some((first.ts, last.ts, bars.len(), first.symbol.clone()))
            }
            _ => None,
        })
    }
}
