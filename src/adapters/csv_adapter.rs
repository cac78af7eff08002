//! CSV file data adapter.
//!
//! Columns are resolved by header name (case-insensitive), not position;
//! extra columns are ignored. Ordering is enforced here, at the boundary:
//! the core receives a strictly increasing, duplicate-free series or nothing.

use crate::domain::error::AdaptraderError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use std::fs;
use std::path::Path;

pub struct CsvAdapter;

impl CsvAdapter {
    pub fn new() -> Self {
        CsvAdapter
    }

    /// Parse CSV text into bars; `file` names the source for error messages.
    pub fn parse(content: &str, file: &str) -> Result<Vec<OhlcvBar>, AdaptraderError> {
        let mut rdr = csv::Reader::from_reader(content.as_bytes());

        let headers = rdr
            .headers()
            .map_err(|e| AdaptraderError::Data {
                reason: format!("CSV header error in {file}: {e}"),
            })?
            .clone();

        let column = |name: &str| -> Result<usize, AdaptraderError> {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| AdaptraderError::MissingColumn {
                    column: name.to_string(),
                    file: file.to_string(),
                })
        };

        let ts_col = column("timestamp")?;
        let open_col = column("open")?;
        let high_col = column("high")?;
        let low_col = column("low")?;
        let close_col = column("close")?;
        let volume_col = column("volume")?;
        let symbol_col = column("symbol")?;

        let mut bars = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| AdaptraderError::Data {
                reason: format!("CSV parse error in {file} row {row}: {e}"),
            })?;

            let field = |col: usize, name: &str| -> Result<&str, AdaptraderError> {
                record.get(col).ok_or_else(|| AdaptraderError::Data {
                    reason: format!("row {row} of {file} is missing the {name} field"),
                })
            };
            let float = |col: usize, name: &str| -> Result<f64, AdaptraderError> {
                field(col, name)?
                    .trim()
                    .parse()
                    .map_err(|e| AdaptraderError::Data {
                        reason: format!("invalid {name} value in {file} row {row}: {e}"),
                    })
            };

            let ts: i64 =
                field(ts_col, "timestamp")?
                    .trim()
                    .parse()
                    .map_err(|e| AdaptraderError::Data {
                        reason: format!("invalid timestamp in {file} row {row}: {e}"),
                    })?;

            bars.push(OhlcvBar {
                symbol: field(symbol_col, "symbol")?.trim().to_string(),
                ts,
                open: float(open_col, "open")?,
                high: float(high_col, "high")?,
                low: float(low_col, "low")?,
                close: float(close_col, "close")?,
                volume: float(volume_col, "volume")?,
            });
        }

        for i in 1..bars.len() {
            if bars[i].ts == bars[i - 1].ts {
                return Err(AdaptraderError::DuplicateTimestamp {
                    row: i,
                    ts: bars[i].ts,
                });
            }
            if bars[i].ts < bars[i - 1].ts {
                return Err(AdaptraderError::UnorderedSeries {
                    row: i,
                    prev: bars[i - 1].ts,
                    curr: bars[i].ts,
                });
            }
        }

        Ok(bars)
    }
}

impl Default for CsvAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl DataPort for CsvAdapter {
    fn load_series(&self, source: &str) -> Result<Vec<OhlcvBar>, AdaptraderError> {
        let content = fs::read_to_string(Path::new(source))?;
        Self::parse(&content, source)
    }
}
