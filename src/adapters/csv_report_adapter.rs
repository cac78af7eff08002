//! CSV report adapter: writes the decision-augmented output table.
//!
//! Every input row appears exactly once, keyed by an explicit `index` column,
//! so the output aligns 1:1 with the input. Warm-up cells (indicators inside
//! their windows, bars before the lookback) are left empty rather than filled
//! with sentinels.

use crate::domain::backtest::BacktestOutcome;
use crate::domain::error::AdaptraderError;
use crate::ports::report_port::ReportPort;
use std::path::Path;

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        CsvReportAdapter
    }

    pub fn render(outcome: &BacktestOutcome) -> Result<String, AdaptraderError> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        let rule_names = outcome.signals.names();

        let mut header: Vec<String> = [
            "index", "timestamp", "symbol", "open", "high", "low", "close", "volume", "returns",
            "rsi", "rsi_ma", "ma_short", "ma_long", "ema_short", "ema_long", "bb_upper",
            "bb_middle", "bb_lower", "macd", "macd_signal", "macd_hist", "adx", "volume_ma",
            "volume_strength",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        for name in &rule_names {
            header.push(format!("signal_{name}"));
        }
        header.extend(
            ["composite_signal", "decision", "threshold"]
                .iter()
                .map(|s| s.to_string()),
        );
        for name in &rule_names {
            header.push(format!("weight_{name}"));
        }
        wtr.write_record(&header).map_err(write_err)?;

        let table = &outcome.table;
        let first_record_index = outcome.records.first().map(|r| r.index);

        for i in 0..table.len() {
            let bar = table.bar(i);
            let mut row: Vec<String> = vec![
                i.to_string(),
                bar.ts.to_string(),
                bar.symbol.clone(),
                bar.open.to_string(),
                bar.high.to_string(),
                bar.low.to_string(),
                bar.close.to_string(),
                bar.volume.to_string(),
                opt(table.ret(i)),
                opt(table.rsi.simple_at(i)),
                opt(table.rsi_ma.simple_at(i)),
                opt(table.ma_short.simple_at(i)),
                opt(table.ma_long.simple_at(i)),
                opt(table.ema_short.simple_at(i)),
                opt(table.ema_long.simple_at(i)),
            ];

            let (bb_upper, bb_middle, bb_lower) = match table.bollinger.bollinger_at(i) {
                Some((u, m, l)) => (u.to_string(), m.to_string(), l.to_string()),
                None => (String::new(), String::new(), String::new()),
            };
            row.extend([bb_upper, bb_middle, bb_lower]);

            let (macd, macd_signal, macd_hist) = match table.macd.macd_at(i) {
                Some((line, signal, hist)) => {
                    (line.to_string(), signal.to_string(), hist.to_string())
                }
                None => (String::new(), String::new(), String::new()),
            };
            row.extend([macd, macd_signal, macd_hist]);

            row.push(opt(table.adx.simple_at(i)));
            row.push(opt(table.volume_ma.simple_at(i)));
            row.push(opt(table.volume_strength.simple_at(i)));

            for name in &rule_names {
                let signal = outcome
                    .signals
                    .column(name)
                    .and_then(|c| c.values.get(i).copied())
                    .unwrap_or(0.0);
                row.push(signal.to_string());
            }

            let record = first_record_index
                .filter(|&first| i >= first)
                .and_then(|first| outcome.records.get(i - first));

            match record {
                Some(r) => {
                    row.push(r.decision.composite.to_string());
                    row.push(r.decision.action.to_string());
                    row.push(r.decision.threshold.to_string());
                    for name in &rule_names {
                        row.push(opt(r.weights.get(name)));
                    }
                }
                None => {
                    row.extend([String::new(), String::new(), String::new()]);
                    for _ in &rule_names {
                        row.push(String::new());
                    }
                }
            }

            wtr.write_record(&row).map_err(write_err)?;
        }

        let bytes = wtr.into_inner().map_err(|e| AdaptraderError::Data {
            reason: format!("CSV flush error: {e}"),
        })?;
        String::from_utf8(bytes).map_err(|e| AdaptraderError::Data {
            reason: format!("CSV output is not UTF-8: {e}"),
        })
    }
}

fn opt(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

fn write_err(e: csv::Error) -> AdaptraderError {
    AdaptraderError::Data {
        reason: format!("CSV write error: {e}"),
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, outcome: &BacktestOutcome, output_path: &str) -> Result<(), AdaptraderError> {
        let rendered = Self::render(outcome)?;
        std::fs::write(Path::new(output_path), rendered)?;
        Ok(())
    }
}
