//! Core domain types and logic.

pub mod ohlcv;
pub mod series;
pub mod settings;
pub mod config_validation;
pub mod indicator;
pub mod indicator_table;
pub mod rule;
pub mod scorer;
pub mod decision;
pub mod backtest;
pub mod metrics;
pub mod error;
