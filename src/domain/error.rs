//! Domain error types.
//!
//! Only configuration and input-data problems are errors. Insufficient-data and
//! numerical-degeneracy conditions are handled by fallbacks (uniform weights,
//! HOLD decisions) and never surface here.

/// Top-level error type for adaptrader.
#[derive(Debug, thiserror::Error)]
pub enum AdaptraderError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("missing required column '{column}' in {file}")]
    MissingColumn { column: String, file: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("timestamps out of order at row {row}: {prev} followed by {curr}")]
    UnorderedSeries { row: usize, prev: i64, curr: i64 },

    #[error("duplicate timestamp {ts} at row {row}")]
    DuplicateTimestamp { row: usize, ts: i64 },

    #[error("empty rule registry")]
    EmptyRegistry,

    #[error("insufficient data: have {bars} bars, need at least {minimum}")]
    InsufficientData { bars: usize, minimum: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&AdaptraderError> for std::process::ExitCode {
    fn from(err: &AdaptraderError) -> Self {
        let code: u8 = match err {
            AdaptraderError::Io(_) => 1,
            AdaptraderError::ConfigParse { .. }
            | AdaptraderError::ConfigMissing { .. }
            | AdaptraderError::ConfigInvalid { .. }
            | AdaptraderError::EmptyRegistry => 2,
            AdaptraderError::MissingColumn { .. } | AdaptraderError::Data { .. } => 3,
            AdaptraderError::UnorderedSeries { .. }
            | AdaptraderError::DuplicateTimestamp { .. }
            | AdaptraderError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
