//! Technical indicator implementations.
//!
//! Types for representing indicator values and series:
//! - `IndicatorPoint`: a single point in an indicator time series, with a
//!   validity flag covering the warm-up window
//! - `IndicatorValue`: enum for different indicator output shapes
//! - `IndicatorType`: enum for indicator identity + parameters
//! - `IndicatorSeries`: a time series of indicator values

pub mod rsi;
pub mod sma;
pub mod ema;
pub mod bollinger;
pub mod macd;
pub mod adx;
pub mod volume;

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub ts: i64,
    pub valid: bool,
    pub value: IndicatorValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
    Bollinger {
        upper: f64,
        middle: f64,
        lower: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Rsi(usize),
    Sma(usize),
    Ema(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
    Adx(usize),
    VolumeMa(usize),
    VolumeStrength(usize),
    /// SMA of the RSI series itself, used by the rsi_ma cross rule.
    RsiMa {
        rsi: usize,
        smoothing: usize,
    },
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// The scalar value at `index`, or `None` during warm-up / out of range.
    pub fn simple_at(&self, index: usize) -> Option<f64> {
        match self.values.get(index) {
            Some(IndicatorPoint {
                valid: true,
                value: IndicatorValue::Simple(v),
                ..
            }) => Some(*v),
            _ => None,
        }
    }

    /// The (line, signal, histogram) triple at `index`, if defined.
    pub fn macd_at(&self, index: usize) -> Option<(f64, f64, f64)> {
        match self.values.get(index) {
            Some(IndicatorPoint {
                valid: true,
                value:
                    IndicatorValue::Macd {
                        line,
                        signal,
                        histogram,
                    },
                ..
            }) => Some((*line, *signal, *histogram)),
            _ => None,
        }
    }

    /// The (upper, middle, lower) triple at `index`, if defined.
    pub fn bollinger_at(&self, index: usize) -> Option<(f64, f64, f64)> {
        match self.values.get(index) {
            Some(IndicatorPoint {
                valid: true,
                value:
                    IndicatorValue::Bollinger {
                        upper,
                        middle,
                        lower,
                    },
                ..
            }) => Some((*upper, *middle, *lower)),
            _ => None,
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
            IndicatorType::Adx(period) => write!(f, "ADX({})", period),
            IndicatorType::VolumeMa(period) => write!(f, "VOLUME_MA({})", period),
            IndicatorType::VolumeStrength(period) => write!(f, "VOLUME_STRENGTH({})", period),
            IndicatorType::RsiMa { rsi, smoothing } => write!(f, "RSI_MA({},{})", rsi, smoothing),
        }
    }
}
