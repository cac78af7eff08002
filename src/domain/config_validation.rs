//! Configuration validation.
//!
//! Every field is checked before any computation runs; a bad value aborts
//! with a descriptive [`AdaptraderError::ConfigInvalid`].

use crate::domain::error::AdaptraderError;
use crate::domain::settings::EngineConfig;

pub fn validate_engine_config(config: &EngineConfig) -> Result<(), AdaptraderError> {
    validate_engine_section(config)?;
    validate_indicator_periods(config)?;
    validate_rule_levels(config)?;
    validate_thresholds(config)?;
    validate_strict_section(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> AdaptraderError {
    AdaptraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_engine_section(config: &EngineConfig) -> Result<(), AdaptraderError> {
    if config.lookback_window < 2 {
        return Err(invalid(
            "engine",
            "lookback_window",
            "lookback_window must be at least 2 bars",
        ));
    }
    if config.sensitivity <= 0.0 || !config.sensitivity.is_finite() {
        return Err(invalid(
            "engine",
            "sensitivity",
            "sensitivity must be a positive finite number",
        ));
    }
    if config.perf_floor >= 0.0 || config.perf_floor < -1.0 {
        return Err(invalid(
            "engine",
            "perf_floor",
            "perf_floor must be in [-1, 0)",
        ));
    }
    Ok(())
}

fn validate_indicator_periods(config: &EngineConfig) -> Result<(), AdaptraderError> {
    let periods = [
        ("rsi_period", config.rsi_period),
        ("ma_short", config.ma_short),
        ("ma_long", config.ma_long),
        ("ema_short", config.ema_short),
        ("ema_long", config.ema_long),
        ("bb_period", config.bb_period),
        ("macd_fast", config.macd_fast),
        ("macd_slow", config.macd_slow),
        ("macd_signal", config.macd_signal),
        ("adx_period", config.adx_period),
        ("volume_period", config.volume_period),
    ];
    for (key, value) in periods {
        if value == 0 {
            return Err(invalid(
                "indicators",
                key,
                format!("{key} must be positive"),
            ));
        }
    }
    if config.ma_short >= config.ma_long {
        return Err(invalid(
            "indicators",
            "ma_short",
            "ma_short must be less than ma_long",
        ));
    }
    if config.ema_short >= config.ema_long {
        return Err(invalid(
            "indicators",
            "ema_short",
            "ema_short must be less than ema_long",
        ));
    }
    if config.macd_fast >= config.macd_slow {
        return Err(invalid(
            "indicators",
            "macd_fast",
            "macd_fast must be less than macd_slow",
        ));
    }
    if config.bb_mult <= 0.0 {
        return Err(invalid(
            "indicators",
            "bb_mult",
            "bb_mult must be positive",
        ));
    }
    Ok(())
}

fn validate_rule_levels(config: &EngineConfig) -> Result<(), AdaptraderError> {
    for (key, value) in [
        ("rsi_overbought", config.rsi_overbought),
        ("rsi_oversold", config.rsi_oversold),
        ("cross_overbought", config.cross_overbought),
        ("cross_oversold", config.cross_oversold),
    ] {
        if !(0.0..=100.0).contains(&value) {
            return Err(invalid(
                "rules",
                key,
                format!("{key} must be between 0 and 100"),
            ));
        }
    }
    if config.rsi_oversold >= config.rsi_overbought {
        return Err(invalid(
            "rules",
            "rsi_oversold",
            "rsi_oversold must be below rsi_overbought",
        ));
    }
    if config.rsi_ma_period == 0 {
        return Err(invalid(
            "rules",
            "rsi_ma_period",
            "rsi_ma_period must be positive",
        ));
    }
    Ok(())
}

fn validate_thresholds(config: &EngineConfig) -> Result<(), AdaptraderError> {
    for (key, value) in [
        ("base_threshold", config.base_threshold),
        ("min_threshold", config.min_threshold),
        ("max_threshold", config.max_threshold),
        ("moderate_threshold", config.moderate_threshold),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(invalid(
                "decision",
                key,
                format!("{key} must be between 0 and 1"),
            ));
        }
    }
    if config.min_threshold > config.max_threshold {
        return Err(invalid(
            "decision",
            "min_threshold",
            "min_threshold must not exceed max_threshold",
        ));
    }
    if config.weight_significance < 0.0 || config.weight_significance > 1.0 {
        return Err(invalid(
            "decision",
            "weight_significance",
            "weight_significance must be between 0 and 1",
        ));
    }
    Ok(())
}

fn validate_strict_section(config: &EngineConfig) -> Result<(), AdaptraderError> {
    if config.max_volatility <= 0.0 {
        return Err(invalid(
            "strict",
            "max_volatility",
            "max_volatility must be positive",
        ));
    }
    if config.volatility_window < 2 {
        return Err(invalid(
            "strict",
            "volatility_window",
            "volatility_window must be at least 2",
        ));
    }
    if config.persistence_length == 0 {
        return Err(invalid(
            "strict",
            "persistence_length",
            "persistence_length must be positive",
        ));
    }
    if config.confirmation_bars == 0 || config.confirmation_bars > config.persistence_length {
        return Err(invalid(
            "strict",
            "confirmation_bars",
            "confirmation_bars must be between 1 and persistence_length",
        ));
    }
    for time in &config.avoid_times {
        if !is_hh_mm(time) {
            return Err(invalid(
                "strict",
                "avoid_times",
                format!("'{time}' is not a valid HH:MM time"),
            ));
        }
    }
    Ok(())
}

fn is_hh_mm(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return false;
    }
    let hh: u32 = match s[0..2].parse() {
        Ok(v) => v,
        Err(_) => return false,
    };
    let mm: u32 = match s[3..5].parse() {
        Ok(v) => v,
        Err(_) => return false,
    };
    hh < 24 && mm < 60
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settings::EngineConfig;

    #[test]
    fn daily_preset_is_valid() {
        assert!(validate_engine_config(&EngineConfig::daily()).is_ok());
    }

    #[test]
    fn intraday_preset_is_valid() {
        assert!(validate_engine_config(&EngineConfig::intraday()).is_ok());
    }

    #[test]
    fn rejects_tiny_lookback() {
        let config = EngineConfig {
            lookback_window: 1,
            ..EngineConfig::daily()
        };
        let err = validate_engine_config(&config).unwrap_err();
        assert!(err.to_string().contains("lookback_window"));
    }

    #[test]
    fn rejects_zero_period() {
        let config = EngineConfig {
            rsi_period: 0,
            ..EngineConfig::daily()
        };
        assert!(validate_engine_config(&config).is_err());
    }

    #[test]
    fn rejects_inverted_ma_windows() {
        let config = EngineConfig {
            ma_short: 200,
            ma_long: 50,
            ..EngineConfig::daily()
        };
        let err = validate_engine_config(&config).unwrap_err();
        assert!(err.to_string().contains("ma_short"));
    }

    #[test]
    fn rejects_threshold_above_one() {
        let config = EngineConfig {
            base_threshold: 1.5,
            ..EngineConfig::daily()
        };
        assert!(validate_engine_config(&config).is_err());
    }

    #[test]
    fn rejects_inverted_threshold_bounds() {
        let config = EngineConfig {
            min_threshold: 0.8,
            max_threshold: 0.2,
            ..EngineConfig::daily()
        };
        assert!(validate_engine_config(&config).is_err());
    }

    #[test]
    fn rejects_positive_perf_floor() {
        let config = EngineConfig {
            perf_floor: 0.1,
            ..EngineConfig::daily()
        };
        assert!(validate_engine_config(&config).is_err());
    }

    #[test]
    fn rejects_malformed_avoid_time() {
        let config = EngineConfig {
            avoid_times: vec!["25:00".into()],
            ..EngineConfig::daily()
        };
        assert!(validate_engine_config(&config).is_err());

        let config = EngineConfig {
            avoid_times: vec!["0600".into()],
            ..EngineConfig::daily()
        };
        assert!(validate_engine_config(&config).is_err());
    }

    #[test]
    fn rejects_confirmation_longer_than_buffer() {
        let config = EngineConfig {
            confirmation_bars: 6,
            persistence_length: 5,
            ..EngineConfig::daily()
        };
        assert!(validate_engine_config(&config).is_err());
    }

    #[test]
    fn hh_mm_parsing() {
        assert!(is_hh_mm("00:00"));
        assert!(is_hh_mm("23:59"));
        assert!(!is_hh_mm("24:00"));
        assert!(!is_hh_mm("12:60"));
        assert!(!is_hh_mm("1:30"));
    }
}
