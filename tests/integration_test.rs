//! Integration tests for the full engine pipeline.
//!
//! Tests cover:
//! - Series preparation through backtest to signal-quality metrics
//! - One record per evaluated bar, none before the lookback window
//! - Weight normalization at every evaluated bar
//! - Determinism: identical inputs give identical records
//! - Strict mode only ever demotes decisions to HOLD
//! - Error paths: insufficient data, empty registry
//! - Report adapter round trip through the filesystem

mod common;

use common::*;
use adaptrader::adapters::csv_report_adapter::CsvReportAdapter;
use adaptrader::domain::backtest::{run_backtest, BacktestOutcome};
use adaptrader::domain::decision::Action;
use adaptrader::domain::error::AdaptraderError;
use adaptrader::domain::metrics::SignalQuality;
use adaptrader::domain::rule::RuleRegistry;
use adaptrader::domain::series::Series;
use adaptrader::domain::settings::EngineConfig;
use adaptrader::ports::data_port::DataPort;
use adaptrader::ports::report_port::ReportPort;

fn run_wave(n: usize, strict: bool) -> BacktestOutcome {
    let series = Series::prepare(make_bars(&wave_closes(n))).unwrap();
    run_backtest(series, &small_config(), &RuleRegistry::standard(), strict).unwrap()
}

mod full_pipeline {
    use super::*;

    #[test]
    fn one_record_per_evaluated_bar() {
        let outcome = run_wave(60, false);
        let config = small_config();

        assert_eq!(outcome.records.len(), 60 - config.lookback_window);
        assert_eq!(outcome.records[0].index, config.lookback_window);
        for pair in outcome.records.windows(2) {
            assert_eq!(pair[1].index, pair[0].index + 1);
        }
    }

    #[test]
    fn weights_normalized_at_every_bar() {
        let outcome = run_wave(60, false);
        for record in &outcome.records {
            let sum = record.weights.sum();
            assert!(
                (sum - 1.0).abs() < 1e-6,
                "weights at bar {} sum to {}",
                record.index,
                sum
            );
            for (name, w) in record.weights.iter() {
                assert!(
                    (0.0..=1.0 + 1e-9).contains(&w),
                    "weight {} at bar {} is {}",
                    name,
                    record.index,
                    w
                );
            }
        }
    }

    #[test]
    fn composites_stay_in_signal_range() {
        let outcome = run_wave(60, false);
        for record in &outcome.records {
            assert!(
                (-1.0 - 1e-9..=1.0 + 1e-9).contains(&record.decision.composite),
                "composite at bar {} is {}",
                record.index,
                record.decision.composite
            );
        }
    }

    #[test]
    fn every_registered_rule_has_a_weight() {
        let outcome = run_wave(60, false);
        let names = outcome.signals.names();
        assert_eq!(names, vec!["rsi", "ma", "bb", "rsi_ma", "macd"]);
        for record in &outcome.records {
            for name in &names {
                assert!(record.weights.get(name).is_some());
            }
        }
    }

    #[test]
    fn signal_quality_accounts_for_all_records() {
        let outcome = run_wave(60, false);
        let quality = SignalQuality::from_records(&outcome.records);

        assert_eq!(quality.total_bars, outcome.records.len());
        assert_eq!(
            quality.buys + quality.sells + quality.holds,
            quality.total_bars
        );
        assert!(quality.profitable_buys <= quality.buys);
        assert!(quality.profitable_sells <= quality.sells);
    }

    #[test]
    fn unsorted_input_is_sorted_before_the_run() {
        let mut bars = make_bars(&wave_closes(60));
        bars.reverse();
        let series = Series::prepare(bars).unwrap();
        let outcome = run_backtest(
            series,
            &small_config(),
            &RuleRegistry::standard(),
            false,
        )
        .unwrap();

        let sorted = run_wave(60, false);
        assert_eq!(outcome.records, sorted.records);
    }

    #[test]
    fn pipeline_runs_through_the_data_port() {
        let port = MockDataPort {
            bars: make_bars(&wave_closes(60)),
        };
        let bars = port.load_series("unused").unwrap();
        let series = Series::prepare(bars).unwrap();
        let outcome = run_backtest(
            series,
            &small_config(),
            &RuleRegistry::standard(),
            false,
        )
        .unwrap();

        assert_eq!(outcome.records, run_wave(60, false).records);
        let info = port.describe("unused").unwrap().unwrap();
        assert_eq!(info, (BAR_MS, 60 * BAR_MS, 60, "BTCUSDT".to_string()));
    }
}

mod determinism {
    use super::*;

    #[test]
    fn identical_inputs_identical_records() {
        let a = run_wave(80, false);
        let b = run_wave(80, false);
        assert_eq!(a.records, b.records);
    }

    #[test]
    fn rendered_report_is_identical_too() {
        let a = CsvReportAdapter::render(&run_wave(80, false)).unwrap();
        let b = CsvReportAdapter::render(&run_wave(80, false)).unwrap();
        assert_eq!(a, b);
    }
}

mod strict_mode {
    use super::*;

    #[test]
    fn strict_only_demotes_to_hold() {
        let relaxed = run_wave(80, false);
        let strict = run_wave(80, true);
        assert_eq!(relaxed.records.len(), strict.records.len());

        for (r, s) in relaxed.records.iter().zip(&strict.records) {
            // Composite and threshold are filter-independent.
            assert_eq!(r.decision.composite, s.decision.composite);
            assert_eq!(r.decision.threshold, s.decision.threshold);
            if s.decision.action != r.decision.action {
                assert_eq!(s.decision.action, Action::Hold);
            }
        }
    }

    #[test]
    fn strict_never_trades_during_avoided_times() {
        let config = EngineConfig {
            // Bars start at 00:15 and step by 15 minutes; bar 19 opens at 05:00,
            // well past the 12-bar lookback.
            avoid_times: vec!["05:00".into()],
            confirmation_bars: 1,
            ..small_config()
        };
        let series = Series::prepare(make_bars(&wave_closes(80))).unwrap();
        let outcome =
            run_backtest(series, &config, &RuleRegistry::standard(), true).unwrap();

        let mut hit = false;
        for record in &outcome.records {
            let minutes = (record.ts / 60_000) % (24 * 60);
            if minutes == 300 {
                hit = true;
                assert_eq!(record.decision.action, Action::Hold);
            }
        }
        assert!(hit, "fixture never reached the avoided time");
    }
}

mod error_paths {
    use super::*;

    #[test]
    fn too_few_bars_is_an_error() {
        let config = small_config();
        let series = Series::prepare(make_bars(&wave_closes(config.lookback_window))).unwrap();
        let result = run_backtest(series, &config, &RuleRegistry::standard(), false);
        assert!(matches!(
            result,
            Err(AdaptraderError::InsufficientData { bars: 12, minimum: 13 })
        ));
    }

    #[test]
    fn empty_registry_is_an_error() {
        let series = Series::prepare(make_bars(&wave_closes(60))).unwrap();
        let result = run_backtest(
            series,
            &small_config(),
            &RuleRegistry::with_rules(vec![]),
            false,
        );
        assert!(matches!(result, Err(AdaptraderError::EmptyRegistry)));
    }

    #[test]
    fn duplicate_timestamps_rejected_at_preparation() {
        let mut bars = make_bars(&wave_closes(20));
        bars[5].ts = bars[4].ts;
        assert!(matches!(
            Series::prepare(bars),
            Err(AdaptraderError::DuplicateTimestamp { .. })
        ));
    }
}

mod report_round_trip {
    use super::*;

    #[test]
    fn written_file_aligns_with_input() {
        let outcome = run_wave(60, false);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        CsvReportAdapter::new()
            .write(&outcome, &path.display().to_string())
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 61); // header + 60 bars

        let header = content.lines().next().unwrap();
        assert!(header.contains("composite_signal"));
        assert!(header.contains("weight_macd"));
    }
}
