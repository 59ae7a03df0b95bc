mod common;

use exit_optimizer::core::outcome::PipsSource;
use exit_optimizer::core::{evaluate, evaluate_default, ExitStrategy, BASELINE, TP6_SPLIT};
use exit_optimizer::models::{Action, RiskLevel, Signal};
use exit_optimizer::store::{InMemorySource, JsonFileSource, SignalSource};
use exit_optimizer::trading::{optimize, OptimizerSettings, SignalHistory, StrategyOptimizer};
use exit_optimizer::EngineError;

use common::{gold_signal, history};

#[test]
fn gold_scenario_matches_worked_example() {
    let s = Signal::new(1, "XAUUSD", Action::Buy, 2000.0)
        .with_take_profits(&[2010.0])
        .with_hits(&[1]);
    let e = evaluate(&s, &BASELINE);
    assert!((e.profit_percent - 2.5).abs() < 1e-9);
    assert!((e.pips - 100.0).abs() < 1e-9);
}

#[test]
fn high_risk_stop_loss_is_minus_three_for_every_candidate() {
    let s = gold_signal(1, 0, RiskLevel::High);
    let e = evaluate_default(&s);
    assert_eq!(e.profit_percent, -3.0);
    assert!((e.pips - -150.0).abs() < 1e-6);
    assert_eq!(e.pips_source, PipsSource::Computed);

    let report = optimize(&[s], 20, true, 500).unwrap();
    assert!(report.top.iter().all(|r| r.stats.total_pl_percent == -3.0));
}

#[test]
fn tp6_split_only_applies_when_chosen() {
    // TP5 reached, TP6 price recorded: the baseline still closes 10% at TP5.
    let s = gold_signal(1, 5, RiskLevel::Medium);
    let base = evaluate(&s, &BASELINE);
    let split = evaluate(&s, &TP6_SPLIT);
    assert_eq!(base.tp_breakdown[4].fraction, 0.10);
    assert_eq!(split.tp_breakdown[4].fraction, 0.05);
    assert!(base.profit_percent > split.profit_percent);
}

#[test]
fn pipeline_from_json_file_to_report() {
    let dir = std::env::temp_dir().join(format!("exit_opt_integ_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("signals.json");
    std::fs::write(&path, serde_json::to_string_pretty(&history()).unwrap()).unwrap();

    let signals = JsonFileSource::new(&path).load_signals().unwrap();
    assert_eq!(signals.len(), 6);

    let optimizer = StrategyOptimizer::new(OptimizerSettings {
        step: 10,
        include_sixth_slot: false,
        top_n: 5,
        parallel: true,
        time_budget: None,
    });
    let report = optimizer.optimize(&signals).unwrap();
    assert_eq!(report.candidates_evaluated, 1001);
    assert_eq!(report.signals, 6);
    assert_eq!(report.top.len(), 5);

    let leader = report.leader().unwrap();
    assert!(leader.stats.total_pl_percent >= report.baseline.stats.total_pl_percent);
    assert!(report.best_by_win_rate.stats.win_rate >= leader.stats.win_rate);
    let sum: u32 = leader.strategy.percentages().iter().sum();
    assert_eq!(sum, 100);

    report.save_json(&dir.join("report.json")).unwrap();
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn history_and_optimizer_agree_on_baseline_pl() {
    let signals = InMemorySource::new(history()).load_signals().unwrap();
    let h = SignalHistory::build(&signals, &BASELINE, None);
    let report = optimize(&signals, 25, false, 1).unwrap();
    assert_eq!(h.summary.incomplete_signals, 0);
    assert!((h.summary.total_pl_percent - report.baseline.stats.total_pl_percent).abs() < 1e-9);
}

#[test]
fn externally_supplied_strategy_is_validated() {
    let err = ExitStrategy::new([0.6, 0.6, 0.0, 0.0, 0.0, 0.0]).unwrap_err();
    assert!(matches!(err, EngineError::InvalidStrategy { .. }));
}

#[test]
fn time_budget_of_zero_aborts() {
    let optimizer = StrategyOptimizer::new(OptimizerSettings {
        step: 1,
        include_sixth_slot: false,
        top_n: 5,
        parallel: false,
        time_budget: Some(std::time::Duration::ZERO),
    });
    let err = optimizer.optimize(&history()).unwrap_err();
    assert!(matches!(err, EngineError::Aborted { .. }));
}
