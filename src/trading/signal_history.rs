use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::exit_strategy::ExitStrategy;
use crate::core::outcome::{evaluate, Evaluation, PipsSource};
use crate::models::instrument::price_decimals;
use crate::models::{classify, OutcomeClass, Signal, TP_SLOTS};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolStats {
    pub signals: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub total_pl_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub total_signals: usize,
    /// Win/loss counts and win rates cover complete signals only.
    pub winning_signals: usize,
    pub losing_signals: usize,
    /// Signals whose profit rests on missing prices; left out of the P&L
    /// and pip totals.
    pub incomplete_signals: usize,
    pub win_rate: f64,
    pub total_pl_percent: f64,
    /// Sum of measured pip distances only.
    pub total_pips: f64,
    /// Sum of instrument-typical stop estimates, kept apart from `total_pips`.
    pub estimated_stop_pips: f64,
    pub tp_distribution: BTreeMap<String, usize>,
    pub by_symbol: BTreeMap<String, SymbolStats>,
}

/// Per-signal evaluations under one strategy plus their summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalHistory {
    pub strategy: ExitStrategy,
    pub evaluations: Vec<Evaluation>,
    pub summary: HistorySummary,
}

impl SignalHistory {
    /// Evaluates `signals`, keeping only `symbol` when given.
    pub fn build(signals: &[Signal], strategy: &ExitStrategy, symbol: Option<&str>) -> Self {
        let evaluations: Vec<Evaluation> = signals
            .iter()
            .filter(|s| symbol.map_or(true, |sym| s.symbol.eq_ignore_ascii_case(sym)))
            .map(|s| evaluate(s, strategy))
            .collect();
        let summary = summarize(&evaluations);
        Self {
            strategy: *strategy,
            evaluations,
            summary,
        }
    }

    pub fn print_summary(&self) {
        let s = &self.summary;
        println!("\n{}", "=".repeat(70));
        println!("  SIGNAL HISTORY ({})", self.strategy);
        println!("{}", "=".repeat(70));
        for e in &self.evaluations {
            let decimals = price_decimals(classify(&e.symbol));
            let exit = e
                .exit_price
                .map(|p| format!("{:.*}", decimals, p))
                .unwrap_or_else(|| "-".to_string());
            let estimated = if e.pips_source == PipsSource::Estimated { "~" } else { "" };
            let flag = if e.is_complete() { "" } else { " [incomplete]" };
            println!(
                "  #{:<5} {:<8} {:<8} exit {:>10} | {}{:+.1} pips | {:+.2}%{}",
                e.signal_number,
                e.symbol,
                e.outcome,
                exit,
                estimated,
                e.pips,
                e.profit_percent,
                flag
            );
            for row in &e.tp_breakdown {
                println!(
                    "          TP{} {:.*} | {:+.1} pips | {:>3.0}% exit | {:+.2}%",
                    row.tp_level,
                    decimals,
                    row.price,
                    row.pips,
                    row.fraction * 100.0,
                    row.profit_percent
                );
            }
        }
        println!();
        println!("  SUMMARY");
        println!("  ───────────────────────────────────");
        println!(
            "  Signals:     {} ({} incomplete)",
            s.total_signals, s.incomplete_signals
        );
        println!(
            "  Win/Loss:    {} / {}",
            s.winning_signals, s.losing_signals
        );
        println!("  Win Rate:    {:.1}%", s.win_rate * 100.0);
        println!("  Total P/L:   {:+.2}%", s.total_pl_percent);
        println!(
            "  Pips:        {:+.1} (+ {:.1} estimated on stops)",
            s.total_pips, s.estimated_stop_pips
        );
        let dist: Vec<String> = s
            .tp_distribution
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        println!("  Outcomes:    {}", dist.join(" "));

        if !s.by_symbol.is_empty() {
            println!();
            println!("  BY SYMBOL");
            println!("  ───────────────────────────────────");
            let mut symbols: Vec<_> = s.by_symbol.iter().collect();
            symbols.sort_by(|a, b| b.1.total_pl_percent.total_cmp(&a.1.total_pl_percent));
            for (symbol, st) in symbols {
                println!(
                    "  {:>8}: {} signals | WR {:.0}% | P/L {:+.2}%",
                    symbol,
                    st.signals,
                    st.win_rate * 100.0,
                    st.total_pl_percent
                );
            }
        }
        println!("{}", "=".repeat(70));
    }
}

pub fn summarize(evaluations: &[Evaluation]) -> HistorySummary {
    let mut tp_distribution = BTreeMap::new();
    tp_distribution.insert("SL".to_string(), 0);
    for level in 1..=TP_SLOTS {
        tp_distribution.insert(format!("TP{}", level), 0);
    }

    let mut summary = HistorySummary {
        total_signals: evaluations.len(),
        winning_signals: 0,
        losing_signals: 0,
        incomplete_signals: 0,
        win_rate: 0.0,
        total_pl_percent: 0.0,
        total_pips: 0.0,
        estimated_stop_pips: 0.0,
        tp_distribution,
        by_symbol: BTreeMap::new(),
    };

    for e in evaluations {
        let key = if e.is_stop_loss() {
            "SL".to_string()
        } else {
            format!("TP{}", e.highest_tp)
        };
        *summary.tp_distribution.entry(key).or_default() += 1;

        if !e.is_complete() {
            summary.incomplete_signals += 1;
            continue;
        }

        let symbol = summary.by_symbol.entry(e.symbol.clone()).or_default();
        symbol.signals += 1;
        match e.outcome_class {
            OutcomeClass::Win => {
                summary.winning_signals += 1;
                symbol.wins += 1;
            }
            OutcomeClass::Loss => {
                summary.losing_signals += 1;
                symbol.losses += 1;
            }
        }
        summary.total_pl_percent += e.profit_percent;
        symbol.total_pl_percent += e.profit_percent;
        match e.pips_source {
            PipsSource::Computed => summary.total_pips += e.pips,
            PipsSource::Estimated => summary.estimated_stop_pips += e.pips,
            PipsSource::Unavailable => {}
        }
    }

    let scored = summary.total_signals - summary.incomplete_signals;
    if scored > 0 {
        summary.win_rate = summary.winning_signals as f64 / scored as f64;
    }
    for st in summary.by_symbol.values_mut() {
        st.win_rate = if st.signals > 0 {
            st.wins as f64 / st.signals as f64
        } else {
            0.0
        };
    }
    summary
}
