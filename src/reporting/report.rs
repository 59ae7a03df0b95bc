use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use crate::error::Result;
use crate::trading::optimizer::{OptimizerSettings, RankedStrategy};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub generated_at: DateTime<Utc>,

    // Search space
    pub step: u32,
    pub include_sixth_slot: bool,
    pub candidates_evaluated: usize,
    pub elapsed_secs: f64,

    // Data; `signals` counts every loaded signal, incomplete ones included
    pub signals: usize,
    pub incomplete_signals: usize,

    // Results
    pub baseline: RankedStrategy,
    pub top: Vec<RankedStrategy>,
    pub best_by_win_rate: RankedStrategy,
    /// True when the best win rate belongs to a different allocation than
    /// the best total P&L.
    pub win_rate_diverges: bool,
}

impl OptimizationReport {
    pub fn new(
        settings: &OptimizerSettings,
        baseline: RankedStrategy,
        top: Vec<RankedStrategy>,
        best_by_win_rate: RankedStrategy,
        candidates_evaluated: usize,
        incomplete_signals: usize,
        elapsed: Duration,
    ) -> Self {
        let win_rate_diverges = top
            .first()
            .is_some_and(|leader| leader.strategy != best_by_win_rate.strategy);

        Self {
            generated_at: Utc::now(),
            step: settings.step,
            include_sixth_slot: settings.include_sixth_slot,
            candidates_evaluated,
            elapsed_secs: elapsed.as_secs_f64(),
            signals: baseline.stats.signals + incomplete_signals,
            incomplete_signals,
            baseline,
            top,
            best_by_win_rate,
            win_rate_diverges,
        }
    }

    /// Highest total P&L allocation.
    pub fn leader(&self) -> Option<&RankedStrategy> {
        self.top.first()
    }

    pub fn print_summary(&self) {
        println!("\n{}", "=".repeat(70));
        println!("  PARTIAL EXIT OPTIMIZATION");
        println!("{}", "=".repeat(70));
        println!(
            "  Signals:     {} ({} incomplete)",
            self.signals, self.incomplete_signals
        );
        println!(
            "  Searched:    {} strategies, step {}%, TP6 {}",
            self.candidates_evaluated,
            self.step,
            if self.include_sixth_slot { "on" } else { "off" }
        );
        println!("  Elapsed:     {:.2}s", self.elapsed_secs);
        println!();
        println!("  BASELINE {}", self.baseline.label);
        println!("  ───────────────────────────────────");
        print_stats(&self.baseline);

        println!();
        println!("  TOP {} BY TOTAL P/L", self.top.len());
        println!("  ───────────────────────────────────");
        for (i, r) in self.top.iter().enumerate() {
            println!(
                "  #{:<3} {:<22} P/L {:+.2}% ({}) | WR {:.1}%",
                i + 1,
                r.label,
                r.stats.total_pl_percent,
                format_improvement(r.improvement_percent),
                r.stats.win_rate * 100.0
            );
        }

        println!();
        println!("  BEST BY WIN RATE");
        println!("  ───────────────────────────────────");
        println!("  Strategy:    {}", self.best_by_win_rate.label);
        print_stats(&self.best_by_win_rate);
        if self.win_rate_diverges {
            println!("  Note:        differs from the top P/L strategy");
        }

        if let Some(leader) = self.leader() {
            let p = leader.strategy.percentages();
            println!();
            println!("  RECOMMENDED");
            println!("  ───────────────────────────────────");
            for (i, pct) in p.iter().enumerate() {
                println!("  TP{}:         {}%", i + 1, pct);
            }
            println!(
                "  Expected:    {:+.2}% ({} vs baseline)",
                leader.stats.total_pl_percent,
                format_improvement(leader.improvement_percent)
            );
        }
        println!("{}", "=".repeat(70));
    }

    pub fn save_text(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut f = std::fs::File::create(path)?;

        writeln!(f, "Partial Exit Optimization Report")?;
        writeln!(f, "================================")?;
        writeln!(f, "Generated: {}", self.generated_at.to_rfc3339())?;
        writeln!(
            f,
            "Signals: {} ({} incomplete)",
            self.signals, self.incomplete_signals
        )?;
        writeln!(
            f,
            "Searched: {} strategies, step {}%, TP6 {}",
            self.candidates_evaluated,
            self.step,
            if self.include_sixth_slot { "on" } else { "off" }
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "Baseline {}: P/L {:+.2}% | WR {:.1}%",
            self.baseline.label,
            self.baseline.stats.total_pl_percent,
            self.baseline.stats.win_rate * 100.0
        )?;
        writeln!(f)?;
        writeln!(f, "Top strategies:")?;
        for (i, r) in self.top.iter().enumerate() {
            writeln!(
                f,
                "  #{} {}: P/L {:+.2}% ({}) | WR {:.1}% | {} W / {} L",
                i + 1,
                r.label,
                r.stats.total_pl_percent,
                format_improvement(r.improvement_percent),
                r.stats.win_rate * 100.0,
                r.stats.wins,
                r.stats.losses
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Best by win rate: {} | WR {:.1}% | P/L {:+.2}% ({}){}",
            self.best_by_win_rate.label,
            self.best_by_win_rate.stats.win_rate * 100.0,
            self.best_by_win_rate.stats.total_pl_percent,
            format_improvement(self.best_by_win_rate.improvement_percent),
            if self.win_rate_diverges {
                " [differs from top P/L]"
            } else {
                ""
            }
        )?;

        Ok(())
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

fn print_stats(r: &RankedStrategy) {
    println!("  Total P/L:   {:+.2}%", r.stats.total_pl_percent);
    println!("  Win Rate:    {:.1}%", r.stats.win_rate * 100.0);
    println!(
        "  W/L/Push:    {} / {} / {}",
        r.stats.wins, r.stats.losses, r.stats.pushes
    );
}

/// `+12.3%` against the baseline, or `n/a` when the baseline P&L is zero.
pub fn format_improvement(improvement: Option<f64>) -> String {
    match improvement {
        Some(v) => format!("{:+.1}%", v),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{gold_ladder, mixed_portfolio};
    use crate::trading::optimizer::{optimize, StrategyOptimizer};

    #[test]
    fn undefined_improvement_is_not_a_number() {
        assert_eq!(format_improvement(None), "n/a");
        assert_eq!(format_improvement(Some(12.345)), "+12.3%");
    }

    #[test]
    fn json_report_keeps_undefined_improvement_as_null() {
        let mut s = gold_ladder(1, 1);
        s.entry_price = None;
        let report = optimize(&[s], 50, false, 2).unwrap();
        let v = serde_json::to_value(&report).unwrap();
        assert!(v["top"][0]["improvement_percent"].is_null());
        assert_eq!(v["baseline"]["label"], "50-20-10-10-10");
    }

    #[test]
    fn writes_text_and_json() {
        let dir = std::env::temp_dir().join(format!("exit_opt_report_{}", std::process::id()));
        let report = StrategyOptimizer::new(OptimizerSettings {
            step: 25,
            top_n: 3,
            ..OptimizerSettings::default()
        })
        .optimize(&mixed_portfolio())
        .unwrap();

        let txt = dir.join("report.txt");
        let json = dir.join("report.json");
        report.save_text(&txt).unwrap();
        report.save_json(&json).unwrap();

        let text = std::fs::read_to_string(&txt).unwrap();
        assert!(text.contains("Top strategies:"));
        let back: OptimizationReport =
            serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
        assert_eq!(back.top.len(), 3);
        assert_eq!(back.candidates_evaluated, report.candidates_evaluated);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
