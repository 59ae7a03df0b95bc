use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::core::compositions::{count_compositions, Compositions};
use crate::core::exit_strategy::{ExitStrategy, BASELINE};
use crate::core::outcome::ProfitProfile;
use crate::error::{EngineError, Result};
use crate::models::{Signal, TP_SLOTS};
use crate::reporting::OptimizationReport;

const PROGRESS_EVERY: usize = 100_000;
const DEADLINE_CHECK_EVERY: usize = 256;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerSettings {
    /// Percentage granularity; must divide 100.
    pub step: u32,
    pub include_sixth_slot: bool,
    pub top_n: usize,
    pub parallel: bool,
    #[serde(default)]
    pub time_budget: Option<Duration>,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            step: 5,
            include_sixth_slot: false,
            top_n: 10,
            parallel: true,
            time_budget: None,
        }
    }
}

impl OptimizerSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            step: cfg.optimizer_step,
            include_sixth_slot: cfg.include_tp6,
            top_n: cfg.top_n,
            parallel: cfg.parallel,
            time_budget: cfg.time_budget_secs.map(Duration::from_secs),
        }
    }

    pub fn slots(&self) -> usize {
        if self.include_sixth_slot {
            TP_SLOTS
        } else {
            TP_SLOTS - 1
        }
    }
}

/// Portfolio-wide result of one strategy. Covers complete signals only;
/// incomplete ones are reported separately and never count as pushes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioStats {
    pub signals: usize,
    pub total_pl_percent: f64,
    pub wins: usize,
    pub losses: usize,
    pub pushes: usize,
    /// wins / signals, in [0, 1].
    pub win_rate: f64,
}

impl PortfolioStats {
    pub fn score(profiles: &[ProfitProfile], strategy: &ExitStrategy) -> Self {
        let mut signals = 0;
        let mut total_pl_percent = 0.0;
        let mut wins = 0;
        let mut losses = 0;
        let mut pushes = 0;

        for profile in profiles {
            if matches!(profile, ProfitProfile::Incomplete) {
                continue;
            }
            signals += 1;
            let profit = profile.profit(strategy);
            total_pl_percent += profit;
            if profit > 0.0 {
                wins += 1;
            } else if profit < 0.0 {
                losses += 1;
            } else {
                pushes += 1;
            }
        }

        PortfolioStats {
            signals,
            total_pl_percent,
            wins,
            losses,
            pushes,
            win_rate: if signals > 0 {
                wins as f64 / signals as f64
            } else {
                0.0
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedStrategy {
    pub strategy: ExitStrategy,
    pub label: String,
    pub stats: PortfolioStats,
    /// Change against the baseline portfolio P&L, in percent of its
    /// magnitude. `None` when the baseline P&L is exactly zero.
    pub improvement_percent: Option<f64>,
}

impl RankedStrategy {
    fn new(strategy: ExitStrategy, stats: PortfolioStats, baseline_pl: f64) -> Self {
        Self {
            label: strategy.label(),
            strategy,
            stats,
            improvement_percent: improvement_percent(stats.total_pl_percent, baseline_pl),
        }
    }
}

pub fn improvement_percent(total_pl: f64, baseline_pl: f64) -> Option<f64> {
    if baseline_pl == 0.0 {
        return None;
    }
    Some((total_pl - baseline_pl) / baseline_pl.abs() * 100.0)
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    index: usize,
    strategy: ExitStrategy,
    stats: PortfolioStats,
}

// Higher P&L first; enumeration order breaks ties.
fn by_pl(a: &Candidate, b: &Candidate) -> Ordering {
    b.stats
        .total_pl_percent
        .total_cmp(&a.stats.total_pl_percent)
        .then(a.index.cmp(&b.index))
}

fn by_win_rate(a: &Candidate, b: &Candidate) -> Ordering {
    b.stats
        .win_rate
        .total_cmp(&a.stats.win_rate)
        .then_with(|| by_pl(a, b))
}

/// Bounded leader board kept by each worker and merged afterwards.
#[derive(Debug, Default)]
struct Leaders {
    top: Vec<Candidate>,
    best_win_rate: Option<Candidate>,
    evaluated: usize,
}

impl Leaders {
    fn offer(&mut self, c: Candidate, top_n: usize) {
        self.offer_win_rate_only(c);
        if top_n == 0 {
            return;
        }
        let admits = self.top.len() < top_n
            || self
                .top
                .last()
                .is_some_and(|last| by_pl(&c, last) == Ordering::Less);
        if admits {
            let pos = self.top.partition_point(|x| by_pl(x, &c) == Ordering::Less);
            self.top.insert(pos, c);
            self.top.truncate(top_n);
        }
    }

    fn merge(mut self, other: Leaders, top_n: usize) -> Leaders {
        self.evaluated += other.evaluated;
        for c in other.top {
            self.offer(c, top_n);
        }
        if let Some(c) = other.best_win_rate {
            self.offer_win_rate_only(c);
        }
        self
    }

    fn offer_win_rate_only(&mut self, c: Candidate) {
        let better = match &self.best_win_rate {
            Some(best) => by_win_rate(&c, best) == Ordering::Less,
            None => true,
        };
        if better {
            self.best_win_rate = Some(c);
        }
    }
}

/// Exhaustive search over partial-exit allocations.
pub struct StrategyOptimizer {
    pub settings: OptimizerSettings,
    baseline: ExitStrategy,
    cancel: Option<Arc<AtomicBool>>,
}

impl StrategyOptimizer {
    pub fn new(settings: OptimizerSettings) -> Self {
        Self {
            settings,
            baseline: BASELINE,
            cancel: None,
        }
    }

    pub fn with_baseline(mut self, baseline: ExitStrategy) -> Self {
        self.baseline = baseline;
        self
    }

    /// Enumeration stops once the flag is set; the run then reports `Aborted`.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn baseline(&self) -> &ExitStrategy {
        &self.baseline
    }

    pub fn optimize(&self, signals: &[Signal]) -> Result<OptimizationReport> {
        if signals.is_empty() {
            return Err(EngineError::NoSignals);
        }
        let step = self.settings.step;
        if step == 0 || step > 100 || 100 % step != 0 {
            return Err(EngineError::InvalidStep(step));
        }

        let profiles: Vec<ProfitProfile> = signals.iter().map(ProfitProfile::of).collect();
        let incomplete = profiles
            .iter()
            .filter(|p| matches!(p, ProfitProfile::Incomplete))
            .count();
        if incomplete > 0 {
            warn!(
                "{} signal(s) reached a TP without a usable entry price; left out of scoring",
                incomplete
            );
        }

        let baseline_stats = PortfolioStats::score(&profiles, &self.baseline);
        let baseline_pl = baseline_stats.total_pl_percent;
        info!(
            "Baseline {}: P/L {:+.2}% | WR {:.1}% | {} W / {} L",
            self.baseline,
            baseline_pl,
            baseline_stats.win_rate * 100.0,
            baseline_stats.wins,
            baseline_stats.losses
        );

        let slots = self.settings.slots();
        let total = count_compositions(100 / step, slots);
        info!(
            "Testing {} strategies (step {}%, {} slots, {})",
            total,
            step,
            slots,
            if self.settings.parallel { "parallel" } else { "sequential" }
        );

        let started = Instant::now();
        let deadline = self.settings.time_budget.map(|b| started + b);
        let stopped = AtomicBool::new(false);
        let progress = AtomicUsize::new(0);
        let top_n = self.settings.top_n;

        let consider = |mut acc: Leaders, (index, parts): (usize, Vec<u32>)| -> Leaders {
            let strategy = ExitStrategy::from_generated(scale_parts(&parts, step));
            let stats = PortfolioStats::score(&profiles, &strategy);
            acc.evaluated += 1;
            acc.offer(
                Candidate {
                    index,
                    strategy,
                    stats,
                },
                top_n,
            );

            let done = progress.fetch_add(1, AtomicOrdering::Relaxed) + 1;
            if done % PROGRESS_EVERY == 0 {
                debug!("  Progress: {}/{} strategies tested", done, total);
            }
            acc
        };

        // Checked before each candidate is handed out, so a stop ends the
        // enumeration itself on both paths.
        let candidates = Compositions::new(100 / step, slots)
            .enumerate()
            .take_while(|(index, _)| !self.should_stop(&stopped, *index, deadline));
        let leaders = if self.settings.parallel {
            candidates
                .par_bridge()
                .fold(Leaders::default, consider)
                .reduce(Leaders::default, |a, b| a.merge(b, top_n))
        } else {
            candidates.fold(Leaders::default(), consider)
        };

        if stopped.load(AtomicOrdering::Relaxed) || leaders.evaluated < total {
            warn!(
                "Optimization stopped early after {} of {} strategies; discarding partial ranking",
                leaders.evaluated, total
            );
            return Err(EngineError::Aborted {
                evaluated: leaders.evaluated,
                total,
            });
        }
        let Some(best_win_rate) = leaders.best_win_rate else {
            return Err(EngineError::Aborted {
                evaluated: leaders.evaluated,
                total,
            });
        };
        info!(
            "Scored {} strategies over {} signals in {:.2?}",
            leaders.evaluated,
            signals.len(),
            started.elapsed()
        );

        let top: Vec<RankedStrategy> = leaders
            .top
            .into_iter()
            .map(|c| RankedStrategy::new(c.strategy, c.stats, baseline_pl))
            .collect();

        Ok(OptimizationReport::new(
            &self.settings,
            RankedStrategy::new(self.baseline, baseline_stats, baseline_pl),
            top,
            RankedStrategy::new(best_win_rate.strategy, best_win_rate.stats, baseline_pl),
            total,
            incomplete,
            started.elapsed(),
        ))
    }

    fn should_stop(&self, stopped: &AtomicBool, index: usize, deadline: Option<Instant>) -> bool {
        if stopped.load(AtomicOrdering::Relaxed) {
            return true;
        }
        let cancelled = self
            .cancel
            .as_ref()
            .is_some_and(|f| f.load(AtomicOrdering::Relaxed));
        let expired = index % DEADLINE_CHECK_EVERY == 0
            && deadline.is_some_and(|d| Instant::now() >= d);
        if cancelled || expired {
            stopped.store(true, AtomicOrdering::Relaxed);
            return true;
        }
        false
    }
}

/// Runs the optimizer with the baseline strategy and default execution settings.
pub fn optimize(
    signals: &[Signal],
    step: u32,
    include_sixth_slot: bool,
    top_n: usize,
) -> Result<OptimizationReport> {
    StrategyOptimizer::new(OptimizerSettings {
        step,
        include_sixth_slot,
        top_n,
        ..OptimizerSettings::default()
    })
    .optimize(signals)
}

fn scale_parts(parts: &[u32], step: u32) -> [u32; TP_SLOTS] {
    let mut out = [0; TP_SLOTS];
    for (slot, &units) in out.iter_mut().zip(parts) {
        *slot = units * step;
    }
    out
}
