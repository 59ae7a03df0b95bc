use serde::{Deserialize, Serialize};

use crate::core::exit_strategy::{ExitStrategy, BASELINE};
use crate::models::instrument::estimated_stop_pips;
use crate::models::{pip_size, OutcomeClass, Signal, TP_SLOTS};

/// Fixed account leverage applied to raw price moves.
pub const LEVERAGE: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipsSource {
    Computed,
    /// Instrument-typical stop distance, not measured from prices.
    Estimated,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataIssue {
    MissingEntryPrice,
    MissingTakeProfit { level: u8 },
    EstimatedStopPips,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TpBreakdown {
    pub tp_level: u8,
    pub price: f64,
    pub pips: f64,
    pub fraction: f64,
    pub profit_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub signal_number: u64,
    pub symbol: String,
    pub highest_tp: u8,
    pub outcome: String,
    pub outcome_class: OutcomeClass,
    pub exit_price: Option<f64>,
    pub pips: f64,
    pub pips_source: PipsSource,
    pub risk_percent: f64,
    pub profit_percent: f64,
    pub tp_breakdown: Vec<TpBreakdown>,
    pub issues: Vec<DataIssue>,
}

impl Evaluation {
    /// False when the profit figure rests on missing prices. An estimated
    /// stop distance alone does not make a result incomplete.
    pub fn is_complete(&self) -> bool {
        self.issues
            .iter()
            .all(|i| matches!(i, DataIssue::EstimatedStopPips))
    }

    pub fn is_stop_loss(&self) -> bool {
        self.highest_tp == 0
    }
}

/// Reduction of a signal that no longer depends on the exit strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfitProfile {
    /// Full loss of the risked capital, whatever the strategy.
    StopLoss { loss_percent: f64 },
    /// Profit each level yields per unit of allocation; zero above the
    /// highest TP reached and for levels without a recorded price.
    Levels { per_unit: [f64; TP_SLOTS] },
    /// A TP outcome without a usable entry price.
    Incomplete,
}

impl ProfitProfile {
    pub fn of(signal: &Signal) -> Self {
        let risk_percent = signal.risk_percent();
        let highest_tp = signal.highest_tp();
        if highest_tp == 0 {
            return ProfitProfile::StopLoss {
                loss_percent: -risk_percent,
            };
        }
        let Some(entry) = usable_entry(signal) else {
            return ProfitProfile::Incomplete;
        };

        let mut per_unit = [0.0; TP_SLOTS];
        for level in 1..=highest_tp {
            if let Some(price) = signal.take_profit(level) {
                per_unit[level as usize - 1] = level_yield(entry, price, risk_percent);
            }
        }
        ProfitProfile::Levels { per_unit }
    }

    pub fn profit(&self, strategy: &ExitStrategy) -> f64 {
        match self {
            ProfitProfile::StopLoss { loss_percent } => *loss_percent,
            ProfitProfile::Levels { per_unit } => per_unit
                .iter()
                .zip(strategy.fractions())
                .map(|(y, f)| y * f)
                .sum(),
            ProfitProfile::Incomplete => 0.0,
        }
    }
}

/// Evaluates a signal under the baseline strategy.
pub fn evaluate_default(signal: &Signal) -> Evaluation {
    evaluate(signal, &BASELINE)
}

pub fn evaluate(signal: &Signal, strategy: &ExitStrategy) -> Evaluation {
    let class = signal.instrument_class();
    let pip = pip_size(class);
    let highest_tp = signal.highest_tp();
    let entry = usable_entry(signal);
    let profile = ProfitProfile::of(signal);

    let mut issues = Vec::new();
    let mut tp_breakdown = Vec::new();

    let (exit_price, pips, pips_source) = if highest_tp == 0 {
        match (entry, signal.stop_loss) {
            (Some(e), Some(sl)) => (
                Some(sl),
                signal.action.signed_move(e, sl) / pip,
                PipsSource::Computed,
            ),
            _ => {
                issues.push(DataIssue::EstimatedStopPips);
                (
                    signal.stop_loss,
                    estimated_stop_pips(class),
                    PipsSource::Estimated,
                )
            }
        }
    } else {
        let exit_price = signal.take_profit(highest_tp);
        match entry {
            None => {
                issues.push(DataIssue::MissingEntryPrice);
                (exit_price, 0.0, PipsSource::Unavailable)
            }
            Some(e) => {
                let fractions = strategy.fractions();
                let per_unit = match profile {
                    ProfitProfile::Levels { per_unit } => per_unit,
                    _ => [0.0; TP_SLOTS],
                };
                for level in 1..=highest_tp {
                    let slot = level as usize - 1;
                    match signal.take_profit(level) {
                        Some(price) => tp_breakdown.push(TpBreakdown {
                            tp_level: level,
                            price,
                            pips: signal.action.signed_move(e, price) / pip,
                            fraction: fractions[slot],
                            profit_percent: per_unit[slot] * fractions[slot],
                        }),
                        None => issues.push(DataIssue::MissingTakeProfit { level }),
                    }
                }
                match exit_price {
                    Some(x) => (exit_price, signal.action.signed_move(e, x) / pip, PipsSource::Computed),
                    None => (None, 0.0, PipsSource::Unavailable),
                }
            }
        }
    };

    let (outcome, outcome_class) = if highest_tp == 0 {
        ("SL Hit".to_string(), OutcomeClass::Loss)
    } else {
        (format!("TP{} Hit", highest_tp), OutcomeClass::Win)
    };

    Evaluation {
        signal_number: signal.signal_number,
        symbol: signal.symbol.clone(),
        highest_tp,
        outcome,
        outcome_class,
        exit_price,
        pips,
        pips_source,
        risk_percent: signal.risk_percent(),
        profit_percent: profile.profit(strategy),
        tp_breakdown,
        issues,
    }
}

fn usable_entry(signal: &Signal) -> Option<f64> {
    signal.entry_price.filter(|e| e.is_finite() && *e > 0.0)
}

fn level_yield(entry: f64, price: f64, risk_percent: f64) -> f64 {
    let move_percent = (price - entry).abs() / entry * 100.0;
    move_percent * LEVERAGE * (risk_percent / 100.0)
}
