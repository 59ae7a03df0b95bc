use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

use crate::models::direction::{deserialize_risk_level, Action, RiskLevel};
use crate::models::instrument::{classify, InstrumentClass};

/// Number of take-profit slots a signal can carry.
pub const TP_SLOTS: usize = 6;

/// Row shape handed over by the persistence layer: one column per TP level
/// and the announced TP hits as a plain list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalRecord {
    pub signal_number: u64,
    pub symbol: String,
    pub action: Action,
    #[serde(default)]
    pub entry_price: Option<f64>,
    #[serde(default)]
    pub stop_loss: Option<f64>,
    #[serde(default)]
    pub tp1: Option<f64>,
    #[serde(default)]
    pub tp2: Option<f64>,
    #[serde(default)]
    pub tp3: Option<f64>,
    #[serde(default)]
    pub tp4: Option<f64>,
    #[serde(default)]
    pub tp5: Option<f64>,
    #[serde(default)]
    pub tp6: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_risk_level")]
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub tps_hit: Vec<i64>,
    #[serde(default)]
    pub is_reentry: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub exit_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SignalRecord", into = "SignalRecord")]
pub struct Signal {
    pub signal_number: u64,
    pub symbol: String,
    pub action: Action,
    pub entry_price: Option<f64>,
    pub stop_loss: Option<f64>,
    /// Slot `i` holds the price of TP level `i + 1`.
    pub take_profits: [Option<f64>; TP_SLOTS],
    pub risk_level: RiskLevel,
    pub tps_hit: BTreeSet<u8>,
    pub is_reentry: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub exit_date: Option<DateTime<Utc>>,
}

impl From<SignalRecord> for Signal {
    fn from(r: SignalRecord) -> Self {
        let mut tps_hit = BTreeSet::new();
        for level in r.tps_hit {
            if (1..=TP_SLOTS as i64).contains(&level) {
                tps_hit.insert(level as u8);
            } else {
                warn!(
                    "Signal #{}: ignoring out-of-range TP hit level {}",
                    r.signal_number, level
                );
            }
        }

        Signal {
            signal_number: r.signal_number,
            symbol: r.symbol,
            action: r.action,
            entry_price: r.entry_price,
            stop_loss: r.stop_loss,
            take_profits: [r.tp1, r.tp2, r.tp3, r.tp4, r.tp5, r.tp6],
            risk_level: r.risk_level,
            tps_hit,
            is_reentry: r.is_reentry,
            created_at: r.created_at,
            exit_date: r.exit_date,
        }
    }
}

impl From<Signal> for SignalRecord {
    fn from(s: Signal) -> Self {
        let [tp1, tp2, tp3, tp4, tp5, tp6] = s.take_profits;
        SignalRecord {
            signal_number: s.signal_number,
            symbol: s.symbol,
            action: s.action,
            entry_price: s.entry_price,
            stop_loss: s.stop_loss,
            tp1,
            tp2,
            tp3,
            tp4,
            tp5,
            tp6,
            risk_level: s.risk_level,
            tps_hit: s.tps_hit.into_iter().map(i64::from).collect(),
            is_reentry: s.is_reentry,
            created_at: s.created_at,
            exit_date: s.exit_date,
        }
    }
}

impl Signal {
    pub fn new(signal_number: u64, symbol: &str, action: Action, entry_price: f64) -> Self {
        Self {
            signal_number,
            symbol: symbol.to_string(),
            action,
            entry_price: Some(entry_price),
            stop_loss: None,
            take_profits: [None; TP_SLOTS],
            risk_level: RiskLevel::default(),
            tps_hit: BTreeSet::new(),
            is_reentry: false,
            created_at: None,
            exit_date: None,
        }
    }

    pub fn with_stop_loss(mut self, price: f64) -> Self {
        self.stop_loss = Some(price);
        self
    }

    /// Fills TP slots from level 1 upward; extra prices beyond six are ignored.
    pub fn with_take_profits(mut self, prices: &[f64]) -> Self {
        for (slot, &price) in self.take_profits.iter_mut().zip(prices) {
            *slot = Some(price);
        }
        self
    }

    pub fn with_risk(mut self, risk: RiskLevel) -> Self {
        self.risk_level = risk;
        self
    }

    pub fn with_hits(mut self, levels: &[u8]) -> Self {
        for &level in levels {
            self.record_tp_hit(level);
        }
        self
    }

    /// Appends an announced TP hit. Returns false for levels outside 1..=6.
    pub fn record_tp_hit(&mut self, level: u8) -> bool {
        if level == 0 || level as usize > TP_SLOTS {
            return false;
        }
        self.tps_hit.insert(level);
        true
    }

    /// Highest TP level reached, 0 when none.
    pub fn highest_tp(&self) -> u8 {
        self.tps_hit.iter().next_back().copied().unwrap_or(0)
    }

    pub fn is_stop_loss(&self) -> bool {
        self.tps_hit.is_empty()
    }

    /// Price of TP `level` (1-based).
    pub fn take_profit(&self, level: u8) -> Option<f64> {
        if level == 0 {
            return None;
        }
        self.take_profits.get(level as usize - 1).copied().flatten()
    }

    pub fn instrument_class(&self) -> InstrumentClass {
        classify(&self.symbol)
    }

    pub fn risk_percent(&self) -> f64 {
        self.risk_level.risk_percent()
    }
}
