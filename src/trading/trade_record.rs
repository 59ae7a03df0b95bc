use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::direction::{deserialize_risk_level, Action, RiskLevel};

/// A closed trade taken by a trader, usually by following a signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub trade_id: String,
    pub account_id: String,
    #[serde(default)]
    pub signal_number: Option<u64>,
    pub symbol: String,
    pub action: Action,
    #[serde(default)]
    pub entry_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub exit_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub entry_price: f64,
    #[serde(default)]
    pub exit_price: f64,
    #[serde(default)]
    pub lots: f64,
    pub profit: f64,
    #[serde(default)]
    pub pips: f64,
    #[serde(default)]
    pub duration_hours: f64,
    #[serde(default, deserialize_with = "deserialize_risk_level")]
    pub risk_level: RiskLevel,
}

impl TradeRecord {
    pub fn is_win(&self) -> bool {
        self.profit > 0.0
    }
}
