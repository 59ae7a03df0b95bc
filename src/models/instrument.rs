use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentClass {
    Metal,
    Crypto,
    Index,
    JpyForex,
    Forex,
}

impl fmt::Display for InstrumentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstrumentClass::Metal => write!(f, "metal"),
            InstrumentClass::Crypto => write!(f, "crypto"),
            InstrumentClass::Index => write!(f, "index"),
            InstrumentClass::JpyForex => write!(f, "jpy_forex"),
            InstrumentClass::Forex => write!(f, "forex"),
        }
    }
}

// Checked in order; the first class with a matching marker wins.
const CLASS_MARKERS: &[(InstrumentClass, &[&str])] = &[
    (InstrumentClass::Metal, &["XAU", "GOLD"]),
    (InstrumentClass::Crypto, &["BTC", "BITCOIN"]),
    (InstrumentClass::Index, &["NAS", "US100", "NDX"]),
    (InstrumentClass::JpyForex, &["JPY"]),
];

pub fn classify(symbol: &str) -> InstrumentClass {
    let upper = symbol.to_ascii_uppercase();
    CLASS_MARKERS
        .iter()
        .find(|(_, markers)| markers.iter().any(|m| upper.contains(m)))
        .map(|(class, _)| *class)
        .unwrap_or(InstrumentClass::Forex)
}

/// Price distance that counts as one pip.
pub fn pip_size(class: InstrumentClass) -> f64 {
    match class {
        InstrumentClass::Metal => 0.10,
        InstrumentClass::Crypto => 1.0,
        InstrumentClass::Index => 1.0,
        InstrumentClass::JpyForex => 0.01,
        InstrumentClass::Forex => 0.0001,
    }
}

/// Typical stop distance for the class, in (negative) pips.
///
/// A placeholder used only when a stop-loss signal has no recorded stop
/// price. It is not derived from market data and callers must not total it
/// together with computed pip distances.
pub fn estimated_stop_pips(class: InstrumentClass) -> f64 {
    match class {
        InstrumentClass::Metal => -30.0,
        InstrumentClass::Crypto => -400.0,
        InstrumentClass::Index => -75.0,
        InstrumentClass::JpyForex | InstrumentClass::Forex => -30.0,
    }
}

/// Decimal places used when displaying prices.
pub fn price_decimals(class: InstrumentClass) -> usize {
    match class {
        InstrumentClass::JpyForex => 3,
        _ => 2,
    }
}
