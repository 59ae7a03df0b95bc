use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::Result;
use crate::models::Signal;
use crate::store::SignalSource;
use crate::trading::trade_record::TradeRecord;

/// Signals exported by the persistence layer as a JSON array of records.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SignalSource for JsonFileSource {
    fn load_signals(&self) -> Result<Vec<Signal>> {
        let raw = std::fs::read_to_string(&self.path)?;
        let mut signals: Vec<Signal> = serde_json::from_str(&raw)?;
        signals.sort_by_key(|s| s.signal_number);

        let with_hits = signals.iter().filter(|s| !s.is_stop_loss()).count();
        info!(
            "Loaded {} signals from {} ({} with TP hits)",
            signals.len(),
            self.path.display(),
            with_hits
        );
        Ok(signals)
    }
}

pub struct InMemorySource {
    signals: Vec<Signal>,
}

impl InMemorySource {
    pub fn new(mut signals: Vec<Signal>) -> Self {
        signals.sort_by_key(|s| s.signal_number);
        Self { signals }
    }
}

impl SignalSource for InMemorySource {
    fn load_signals(&self) -> Result<Vec<Signal>> {
        debug!("Serving {} in-memory signals", self.signals.len());
        Ok(self.signals.clone())
    }
}

/// Reads a JSON array of closed trades.
pub fn load_trades(path: &Path) -> Result<Vec<TradeRecord>> {
    let raw = std::fs::read_to_string(path)?;
    let trades: Vec<TradeRecord> = serde_json::from_str(&raw)?;
    info!("Loaded {} trades from {}", trades.len(), path.display());
    Ok(trades)
}
