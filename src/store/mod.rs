pub mod json_file;

pub use json_file::{InMemorySource, JsonFileSource};

use crate::error::Result;
use crate::models::Signal;

/// Read-only access to persisted signals. Implementations return the full
/// history ordered by signal number.
pub trait SignalSource: Send + Sync {
    fn load_signals(&self) -> Result<Vec<Signal>>;
}
