pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod reporting;
pub mod store;
#[cfg(test)]
pub mod test_helpers;
pub mod trading;

pub use crate::core::{evaluate, ExitStrategy, BASELINE};
pub use crate::error::{EngineError, Result};
pub use crate::trading::optimize;
