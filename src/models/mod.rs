pub mod direction;
pub mod instrument;
pub mod signal;

pub use direction::*;
pub use instrument::{classify, pip_size, InstrumentClass};
pub use signal::{Signal, SignalRecord, TP_SLOTS};
