pub mod compositions;
pub mod exit_strategy;
pub mod outcome;

pub use compositions::{count_compositions, Compositions};
pub use exit_strategy::{ExitStrategy, BASELINE, TP6_SPLIT};
pub use outcome::{evaluate, evaluate_default, Evaluation, ProfitProfile};
