pub mod report;

pub use report::{format_improvement, OptimizationReport};
