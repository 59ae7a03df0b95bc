pub mod optimizer;
pub mod signal_history;
pub mod trade_record;
pub mod trader_stats;

pub use optimizer::{optimize, OptimizerSettings, PortfolioStats, RankedStrategy, StrategyOptimizer};
pub use signal_history::{HistorySummary, SignalHistory};
pub use trader_stats::TraderStats;
