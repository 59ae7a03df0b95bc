use serde::{Deserialize, Serialize};

use crate::core::exit_strategy::{ExitStrategy, BASELINE};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Data
    pub signals_file: String,
    pub symbol_filter: Option<String>,

    // Optimizer
    pub optimizer_step: u32,
    pub include_tp6: bool,
    pub top_n: usize,
    pub parallel: bool,
    pub time_budget_secs: Option<u64>,

    // Evaluation
    pub history_strategy: ExitStrategy,

    // Trader stats
    pub initial_balance: f64,

    // Output
    pub report_dir: String,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };
        let optional = |key: &str| -> Option<String> {
            std::env::var(key).ok().filter(|v| !v.trim().is_empty())
        };

        Config {
            signals_file: env("SIGNALS_FILE", "data/signals.json"),
            symbol_filter: optional("SYMBOL_FILTER"),
            optimizer_step: env("OPTIMIZER_STEP", "5").parse().unwrap_or(5),
            include_tp6: env("INCLUDE_TP6", "false").to_lowercase() == "true",
            top_n: env("TOP_N", "20").parse().unwrap_or(20),
            parallel: env("OPTIMIZER_PARALLEL", "true").to_lowercase() == "true",
            time_budget_secs: optional("TIME_BUDGET_SECS").and_then(|v| v.parse().ok()),
            history_strategy: optional("HISTORY_STRATEGY")
                .and_then(|v| parse_percentages(&v))
                .unwrap_or(BASELINE),
            initial_balance: env("INITIAL_BALANCE", "10000")
                .parse()
                .unwrap_or(10_000.0),
            report_dir: env("REPORT_DIR", "data"),
            log_level: env("LOG_LEVEL", "INFO"),
        }
    }
}

/// Parses `50-20-10-10-10` (TP6 optional) into a strategy.
pub fn parse_percentages(raw: &str) -> Option<ExitStrategy> {
    let parts: Vec<u32> = raw
        .split(['-', ','])
        .map(|p| p.trim().parse().ok())
        .collect::<Option<Vec<u32>>>()?;
    if parts.is_empty() || parts.len() > 6 {
        return None;
    }
    let mut percentages = [0u32; 6];
    percentages[..parts.len()].copy_from_slice(&parts);
    ExitStrategy::from_percentages(percentages).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::exit_strategy::TP6_SPLIT;

    #[test]
    fn parses_strategy_labels() {
        assert_eq!(parse_percentages("50-20-10-10-10"), Some(BASELINE));
        assert_eq!(parse_percentages("50,20,10,10,5,5"), Some(TP6_SPLIT));
        assert_eq!(parse_percentages("50-20"), None);
        assert_eq!(parse_percentages("a-b"), None);
        assert_eq!(parse_percentages("10-10-10-10-10-10-40"), None);
    }

    #[test]
    fn defaults_are_usable() {
        let cfg = Config::from_env();
        assert!(cfg.optimizer_step > 0);
        assert!(cfg.initial_balance > 0.0);
    }
}
