use anyhow::Result;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use exit_optimizer::config::{parse_percentages, Config};
use exit_optimizer::store::json_file::load_trades;
use exit_optimizer::store::{JsonFileSource, SignalSource};
use exit_optimizer::trading::{SignalHistory, TraderStats};

fn main() -> Result<()> {
    let cfg = Config::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    // [signals_file] [strategy e.g. 50-20-10-10-10] [trades_file]
    let args: Vec<String> = std::env::args().collect();
    let signals_file = args.get(1).cloned().unwrap_or_else(|| cfg.signals_file.clone());
    let strategy = match args.get(2) {
        Some(raw) => parse_percentages(raw)
            .ok_or_else(|| anyhow::anyhow!("invalid strategy '{}': percentages must sum to 100", raw))?,
        None => cfg.history_strategy,
    };

    let signals = JsonFileSource::new(&signals_file).load_signals()?;
    let history = SignalHistory::build(&signals, &strategy, cfg.symbol_filter.as_deref());
    history.print_summary();

    let out = Path::new(&cfg.report_dir).join("signal_history.json");
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&out, serde_json::to_string_pretty(&history)?)?;
    info!("Signal history written to {}", out.display());

    if let Some(trades_file) = args.get(3) {
        let trades = load_trades(Path::new(trades_file))?;
        let mut accounts: Vec<&str> = trades.iter().map(|t| t.account_id.as_str()).collect();
        accounts.sort_unstable();
        accounts.dedup();

        println!("\n  TRADER STATS");
        println!("  ───────────────────────────────────");
        for account in accounts {
            let own: Vec<_> = trades
                .iter()
                .filter(|t| t.account_id == account)
                .cloned()
                .collect();
            let stats = TraderStats::from_trades(account, &own, cfg.initial_balance);
            println!(
                "  {}: {} trades | WR {:.1}% | PF {:.2} | Net {:+.2} | Max DD {:.2} ({:.1}%)",
                account,
                stats.total_trades,
                stats.win_rate * 100.0,
                stats.profit_factor,
                stats.current_balance - stats.initial_balance,
                stats.max_drawdown,
                stats.max_drawdown_pct
            );
        }
    }

    Ok(())
}
