use anyhow::Result;
use chrono::Utc;
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

use exit_optimizer::config::Config;
use exit_optimizer::store::{JsonFileSource, SignalSource};
use exit_optimizer::trading::{OptimizerSettings, StrategyOptimizer};
use exit_optimizer::EngineError;

fn main() -> Result<()> {
    let mut cfg = Config::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    // Positional overrides: [signals_file] [step] [include_tp6] [top_n]
    let args: Vec<String> = std::env::args().collect();
    if let Some(path) = args.get(1) {
        cfg.signals_file = path.clone();
    }
    if let Some(step) = args.get(2).and_then(|s| s.parse().ok()) {
        cfg.optimizer_step = step;
    }
    if let Some(flag) = args.get(3) {
        cfg.include_tp6 = flag.to_lowercase() == "true";
    }
    if let Some(top_n) = args.get(4).and_then(|s| s.parse().ok()) {
        cfg.top_n = top_n;
    }

    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║          PARTIAL EXIT STRATEGY OPTIMIZER                 ║");
    println!("╠══════════════════════════════════════════════════════════╣");
    println!("  Signals:    {}", cfg.signals_file);
    println!("  Step:       {}%", cfg.optimizer_step);
    println!("  TP6:        {}", if cfg.include_tp6 { "included" } else { "fixed at 0" });
    println!("  Top N:      {}", cfg.top_n);
    println!("╚══════════════════════════════════════════════════════════╝");

    let signals = JsonFileSource::new(&cfg.signals_file).load_signals()?;

    let optimizer = StrategyOptimizer::new(OptimizerSettings::from_config(&cfg));
    let report = match optimizer.optimize(&signals) {
        Ok(report) => report,
        Err(EngineError::NoSignals) => {
            println!("No signals found in {}", cfg.signals_file);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    report.print_summary();

    let stem = format!("optimization_{}", Utc::now().format("%Y%m%d_%H%M%S"));
    let dir = Path::new(&cfg.report_dir);
    report.save_text(&dir.join(format!("{}.txt", stem)))?;
    report.save_json(&dir.join(format!("{}.json", stem)))?;
    println!("\nReport saved to: {}/{}.{{txt,json}}", cfg.report_dir, stem);

    Ok(())
}
