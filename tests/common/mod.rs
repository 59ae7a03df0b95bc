use exit_optimizer::models::{Action, RiskLevel, Signal};

/// Gold BUY at 2000 with TPs every 10.0 and all levels up to `highest` hit.
pub fn gold_signal(signal_number: u64, highest: u8, risk: RiskLevel) -> Signal {
    let hits: Vec<u8> = (1..=highest).collect();
    Signal::new(signal_number, "XAUUSD", Action::Buy, 2000.0)
        .with_stop_loss(1985.0)
        .with_take_profits(&[2010.0, 2020.0, 2030.0, 2040.0, 2050.0, 2060.0])
        .with_risk(risk)
        .with_hits(&hits)
}

/// A small history across instruments, directions and outcomes.
pub fn history() -> Vec<Signal> {
    vec![
        gold_signal(101, 1, RiskLevel::Medium),
        gold_signal(102, 4, RiskLevel::High),
        gold_signal(103, 0, RiskLevel::Low),
        Signal::new(104, "BTCUSD", Action::Sell, 40000.0)
            .with_stop_loss(40400.0)
            .with_take_profits(&[39800.0, 39600.0, 39400.0])
            .with_hits(&[1, 2]),
        Signal::new(105, "USDJPY", Action::Buy, 150.00)
            .with_take_profits(&[150.20, 150.40, 150.60, 150.80, 151.00])
            .with_hits(&[1, 2, 3, 4, 5]),
        Signal::new(106, "NAS100", Action::Buy, 18000.0)
            .with_take_profits(&[18050.0, 18100.0]),
    ]
}
