use crate::models::{Action, RiskLevel, Signal};

/// XAUUSD BUY at 2000.0, MEDIUM risk, with the given TP prices and hits.
pub fn gold_buy(tps: &[f64], hits: &[u8]) -> Signal {
    Signal::new(1, "XAUUSD", Action::Buy, 2000.0)
        .with_take_profits(tps)
        .with_hits(hits)
}

pub fn stop_loss_signal(
    symbol: &str,
    action: Action,
    entry: f64,
    stop_loss: Option<f64>,
    risk: RiskLevel,
) -> Signal {
    let mut s = Signal::new(2, symbol, action, entry).with_risk(risk);
    s.stop_loss = stop_loss;
    s
}

/// Gold ladder 2010, 2020, .. 2060 with every level up to `highest` hit.
pub fn gold_ladder(signal_number: u64, highest: u8) -> Signal {
    let hits: Vec<u8> = (1..=highest).collect();
    let mut s = gold_buy(&[2010.0, 2020.0, 2030.0, 2040.0, 2050.0, 2060.0], &hits);
    s.signal_number = signal_number;
    s
}

/// Mixed history: two TP1 wins, one TP3 run and one stop loss.
pub fn mixed_portfolio() -> Vec<Signal> {
    vec![
        gold_ladder(1, 1),
        gold_ladder(2, 1),
        gold_ladder(3, 3),
        Signal::new(4, "EURUSD", Action::Sell, 1.1000)
            .with_stop_loss(1.1030)
            .with_take_profits(&[1.0980, 1.0960])
            .with_risk(RiskLevel::High),
    ]
}
