use exit_optimizer::core::{evaluate, Compositions, ExitStrategy};
use exit_optimizer::models::{Action, RiskLevel, Signal};
use proptest::prelude::*;

fn risk() -> impl Strategy<Value = RiskLevel> {
    prop_oneof![
        Just(RiskLevel::Low),
        Just(RiskLevel::Medium),
        Just(RiskLevel::High)
    ]
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![Just(Action::Buy), Just(Action::Sell)]
}

fn exit_strategy() -> impl Strategy<Value = ExitStrategy> {
    prop::collection::vec(0u32..=20, 6).prop_filter_map("needs a non-zero total", |weights| {
        let total: u32 = weights.iter().sum();
        if total == 0 {
            return None;
        }
        let mut fractions = [0.0; 6];
        for (f, w) in fractions.iter_mut().zip(&weights) {
            *f = *w as f64 / total as f64;
        }
        ExitStrategy::new(fractions).ok()
    })
}

fn signal() -> impl Strategy<Value = Signal> {
    (
        1.0f64..50_000.0,
        prop::collection::vec(0.001f64..0.05, 6),
        0u8..=6,
        action(),
        risk(),
        prop::sample::select(vec!["XAUUSD", "BTCUSD", "NAS100", "USDJPY", "EURUSD"]),
    )
        .prop_map(|(entry, steps, highest, action, risk, symbol)| {
            let sign = match action {
                Action::Buy => 1.0,
                Action::Sell => -1.0,
            };
            let mut price = entry;
            let tps: Vec<f64> = steps
                .iter()
                .map(|s| {
                    price += sign * entry * s;
                    price
                })
                .collect();
            let hits: Vec<u8> = (1..=highest).collect();
            Signal::new(1, symbol, action, entry)
                .with_stop_loss(entry - sign * entry * 0.01)
                .with_take_profits(&tps)
                .with_risk(risk)
                .with_hits(&hits)
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn stop_loss_profit_is_negative_risk(s in signal(), strategy in exit_strategy()) {
        let mut s = s;
        s.tps_hit.clear();
        let e = evaluate(&s, &strategy);
        prop_assert_eq!(e.profit_percent, -s.risk_level.risk_percent());
        prop_assert!(e.pips < 0.0);
    }

    #[test]
    fn breakdown_sums_to_profit(s in signal(), strategy in exit_strategy()) {
        let e = evaluate(&s, &strategy);
        if e.highest_tp >= 1 {
            let sum: f64 = e.tp_breakdown.iter().map(|r| r.profit_percent).sum();
            let tol = 1e-9 * e.profit_percent.abs().max(1.0);
            prop_assert!((sum - e.profit_percent).abs() <= tol);
            prop_assert_eq!(e.tp_breakdown.len(), e.highest_tp as usize);
            prop_assert!(e.profit_percent >= 0.0);
            prop_assert!(e.pips > 0.0);
        }
    }

    #[test]
    fn evaluation_is_idempotent(s in signal(), strategy in exit_strategy()) {
        let a = evaluate(&s, &strategy);
        let b = evaluate(&s, &strategy);
        prop_assert_eq!(a.profit_percent.to_bits(), b.profit_percent.to_bits());
        prop_assert_eq!(a, b);
    }

    #[test]
    fn compositions_sum_to_total(total in 0u32..12, slots in 1usize..6) {
        for c in Compositions::new(total, slots) {
            prop_assert_eq!(c.len(), slots);
            prop_assert_eq!(c.iter().sum::<u32>(), total);
        }
    }
}
