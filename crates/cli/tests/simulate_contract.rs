use rust_decimal::Decimal;

use haggle_agent::persona::{Persona, PersonaRenderer};
use haggle_agent::runner::run_negotiation;
use haggle_agent::seller::ScriptedSeller;
use haggle_core::config::PolicyConfig;
use haggle_core::domain::offer::Actor;
use haggle_core::domain::outcome::NegotiationOutcome;
use haggle_core::session::{NegotiationSession, SessionConfig};

fn run_scenario(
    name: &str,
    market: i64,
    budget: Decimal,
    floor: Decimal,
    policy: &PolicyConfig,
) -> haggle_core::domain::outcome::SessionReport {
    let renderer = PersonaRenderer::new(Persona::composed()).expect("persona templates parse");
    let mut session = NegotiationSession::with_renderer(
        SessionConfig::new(name, Decimal::new(market, 0), budget),
        policy,
        renderer,
    )
    .expect("session must build from valid scenario inputs");
    let mut seller = ScriptedSeller::new(Decimal::new(market, 0), floor);

    run_negotiation(&mut session, &mut seller).expect("negotiation must terminate")
}

#[test]
fn scenario_matrix_terminates_and_honors_engine_invariants() {
    let policy = PolicyConfig::default();
    let matrix = [
        ("easy", Decimal::new(120, 2), Decimal::new(80, 2)),
        ("medium", Decimal::new(100, 2), Decimal::new(85, 2)),
        ("hard", Decimal::new(90, 2), Decimal::new(82, 2)),
    ];

    for market in [180_000_i64, 150_000] {
        for (difficulty, budget_ratio, floor_ratio) in matrix {
            let market_price = Decimal::new(market, 0);
            let budget = market_price * budget_ratio;
            let floor = market_price * floor_ratio;

            let report = run_scenario(
                &format!("CT-{market}-{difficulty}"),
                market,
                budget,
                floor,
                &policy,
            );

            assert!(report.rounds_used >= 1 && report.rounds_used <= policy.max_rounds);
            assert_ne!(
                report.outcome,
                NegotiationOutcome::Timeout,
                "default policy always decides by the final round"
            );

            if let Some(price) = report.outcome.deal_price() {
                assert!(price <= budget, "deal must never exceed the budget");
            }

            let buyer_prices: Vec<_> = report
                .history
                .iter()
                .filter(|offer| offer.actor == Actor::Buyer)
                .map(|offer| offer.price)
                .collect();
            assert!(buyer_prices.iter().all(|price| *price <= budget));
            assert!(buyer_prices.windows(2).all(|pair| pair[0] <= pair[1]));

            for pair in report.history.windows(2) {
                if pair[0].actor == Actor::Seller && pair[1].actor == Actor::Buyer {
                    assert!(
                        pair[1].price <= pair[0].price,
                        "buyer must never overshoot the seller's ask"
                    );
                }
            }
        }
    }
}

#[test]
fn presets_produce_reports_with_consistent_metrics() {
    for policy in [PolicyConfig::default(), PolicyConfig::composed(), PolicyConfig::insider()] {
        let market_price = Decimal::new(150_000, 0);
        let report = run_scenario(
            "CT-PRESET",
            150_000,
            market_price * Decimal::new(110, 2),
            market_price * Decimal::new(80, 2),
            &policy,
        );

        match &report.outcome {
            NegotiationOutcome::Deal { price } => {
                let savings = report.savings.expect("deal reports carry savings");
                assert_eq!(savings, market_price - price);
            }
            NegotiationOutcome::Failed | NegotiationOutcome::Timeout => {
                assert_eq!(report.savings, None);
            }
        }
    }
}
