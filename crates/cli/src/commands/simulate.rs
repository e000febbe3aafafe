use rust_decimal::Decimal;
use serde::Serialize;

use haggle_agent::persona::{Persona, PersonaRenderer};
use haggle_agent::runner::run_negotiation;
use haggle_agent::seller::ScriptedSeller;
use haggle_core::config::AppConfig;
use haggle_core::domain::outcome::NegotiationOutcome;
use haggle_core::session::{NegotiationSession, SessionConfig};

use crate::commands::CommandResult;

#[derive(Clone, Copy)]
struct Lot {
    name: &'static str,
    market_price: i64,
}

#[derive(Clone, Copy)]
struct Difficulty {
    name: &'static str,
    budget_ratio: Decimal,
    floor_ratio: Decimal,
}

const LOTS: [Lot; 2] = [
    Lot { name: "lot-a", market_price: 180_000 },
    Lot { name: "lot-b", market_price: 150_000 },
];

const DIFFICULTIES: [Difficulty; 3] = [
    Difficulty {
        name: "easy",
        budget_ratio: Decimal::from_parts(120, 0, 0, false, 2),
        floor_ratio: Decimal::from_parts(80, 0, 0, false, 2),
    },
    Difficulty {
        name: "medium",
        budget_ratio: Decimal::from_parts(100, 0, 0, false, 2),
        floor_ratio: Decimal::from_parts(85, 0, 0, false, 2),
    },
    Difficulty {
        name: "hard",
        budget_ratio: Decimal::from_parts(90, 0, 0, false, 2),
        floor_ratio: Decimal::from_parts(82, 0, 0, false, 2),
    },
];

#[derive(Debug, Serialize)]
struct ScenarioReport {
    scenario: String,
    market_price: Decimal,
    budget: Decimal,
    seller_floor: Decimal,
    outcome: &'static str,
    final_price: Option<Decimal>,
    rounds_used: u8,
    savings: Option<Decimal>,
}

#[derive(Debug, Serialize)]
struct SimulateReport {
    command: &'static str,
    status: &'static str,
    summary: String,
    persona: String,
    deals_closed: usize,
    total_savings: Decimal,
    scenarios: Vec<ScenarioReport>,
}

pub fn run(config: &AppConfig, preset: Option<&str>) -> CommandResult {
    let persona = match preset {
        Some("insider") => Persona::insider(),
        _ => Persona::composed(),
    };

    let mut scenarios = Vec::with_capacity(LOTS.len() * DIFFICULTIES.len());
    for lot in LOTS {
        for difficulty in DIFFICULTIES {
            let market_price = Decimal::new(lot.market_price, 0);
            let budget = market_price * difficulty.budget_ratio;
            let floor = market_price * difficulty.floor_ratio;

            let renderer = match PersonaRenderer::new(persona.clone()) {
                Ok(renderer) => renderer,
                Err(error) => {
                    return CommandResult::failure(
                        "simulate",
                        "persona_templates",
                        error.to_string(),
                        5,
                    );
                }
            };

            let session = NegotiationSession::with_renderer(
                SessionConfig::new(
                    format!("SIM-{}-{}", lot.name, difficulty.name),
                    market_price,
                    budget,
                ),
                &config.policy,
                renderer,
            );
            let mut session = match session {
                Ok(session) => session,
                Err(error) => {
                    return CommandResult::failure(
                        "simulate",
                        "session_config",
                        error.to_string(),
                        5,
                    );
                }
            };
            let mut seller = ScriptedSeller::new(market_price, floor);

            let report = match run_negotiation(&mut session, &mut seller) {
                Ok(report) => report,
                Err(error) => {
                    return CommandResult::failure("simulate", "negotiation", error.to_string(), 5);
                }
            };

            scenarios.push(ScenarioReport {
                scenario: format!("{}/{}", lot.name, difficulty.name),
                market_price,
                budget,
                seller_floor: floor,
                outcome: outcome_label(&report.outcome),
                final_price: report.outcome.deal_price(),
                rounds_used: report.rounds_used,
                savings: report.savings,
            });
        }
    }

    let deals_closed = scenarios.iter().filter(|scenario| scenario.outcome == "deal").count();
    let total_savings: Decimal = scenarios.iter().filter_map(|scenario| scenario.savings).sum();
    let summary = format!(
        "simulate: {deals_closed}/{} deals closed, total savings {total_savings}",
        scenarios.len()
    );

    let report = SimulateReport {
        command: "simulate",
        status: "ok",
        summary,
        persona: persona.name,
        deals_closed,
        total_savings,
        scenarios,
    };

    let human = report.summary.clone();
    let machine = serde_json::to_string(&report).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"simulate\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    });

    CommandResult { exit_code: 0, output: format!("{human}\n{machine}") }
}

fn outcome_label(outcome: &NegotiationOutcome) -> &'static str {
    match outcome {
        NegotiationOutcome::Deal { .. } => "deal",
        NegotiationOutcome::Timeout => "timeout",
        NegotiationOutcome::Failed => "failed",
    }
}

#[cfg(test)]
mod tests {
    use haggle_core::config::AppConfig;

    use super::run;

    #[test]
    fn matrix_runs_every_scenario_to_a_terminal_outcome() {
        let result = run(&AppConfig::default(), None);
        assert_eq!(result.exit_code, 0);

        let machine = result.output.lines().nth(1).expect("machine-readable line");
        let payload: serde_json::Value =
            serde_json::from_str(machine).expect("report must be valid JSON");

        let scenarios = payload["scenarios"].as_array().expect("scenario array");
        assert_eq!(scenarios.len(), 6);
        for scenario in scenarios {
            let outcome = scenario["outcome"].as_str().expect("outcome label");
            assert!(matches!(outcome, "deal" | "failed"), "unexpected outcome {outcome}");
        }
    }

    #[test]
    fn matrix_is_deterministic_across_runs() {
        let first = run(&AppConfig::default(), None);
        let second = run(&AppConfig::default(), None);
        assert_eq!(first.output, second.output);
    }

    #[test]
    fn insider_preset_selects_the_insider_persona() {
        let result = run(&AppConfig::default(), Some("insider"));
        let machine = result.output.lines().nth(1).expect("machine-readable line");
        let payload: serde_json::Value =
            serde_json::from_str(machine).expect("report must be valid JSON");

        assert_eq!(payload["persona"].as_str(), Some("insider"));
    }
}
