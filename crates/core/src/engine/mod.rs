pub mod acceptance;
pub mod anchor;
pub mod ladder;
pub mod offers;
pub mod phase;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use self::acceptance::{AcceptanceDecision, AcceptanceEngine, BandedAcceptance};
use self::anchor::{AnchorEngine, RatioAnchor};
use self::ladder::SteppedLadder;
use self::offers::{GapOfferEngine, OfferEngine};
use self::phase::{PhaseSchedule, RoundPhase};

#[derive(Clone, Copy, Debug)]
pub struct RoundInput {
    pub round: u8,
    pub buyer_last: Option<Decimal>,
    pub seller_price: Decimal,
    pub market_price: Decimal,
    pub budget: Decimal,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundEvaluation {
    pub phase: RoundPhase,
    pub decision: AcceptanceDecision,
    pub counter_offer: Option<Decimal>,
}

/// One buyer decision per round: evaluate acceptance first, and only a
/// Continue decision yields a counter offer (the anchor when no prior buyer
/// offer exists, a gap concession otherwise).
pub trait BuyerPolicy: Send + Sync {
    fn evaluate_round(&self, input: RoundInput) -> RoundEvaluation;
}

pub struct DeterministicBuyerPolicy<A, O, E> {
    schedule: PhaseSchedule,
    anchor_engine: A,
    offer_engine: O,
    acceptance_engine: E,
}

pub type DefaultBuyerPolicy =
    DeterministicBuyerPolicy<RatioAnchor, GapOfferEngine<SteppedLadder>, BandedAcceptance>;

impl<A, O, E> DeterministicBuyerPolicy<A, O, E> {
    pub fn new(
        schedule: PhaseSchedule,
        anchor_engine: A,
        offer_engine: O,
        acceptance_engine: E,
    ) -> Self {
        Self { schedule, anchor_engine, offer_engine, acceptance_engine }
    }

    pub fn schedule(&self) -> PhaseSchedule {
        self.schedule
    }
}

impl Default for DefaultBuyerPolicy {
    fn default() -> Self {
        Self::new(
            PhaseSchedule::default(),
            RatioAnchor::new(Decimal::new(65, 2)),
            GapOfferEngine::new(SteppedLadder::default()),
            BandedAcceptance::default(),
        )
    }
}

impl<A, O, E> BuyerPolicy for DeterministicBuyerPolicy<A, O, E>
where
    A: AnchorEngine,
    O: OfferEngine,
    E: AcceptanceEngine,
{
    fn evaluate_round(&self, input: RoundInput) -> RoundEvaluation {
        let phase = self.schedule.classify(input.round);
        let decision = self.acceptance_engine.decide(
            phase,
            input.seller_price,
            input.market_price,
            input.budget,
        );

        let counter_offer = match decision {
            AcceptanceDecision::Continue => Some(match input.buyer_last {
                Some(buyer_last) => self.offer_engine.next_offer(
                    phase,
                    buyer_last,
                    input.seller_price,
                    input.budget,
                ),
                None => self.anchor_engine.initial_offer(input.market_price, input.budget),
            }),
            AcceptanceDecision::Accept
            | AcceptanceDecision::ForceAccept
            | AcceptanceDecision::Reject => None,
        };

        RoundEvaluation { phase, decision, counter_offer }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{
        AcceptanceDecision, BuyerPolicy, DefaultBuyerPolicy, DeterministicBuyerPolicy, RoundInput,
    };
    use crate::engine::acceptance::AcceptanceEngine;
    use crate::engine::anchor::RatioAnchor;
    use crate::engine::ladder::SteppedLadder;
    use crate::engine::offers::GapOfferEngine;
    use crate::engine::phase::{PhaseSchedule, RoundPhase};

    #[test]
    fn round_one_continue_uses_the_anchor() {
        let policy = DefaultBuyerPolicy::default();
        let evaluation = policy.evaluate_round(RoundInput {
            round: 1,
            buyer_last: None,
            seller_price: Decimal::new(1500, 0),
            market_price: Decimal::new(1000, 0),
            budget: Decimal::new(900, 0),
        });

        assert_eq!(evaluation.phase, RoundPhase::Opening);
        assert_eq!(evaluation.decision, AcceptanceDecision::Continue);
        assert_eq!(evaluation.counter_offer, Some(Decimal::new(650, 0)));
    }

    #[test]
    fn later_rounds_concede_a_fraction_of_the_gap() {
        let policy = DefaultBuyerPolicy::default();
        let evaluation = policy.evaluate_round(RoundInput {
            round: 2,
            buyer_last: Some(Decimal::new(650, 0)),
            seller_price: Decimal::new(950, 0),
            market_price: Decimal::new(1000, 0),
            budget: Decimal::new(900, 0),
        });

        assert_eq!(evaluation.decision, AcceptanceDecision::Continue);
        assert_eq!(evaluation.counter_offer, Some(Decimal::new(665, 0)));
    }

    #[test]
    fn terminal_decisions_carry_no_counter_offer() {
        let policy = DefaultBuyerPolicy::default();
        let evaluation = policy.evaluate_round(RoundInput {
            round: 3,
            buyer_last: Some(Decimal::new(700, 0)),
            seller_price: Decimal::new(880, 0),
            market_price: Decimal::new(1000, 0),
            budget: Decimal::new(1000, 0),
        });

        assert_eq!(evaluation.decision, AcceptanceDecision::Accept);
        assert_eq!(evaluation.counter_offer, None);
    }

    #[test]
    fn policy_supports_explicit_engine_interfaces() {
        struct AlwaysContinue;

        impl AcceptanceEngine for AlwaysContinue {
            fn decide(
                &self,
                _phase: RoundPhase,
                _seller_price: Decimal,
                _market_price: Decimal,
                _budget: Decimal,
            ) -> AcceptanceDecision {
                AcceptanceDecision::Continue
            }
        }

        let policy = DeterministicBuyerPolicy::new(
            PhaseSchedule::default(),
            RatioAnchor::new(Decimal::new(65, 2)),
            GapOfferEngine::new(SteppedLadder::default()),
            AlwaysContinue,
        );

        let evaluation = policy.evaluate_round(RoundInput {
            round: 10,
            buyer_last: Some(Decimal::new(650, 0)),
            seller_price: Decimal::new(700, 0),
            market_price: Decimal::new(1000, 0),
            budget: Decimal::new(900, 0),
        });

        assert_eq!(evaluation.decision, AcceptanceDecision::Continue);
        assert!(evaluation.counter_offer.is_some());
    }
}
