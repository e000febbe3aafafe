use rust_decimal::Decimal;

use crate::engine::ladder::ConcessionEngine;
use crate::engine::phase::RoundPhase;

pub trait OfferEngine: Send + Sync {
    fn next_offer(
        &self,
        phase: RoundPhase,
        buyer_last: Decimal,
        seller_last: Decimal,
        budget: Decimal,
    ) -> Decimal;
}

/// Concedes a phase-dependent fraction of the remaining price gap.
///
/// The result is clamped, in order: never above budget, never above the
/// seller's last stated price, never below the buyer's previous offer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GapOfferEngine<C> {
    ladder: C,
}

impl<C> GapOfferEngine<C> {
    pub fn new(ladder: C) -> Self {
        Self { ladder }
    }
}

impl<C> OfferEngine for GapOfferEngine<C>
where
    C: ConcessionEngine,
{
    fn next_offer(
        &self,
        phase: RoundPhase,
        buyer_last: Decimal,
        seller_last: Decimal,
        budget: Decimal,
    ) -> Decimal {
        concede_toward(self.ladder.concession_rate(phase), buyer_last, seller_last, budget)
    }
}

pub fn concede_toward(
    rate: Decimal,
    buyer_last: Decimal,
    seller_last: Decimal,
    budget: Decimal,
) -> Decimal {
    let gap = seller_last - buyer_last;
    if gap <= Decimal::ZERO {
        return seller_last.min(budget);
    }

    let raised = buyer_last + rate * gap;
    raised.min(budget).min(seller_last).max(buyer_last)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{concede_toward, GapOfferEngine, OfferEngine};
    use crate::engine::ladder::SteppedLadder;
    use crate::engine::phase::RoundPhase;

    #[test]
    fn concedes_opening_fraction_of_gap() {
        let engine = GapOfferEngine::new(SteppedLadder::default());
        let offer = engine.next_offer(
            RoundPhase::Opening,
            Decimal::new(650, 0),
            Decimal::new(950, 0),
            Decimal::new(900, 0),
        );

        assert_eq!(offer, Decimal::new(665, 0));
    }

    #[test]
    fn matched_ask_returns_seller_price_without_raising() {
        let offer = concede_toward(
            Decimal::new(10, 2),
            Decimal::new(800, 0),
            Decimal::new(780, 0),
            Decimal::new(900, 0),
        );

        assert_eq!(offer, Decimal::new(780, 0));
    }

    #[test]
    fn matched_ask_is_still_capped_by_budget() {
        let offer = concede_toward(
            Decimal::new(10, 2),
            Decimal::new(800, 0),
            Decimal::new(795, 0),
            Decimal::new(790, 0),
        );

        assert_eq!(offer, Decimal::new(790, 0));
    }

    #[test]
    fn budget_caps_the_raise() {
        let offer = concede_toward(
            Decimal::new(50, 2),
            Decimal::new(880, 0),
            Decimal::new(1200, 0),
            Decimal::new(900, 0),
        );

        assert_eq!(offer, Decimal::new(900, 0));
    }

    #[test]
    fn raise_never_retracts_previous_offer() {
        let offer = concede_toward(
            Decimal::new(5, 2),
            Decimal::new(700, 0),
            Decimal::new(710, 0),
            Decimal::new(900, 0),
        );

        assert!(offer >= Decimal::new(700, 0));
        assert!(offer <= Decimal::new(710, 0));
    }
}
