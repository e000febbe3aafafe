use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::phase::RoundPhase;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptanceDecision {
    Accept,
    Continue,
    ForceAccept,
    Reject,
}

impl AcceptanceDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Continue => "continue",
            Self::ForceAccept => "force_accept",
            Self::Reject => "reject",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Continue)
    }
}

pub trait AcceptanceEngine: Send + Sync {
    fn decide(
        &self,
        phase: RoundPhase,
        seller_price: Decimal,
        market_price: Decimal,
        budget: Decimal,
    ) -> AcceptanceDecision;
}

/// Phase-banded acceptance policy.
///
/// The budget is a hard ceiling: an above-budget ask is never accepted, and
/// at the final round it is rejected outright rather than timed out. Below
/// `early_accept_ratio * market` the deal is taken immediately in any
/// non-final phase; the pressure phase widens the band to
/// `pressure_accept_ratio * market`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BandedAcceptance {
    early_accept_ratio: Decimal,
    pressure_accept_ratio: Decimal,
}

impl BandedAcceptance {
    pub fn new(early_accept_ratio: Decimal, pressure_accept_ratio: Decimal) -> Self {
        Self { early_accept_ratio, pressure_accept_ratio }
    }
}

impl Default for BandedAcceptance {
    fn default() -> Self {
        Self { early_accept_ratio: Decimal::new(90, 2), pressure_accept_ratio: Decimal::ONE }
    }
}

impl AcceptanceEngine for BandedAcceptance {
    fn decide(
        &self,
        phase: RoundPhase,
        seller_price: Decimal,
        market_price: Decimal,
        budget: Decimal,
    ) -> AcceptanceDecision {
        if phase == RoundPhase::Final {
            return if seller_price <= budget {
                AcceptanceDecision::ForceAccept
            } else {
                AcceptanceDecision::Reject
            };
        }

        if seller_price > budget {
            return AcceptanceDecision::Continue;
        }

        if seller_price <= self.early_accept_ratio * market_price {
            return AcceptanceDecision::Accept;
        }

        if phase == RoundPhase::Pressure && seller_price <= self.pressure_accept_ratio * market_price
        {
            return AcceptanceDecision::Accept;
        }

        AcceptanceDecision::Continue
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{AcceptanceDecision, AcceptanceEngine, BandedAcceptance};
    use crate::engine::phase::RoundPhase;

    fn decide(phase: RoundPhase, seller: i64, market: i64, budget: i64) -> AcceptanceDecision {
        BandedAcceptance::default().decide(
            phase,
            Decimal::new(seller, 0),
            Decimal::new(market, 0),
            Decimal::new(budget, 0),
        )
    }

    #[test]
    fn batna_threshold_accepts_immediately_in_any_early_phase() {
        assert_eq!(decide(RoundPhase::Opening, 880, 1000, 1000), AcceptanceDecision::Accept);
        assert_eq!(decide(RoundPhase::Moderate, 900, 1000, 1000), AcceptanceDecision::Accept);
        assert_eq!(decide(RoundPhase::Pressure, 850, 1000, 1000), AcceptanceDecision::Accept);
    }

    #[test]
    fn above_budget_continues_outside_the_final_round() {
        assert_eq!(decide(RoundPhase::Opening, 950, 1000, 900), AcceptanceDecision::Continue);
        assert_eq!(decide(RoundPhase::Pressure, 950, 1000, 900), AcceptanceDecision::Continue);
    }

    #[test]
    fn cheap_but_over_budget_ask_is_not_accepted() {
        assert_eq!(decide(RoundPhase::Opening, 880, 1000, 850), AcceptanceDecision::Continue);
    }

    #[test]
    fn pressure_phase_widens_band_to_market_price() {
        assert_eq!(decide(RoundPhase::Pressure, 980, 1000, 1000), AcceptanceDecision::Accept);
        assert_eq!(decide(RoundPhase::Pressure, 1000, 1000, 1000), AcceptanceDecision::Accept);
        assert_eq!(decide(RoundPhase::Moderate, 980, 1000, 1000), AcceptanceDecision::Continue);
    }

    #[test]
    fn final_round_forces_a_decision_either_way() {
        assert_eq!(decide(RoundPhase::Final, 930, 1000, 950), AcceptanceDecision::ForceAccept);
        assert_eq!(decide(RoundPhase::Final, 850, 1000, 800), AcceptanceDecision::Reject);
    }

    #[test]
    fn uniform_band_preset_never_widens_late() {
        let strict = BandedAcceptance::new(Decimal::new(90, 2), Decimal::new(90, 2));
        let decision = strict.decide(
            RoundPhase::Pressure,
            Decimal::new(980, 0),
            Decimal::new(1000, 0),
            Decimal::new(1000, 0),
        );

        assert_eq!(decision, AcceptanceDecision::Continue);
    }
}
