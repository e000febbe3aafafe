use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::offer::{Offer, SessionId};

/// Terminal result of a negotiation session. Set exactly once.
///
/// `Deal.price` never exceeds the session budget; the acceptance policy
/// refuses above-budget prices and the final round rejects them outright.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegotiationOutcome {
    Deal { price: Decimal },
    Timeout,
    Failed,
}

impl NegotiationOutcome {
    pub fn is_deal(&self) -> bool {
        matches!(self, Self::Deal { .. })
    }

    pub fn deal_price(&self) -> Option<Decimal> {
        match self {
            Self::Deal { price } => Some(*price),
            Self::Timeout | Self::Failed => None,
        }
    }
}

/// Result surface exposed once a session reaches a terminal state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: SessionId,
    pub outcome: NegotiationOutcome,
    pub rounds_used: u8,
    pub savings: Option<Decimal>,
    pub savings_pct: Option<Decimal>,
    pub anomaly: Option<String>,
    pub history: Vec<Offer>,
}

impl SessionReport {
    pub fn new(
        session_id: SessionId,
        outcome: NegotiationOutcome,
        rounds_used: u8,
        market_price: Decimal,
        anomaly: Option<String>,
        history: Vec<Offer>,
    ) -> Self {
        let savings = outcome.deal_price().map(|price| market_price - price);
        let savings_pct = savings.and_then(|saved| {
            if market_price.is_zero() {
                None
            } else {
                Some(saved * Decimal::ONE_HUNDRED / market_price)
            }
        });

        Self { session_id, outcome, rounds_used, savings, savings_pct, anomaly, history }
    }
}
