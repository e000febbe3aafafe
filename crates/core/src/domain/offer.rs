use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    Buyer,
    Seller,
}

/// A single priced utterance in the negotiation. Immutable once recorded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub actor: Actor,
    pub round: u8,
    pub price: Decimal,
    pub message: String,
    pub recorded_at: DateTime<Utc>,
}

impl Offer {
    pub fn new(actor: Actor, round: u8, price: Decimal, message: impl Into<String>) -> Self {
        Self { actor, round, price, message: message.into(), recorded_at: Utc::now() }
    }
}

/// Ordered, append-only record of every offer exchanged in a session.
/// Entries are never mutated or removed; readers get shared slices only.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OfferLedger {
    entries: Vec<Offer>,
}

impl OfferLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, offer: Offer) {
        self.entries.push(offer);
    }

    pub fn offers(&self) -> &[Offer] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last_price_for(&self, actor: Actor) -> Option<Decimal> {
        self.entries.iter().rev().find(|offer| offer.actor == actor).map(|offer| offer.price)
    }

    pub fn prices_for(&self, actor: Actor) -> Vec<Decimal> {
        self.entries.iter().filter(|offer| offer.actor == actor).map(|offer| offer.price).collect()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{Actor, Offer, OfferLedger};

    #[test]
    fn ledger_preserves_order_and_tracks_last_prices_per_actor() {
        let mut ledger = OfferLedger::new();
        ledger.record(Offer::new(Actor::Seller, 1, Decimal::new(1500, 0), "opening ask"));
        ledger.record(Offer::new(Actor::Buyer, 1, Decimal::new(650, 0), "anchor"));
        ledger.record(Offer::new(Actor::Seller, 2, Decimal::new(1200, 0), "counter"));

        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.offers()[0].actor, Actor::Seller);
        assert_eq!(ledger.last_price_for(Actor::Buyer), Some(Decimal::new(650, 0)));
        assert_eq!(ledger.last_price_for(Actor::Seller), Some(Decimal::new(1200, 0)));
        assert_eq!(ledger.prices_for(Actor::Seller).len(), 2);
    }

    #[test]
    fn empty_ledger_has_no_prices() {
        let ledger = OfferLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.last_price_for(Actor::Buyer), None);
    }
}
