use rust_decimal::Decimal;

use haggle_core::domain::offer::Offer;

#[derive(Clone, Debug, PartialEq)]
pub struct SellerAsk {
    pub price: Decimal,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SellerResponse {
    /// Seller takes the buyer's last offer as-is.
    Accept,
    Counter { price: Decimal, message: String },
}

/// The seller counterpart. The engine treats it as an opaque collaborator:
/// given the buyer's last offer it either accepts or states a new price.
pub trait SellerAgent {
    fn opening_ask(&mut self) -> SellerAsk;
    fn respond(&mut self, buyer_offer: &Offer) -> SellerResponse;
}

/// Deterministic reference seller for simulations: opens at a fixed markup
/// over market, accepts once the buyer clears the floor plus margin, and
/// softens its counter climb in late rounds.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptedSeller {
    market_price: Decimal,
    floor_price: Decimal,
    opening_markup: Decimal,
    accept_margin: Decimal,
    early_climb: Decimal,
    late_climb: Decimal,
    late_round_start: u8,
}

impl ScriptedSeller {
    pub fn new(market_price: Decimal, floor_price: Decimal) -> Self {
        Self {
            market_price,
            floor_price,
            opening_markup: Decimal::new(150, 2),
            accept_margin: Decimal::new(110, 2),
            early_climb: Decimal::new(115, 2),
            late_climb: Decimal::new(105, 2),
            late_round_start: 8,
        }
    }

    pub fn with_late_round_start(mut self, round: u8) -> Self {
        self.late_round_start = round;
        self
    }

    pub fn floor_price(&self) -> Decimal {
        self.floor_price
    }
}

impl SellerAgent for ScriptedSeller {
    fn opening_ask(&mut self) -> SellerAsk {
        let price = self.market_price * self.opening_markup;
        SellerAsk {
            price,
            message: format!("These are premium quality goods. I'm asking {price} for the lot."),
        }
    }

    fn respond(&mut self, buyer_offer: &Offer) -> SellerResponse {
        if buyer_offer.price >= self.floor_price * self.accept_margin {
            return SellerResponse::Accept;
        }

        let climb = if buyer_offer.round >= self.late_round_start {
            self.late_climb
        } else {
            self.early_climb
        };
        let counter = (buyer_offer.price * climb).max(self.floor_price);

        let message = if buyer_offer.round >= self.late_round_start {
            format!("Final offer: {counter}. Take this deal or leave it.")
        } else {
            format!("For a fair partnership I can come down to {counter}.")
        };

        SellerResponse::Counter { price: counter, message }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use haggle_core::domain::offer::{Actor, Offer};

    use super::{ScriptedSeller, SellerAgent, SellerResponse};

    fn buyer_offer(round: u8, price: i64) -> Offer {
        Offer::new(Actor::Buyer, round, Decimal::new(price, 0), "offer")
    }

    #[test]
    fn opens_at_fifty_percent_markup_over_market() {
        let mut seller = ScriptedSeller::new(Decimal::new(1000, 0), Decimal::new(800, 0));
        let ask = seller.opening_ask();

        assert_eq!(ask.price, Decimal::new(1500, 0));
        assert!(ask.message.contains("quality"));
    }

    #[test]
    fn accepts_once_buyer_clears_floor_plus_margin() {
        let mut seller = ScriptedSeller::new(Decimal::new(1000, 0), Decimal::new(800, 0));
        assert_eq!(seller.respond(&buyer_offer(4, 880)), SellerResponse::Accept);
    }

    #[test]
    fn counters_climb_from_buyer_offer_but_never_below_floor() {
        let mut seller = ScriptedSeller::new(Decimal::new(1000, 0), Decimal::new(800, 0));

        let early = seller.respond(&buyer_offer(2, 600));
        match early {
            SellerResponse::Counter { price, .. } => assert_eq!(price, Decimal::new(800, 0)),
            SellerResponse::Accept => panic!("seller should counter a lowball"),
        }

        let late = seller.respond(&buyer_offer(9, 820));
        match late {
            SellerResponse::Counter { price, message } => {
                assert_eq!(price, Decimal::new(861, 0));
                assert!(message.contains("Final offer"));
            }
            SellerResponse::Accept => panic!("820 is below the accept margin"),
        }
    }
}
