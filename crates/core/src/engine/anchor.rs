use rust_decimal::Decimal;

pub trait AnchorEngine: Send + Sync {
    fn initial_offer(&self, market_price: Decimal, budget: Decimal) -> Decimal;
}

/// Fixed-ratio anchoring: open at `anchor_ratio * market_price`, clamped so
/// the opening offer never exceeds the budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RatioAnchor {
    anchor_ratio: Decimal,
}

impl RatioAnchor {
    pub fn new(anchor_ratio: Decimal) -> Self {
        Self { anchor_ratio }
    }
}

impl AnchorEngine for RatioAnchor {
    fn initial_offer(&self, market_price: Decimal, budget: Decimal) -> Decimal {
        (self.anchor_ratio * market_price).min(budget)
    }
}
