use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::phase::RoundPhase;

/// Template selector for the rendered buyer message. Chosen purely from the
/// round phase; it never influences price math.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneId {
    Anchoring,
    Balanced,
    Urgency,
    Closing,
}

impl ToneId {
    pub fn for_phase(phase: RoundPhase) -> Self {
        match phase {
            RoundPhase::Opening => Self::Anchoring,
            RoundPhase::Moderate => Self::Balanced,
            RoundPhase::Pressure => Self::Urgency,
            RoundPhase::Final => Self::Closing,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anchoring => "anchoring",
            Self::Balanced => "balanced",
            Self::Urgency => "urgency",
            Self::Closing => "closing",
        }
    }
}

/// The templating key handed to a renderer: tone, mirrored seller terms, and
/// the buyer's counter price.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FramedMessage {
    pub tone: ToneId,
    pub emphasized_terms: Vec<String>,
    pub buyer_price: Decimal,
}

/// Scans the seller's message for a fixed keyword set and selects a tone for
/// the reply. Matching is case-insensitive; emphasized terms keep the order
/// of their first occurrence in the seller's message, without duplicates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageFramer {
    keywords: Vec<String>,
}

pub fn default_keywords() -> Vec<String> {
    [
        "quality",
        "market",
        "best price",
        "value",
        "fair",
        "discount",
        "offer",
        "deal",
        "partnership",
        "urgent",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

impl MessageFramer {
    pub fn new(keywords: Vec<String>) -> Self {
        let keywords = keywords
            .into_iter()
            .map(|keyword| keyword.trim().to_ascii_lowercase())
            .filter(|keyword| !keyword.is_empty())
            .collect();
        Self { keywords }
    }

    pub fn frame(
        &self,
        phase: RoundPhase,
        seller_message: &str,
        buyer_price: Decimal,
    ) -> FramedMessage {
        let haystack = seller_message.to_ascii_lowercase();

        let mut matches: Vec<(usize, &str)> = self
            .keywords
            .iter()
            .filter_map(|keyword| haystack.find(keyword.as_str()).map(|at| (at, keyword.as_str())))
            .collect();
        matches.sort_by_key(|(at, _)| *at);
        matches.dedup_by(|left, right| left.1 == right.1);

        FramedMessage {
            tone: ToneId::for_phase(phase),
            emphasized_terms: matches.into_iter().map(|(_, keyword)| keyword.to_string()).collect(),
            buyer_price,
        }
    }
}

impl Default for MessageFramer {
    fn default() -> Self {
        Self::new(default_keywords())
    }
}

/// Renders a framed message into the literal sentence recorded with the
/// offer. Sentence generation is a collaborator concern; the engine only
/// supplies the key.
pub trait MessageRenderer: Send + Sync {
    fn render(&self, framed: &FramedMessage) -> String;
}

/// Minimal renderer used when no persona templating is attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainRenderer;

impl MessageRenderer for PlainRenderer {
    fn render(&self, framed: &FramedMessage) -> String {
        if framed.emphasized_terms.is_empty() {
            format!("Offering {} ({})", framed.buyer_price, framed.tone.as_str())
        } else {
            format!(
                "Offering {} ({}), noting {}",
                framed.buyer_price,
                framed.tone.as_str(),
                framed.emphasized_terms.join(", ")
            )
        }
    }
}
