pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod framing;
pub mod session;
pub mod telemetry;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, PolicyConfig};
pub use domain::offer::{Actor, Offer, OfferLedger, SessionId};
pub use domain::outcome::{NegotiationOutcome, SessionReport};
pub use engine::acceptance::{AcceptanceDecision, AcceptanceEngine, BandedAcceptance};
pub use engine::anchor::{AnchorEngine, RatioAnchor};
pub use engine::ladder::{ConcessionEngine, SteppedLadder};
pub use engine::offers::{GapOfferEngine, OfferEngine};
pub use engine::phase::{PhaseSchedule, RoundPhase};
pub use engine::{
    BuyerPolicy, DefaultBuyerPolicy, DeterministicBuyerPolicy, RoundEvaluation, RoundInput,
};
pub use errors::{ApplicationError, DomainError};
pub use framing::{FramedMessage, MessageFramer, MessageRenderer, PlainRenderer, ToneId};
pub use session::{NegotiationSession, RoundAdvance, SessionConfig, SessionStatus};
pub use telemetry::{
    InMemoryTelemetrySink, NegotiationEventType, NegotiationTelemetryEvent, TelemetryContext,
    TelemetrySink,
};
