use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PolicyConfig;
use crate::domain::offer::{Actor, Offer, OfferLedger, SessionId};
use crate::domain::outcome::{NegotiationOutcome, SessionReport};
use crate::engine::acceptance::AcceptanceDecision;
use crate::engine::{BuyerPolicy, DefaultBuyerPolicy, RoundInput};
use crate::errors::DomainError;
use crate::framing::{FramedMessage, MessageFramer, MessageRenderer, PlainRenderer};
use crate::telemetry::{
    NegotiationEventType, NegotiationTelemetryEvent, TelemetryContext, TelemetrySink,
};

/// Per-session inputs, fixed for the session lifetime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub session_id: SessionId,
    pub market_price: Decimal,
    pub budget: Decimal,
}

impl SessionConfig {
    pub fn new(session_id: impl Into<String>, market_price: Decimal, budget: Decimal) -> Self {
        Self { session_id: SessionId(session_id.into()), market_price, budget }
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.market_price <= Decimal::ZERO {
            return Err(DomainError::InvalidSessionConfig(
                "market_price must be positive".to_string(),
            ));
        }
        if self.budget <= Decimal::ZERO {
            return Err(DomainError::InvalidSessionConfig("budget must be positive".to_string()));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Opening,
    Negotiating,
    Closed,
}

/// What one call to [`NegotiationSession::advance`] produced.
#[derive(Clone, Debug, PartialEq)]
pub enum RoundAdvance {
    Countered { offer: Offer, framed: FramedMessage },
    Closed { outcome: NegotiationOutcome },
}

/// The buyer-side negotiation state machine: `Opening -> Negotiating ->
/// Closed`. Owns the round counter, the offer ledger, and the terminal
/// outcome exclusively; the buyer policy and framer are consulted with
/// values and never mutate session state themselves.
pub struct NegotiationSession<P = DefaultBuyerPolicy, R = PlainRenderer> {
    config: SessionConfig,
    max_rounds: u8,
    policy: P,
    framer: MessageFramer,
    renderer: R,
    round: u8,
    status: SessionStatus,
    ledger: OfferLedger,
    outcome: Option<NegotiationOutcome>,
    rounds_used: u8,
    anomaly: Option<String>,
}

impl NegotiationSession<DefaultBuyerPolicy, PlainRenderer> {
    pub fn new(config: SessionConfig, policy_config: &PolicyConfig) -> Result<Self, DomainError> {
        Self::with_renderer(config, policy_config, PlainRenderer)
    }
}

impl<R> NegotiationSession<DefaultBuyerPolicy, R>
where
    R: MessageRenderer,
{
    pub fn with_renderer(
        config: SessionConfig,
        policy_config: &PolicyConfig,
        renderer: R,
    ) -> Result<Self, DomainError> {
        policy_config
            .validate()
            .map_err(|error| DomainError::InvalidSessionConfig(error.to_string()))?;

        Self::with_parts(
            config,
            policy_config.max_rounds,
            policy_config.build_policy(),
            policy_config.framer(),
            renderer,
        )
    }
}

impl<P, R> NegotiationSession<P, R>
where
    P: BuyerPolicy,
    R: MessageRenderer,
{
    pub fn with_parts(
        config: SessionConfig,
        max_rounds: u8,
        policy: P,
        framer: MessageFramer,
        renderer: R,
    ) -> Result<Self, DomainError> {
        config.validate()?;
        if max_rounds < 1 {
            return Err(DomainError::InvalidSessionConfig(
                "max_rounds must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            config,
            max_rounds,
            policy,
            framer,
            renderer,
            round: 1,
            status: SessionStatus::Opening,
            ledger: OfferLedger::new(),
            outcome: None,
            rounds_used: 0,
            anomaly: None,
        })
    }

    pub fn session_id(&self) -> &SessionId {
        &self.config.session_id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn round(&self) -> u8 {
        self.round
    }

    pub fn history(&self) -> &[Offer] {
        self.ledger.offers()
    }

    pub fn outcome(&self) -> Option<&NegotiationOutcome> {
        self.outcome.as_ref()
    }

    pub fn anomaly_note(&self) -> Option<&str> {
        self.anomaly.as_deref()
    }

    /// Run one round of the exchange: evaluate the seller's current ask,
    /// then either close the session or counter with the buyer's next offer.
    pub fn advance(
        &mut self,
        seller_price: Decimal,
        seller_message: &str,
    ) -> Result<RoundAdvance, DomainError> {
        self.ensure_open()?;
        self.status = SessionStatus::Negotiating;

        if seller_price <= Decimal::ZERO {
            self.anomaly = Some(format!(
                "seller returned non-positive price {seller_price} in round {}",
                self.round
            ));
            let outcome = self.close(NegotiationOutcome::Failed, self.round);
            return Ok(RoundAdvance::Closed { outcome });
        }

        self.ledger.record(Offer::new(Actor::Seller, self.round, seller_price, seller_message));

        let evaluation = self.policy.evaluate_round(RoundInput {
            round: self.round,
            buyer_last: self.ledger.last_price_for(Actor::Buyer),
            seller_price,
            market_price: self.config.market_price,
            budget: self.config.budget,
        });

        match evaluation.decision {
            AcceptanceDecision::Accept | AcceptanceDecision::ForceAccept => {
                let outcome =
                    self.close(NegotiationOutcome::Deal { price: seller_price }, self.round);
                Ok(RoundAdvance::Closed { outcome })
            }
            AcceptanceDecision::Reject => {
                let outcome = self.close(NegotiationOutcome::Failed, self.round);
                Ok(RoundAdvance::Closed { outcome })
            }
            AcceptanceDecision::Continue => {
                let Some(counter) = evaluation.counter_offer else {
                    return Err(DomainError::MissingCounterOffer { round: self.round });
                };

                let framed = self.framer.frame(evaluation.phase, seller_message, counter);
                let message = self.renderer.render(&framed);
                let offer = Offer::new(Actor::Buyer, self.round, counter, message);
                self.ledger.record(offer.clone());

                let completed_round = self.round;
                self.round = self.round.saturating_add(1);
                if self.round > self.max_rounds {
                    let outcome = self.close(NegotiationOutcome::Timeout, completed_round);
                    return Ok(RoundAdvance::Closed { outcome });
                }

                Ok(RoundAdvance::Countered { offer, framed })
            }
        }
    }

    /// Same as [`advance`](Self::advance), but mirrors the round result into
    /// a telemetry sink.
    pub fn advance_with_telemetry<S>(
        &mut self,
        seller_price: Decimal,
        seller_message: &str,
        sink: &S,
        context: &TelemetryContext,
    ) -> Result<RoundAdvance, DomainError>
    where
        S: TelemetrySink,
    {
        let round = self.round;
        let result = self.advance(seller_price, seller_message);

        match &result {
            Ok(RoundAdvance::Countered { offer, framed }) => {
                sink.emit(
                    NegotiationTelemetryEvent::new(
                        context,
                        NegotiationEventType::CounterOffered,
                        round,
                    )
                    .with_metadata("price", offer.price.to_string())
                    .with_metadata("tone", framed.tone.as_str()),
                );
            }
            Ok(RoundAdvance::Closed { outcome }) => {
                if let Some(note) = &self.anomaly {
                    sink.emit(
                        NegotiationTelemetryEvent::new(
                            context,
                            NegotiationEventType::AnomalyDetected,
                            round,
                        )
                        .with_metadata("note", note.clone()),
                    );
                }
                sink.emit(
                    NegotiationTelemetryEvent::new(
                        context,
                        NegotiationEventType::SessionClosed,
                        round,
                    )
                    .with_metadata("outcome", format!("{outcome:?}")),
                );
            }
            Err(_) => {}
        }

        result
    }

    /// The seller took the buyer's last offer: close as a deal at that price.
    pub fn close_on_seller_accept(&mut self) -> Result<NegotiationOutcome, DomainError> {
        self.ensure_open()?;

        let Some(price) = self.ledger.last_price_for(Actor::Buyer) else {
            return Err(DomainError::SellerAcceptWithoutOffer);
        };

        let rounds_used = self.round.saturating_sub(1).max(1);
        Ok(self.close(NegotiationOutcome::Deal { price }, rounds_used))
    }

    pub fn report(&self) -> Option<SessionReport> {
        self.outcome.as_ref().map(|outcome| {
            SessionReport::new(
                self.config.session_id.clone(),
                outcome.clone(),
                self.rounds_used,
                self.config.market_price,
                self.anomaly.clone(),
                self.ledger.offers().to_vec(),
            )
        })
    }

    fn ensure_open(&self) -> Result<(), DomainError> {
        match &self.outcome {
            Some(outcome) => Err(DomainError::SessionClosed { outcome: outcome.clone() }),
            None => Ok(()),
        }
    }

    fn close(&mut self, outcome: NegotiationOutcome, rounds_used: u8) -> NegotiationOutcome {
        self.status = SessionStatus::Closed;
        self.rounds_used = rounds_used;
        self.outcome = Some(outcome.clone());
        outcome
    }
}
