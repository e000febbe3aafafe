use anyhow::{anyhow, Result};
use tracing::info;

use haggle_core::domain::outcome::SessionReport;
use haggle_core::engine::BuyerPolicy;
use haggle_core::framing::MessageRenderer;
use haggle_core::session::{NegotiationSession, RoundAdvance};

use crate::seller::{SellerAgent, SellerResponse};

/// Drive one session against a seller until it reaches a terminal outcome.
///
/// Cooperative turn-taking: the seller states a price, the session decides,
/// and only a counter offer goes back to the seller. The loop ends when the
/// session closes or the seller accepts the buyer's standing offer.
pub fn run_negotiation<P, R, S>(
    session: &mut NegotiationSession<P, R>,
    seller: &mut S,
) -> Result<SessionReport>
where
    P: BuyerPolicy,
    R: MessageRenderer,
    S: SellerAgent,
{
    let session_id = session.session_id().0.clone();
    let opening = seller.opening_ask();
    info!(
        event_name = "negotiation.seller_opened",
        session_id = %session_id,
        price = %opening.price,
        "seller stated the opening ask"
    );

    let mut ask_price = opening.price;
    let mut ask_message = opening.message;

    loop {
        match session.advance(ask_price, &ask_message)? {
            RoundAdvance::Closed { outcome } => {
                info!(
                    event_name = "negotiation.closed",
                    session_id = %session_id,
                    outcome = ?outcome,
                    "session reached a terminal outcome"
                );
                break;
            }
            RoundAdvance::Countered { offer, framed } => {
                info!(
                    event_name = "negotiation.buyer_countered",
                    session_id = %session_id,
                    round = offer.round,
                    price = %offer.price,
                    tone = framed.tone.as_str(),
                    "buyer countered the seller's ask"
                );

                match seller.respond(&offer) {
                    SellerResponse::Accept => {
                        let outcome = session.close_on_seller_accept()?;
                        info!(
                            event_name = "negotiation.seller_accepted",
                            session_id = %session_id,
                            outcome = ?outcome,
                            "seller accepted the buyer's offer"
                        );
                        break;
                    }
                    SellerResponse::Counter { price, message } => {
                        ask_price = price;
                        ask_message = message;
                    }
                }
            }
        }
    }

    session
        .report()
        .ok_or_else(|| anyhow!("session {session_id} closed without producing a report"))
}
