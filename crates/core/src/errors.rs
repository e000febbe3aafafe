use thiserror::Error;

use crate::domain::outcome::NegotiationOutcome;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("invalid session configuration: {0}")]
    InvalidSessionConfig(String),
    #[error("session is already closed with outcome {outcome:?}")]
    SessionClosed { outcome: NegotiationOutcome },
    #[error("seller accepted before any buyer offer was recorded")]
    SellerAcceptWithoutOffer,
    #[error("buyer policy returned no counter offer for round {round}")]
    MissingCounterOffer { round: u8 },
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("configuration failure: {0}")]
    Configuration(String),
    #[error("seller collaborator failure: {0}")]
    Collaborator(String),
}

#[cfg(test)]
mod tests {
    use crate::domain::outcome::NegotiationOutcome;
    use crate::errors::{ApplicationError, DomainError};

    #[test]
    fn domain_errors_wrap_transparently_into_application_errors() {
        let application = ApplicationError::from(DomainError::SessionClosed {
            outcome: NegotiationOutcome::Failed,
        });

        assert!(application.to_string().contains("already closed"));
    }

    #[test]
    fn configuration_errors_carry_their_message() {
        let error = ApplicationError::Configuration("max_rounds must be at least 1".to_string());
        assert!(error.to_string().contains("max_rounds"));
    }
}
