use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Cannot place an order from an empty cart")]
    EmptyCart,
    #[error("Not found")]
    NotFound,
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("An order submission is already in flight")]
    SubmissionInFlight,
}
