use thiserror::Error;

#[derive(Debug, Error)]
pub enum StripeApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid REST request: {0}")]
    RestRequestError(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
}

/// Reasons an inbound webhook delivery is rejected before it reaches any business logic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    #[error("No webhook signature was provided")]
    MissingSignature,
    #[error("The webhook signing secret has not been configured on this server")]
    ConfigurationError,
    #[error("Webhook signature verification failed. {0}")]
    InvalidSignature(String),
    #[error("Webhook payload is not a valid event envelope. {0}")]
    MalformedEvent(String),
}
