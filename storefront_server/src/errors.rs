use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::*;
use storefront_engine::ReconciliationError;
use stripe_tools::WebhookError;
use thiserror::Error;

/// Every error the server can return. The status code tells Stripe whether a retry makes sense: 4xx responses are
/// final, 5xx responses are redelivered.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("The webhook signature header is missing.")]
    MissingSignature,
    #[error("The webhook signature is invalid. {0}")]
    InvalidSignature(String),
    #[error("The webhook payload is not a valid event. {0}")]
    MalformedEvent(String),
    #[error("The checkout session cannot be turned into an order. {0}")]
    InvalidSession(String),
    #[error("Could not fetch line items from the payment provider. {0}")]
    LineItemFetchError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingSignature => StatusCode::BAD_REQUEST,
            Self::InvalidSignature(_) => StatusCode::BAD_REQUEST,
            Self::MalformedEvent(_) => StatusCode::BAD_REQUEST,
            Self::InvalidSession(_) => StatusCode::BAD_REQUEST,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::LineItemFetchError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<WebhookError> for ServerError {
    fn from(e: WebhookError) -> Self {
        match e {
            WebhookError::MissingSignature => Self::MissingSignature,
            WebhookError::ConfigurationError => {
                error!("🚨️ A webhook was received, but no webhook signing secret is configured. Set SFS_STRIPE_WEBHOOK_SECRET.");
                Self::ConfigurationError(e.to_string())
            },
            WebhookError::InvalidSignature(s) => Self::InvalidSignature(s),
            WebhookError::MalformedEvent(s) => Self::MalformedEvent(s),
        }
    }
}

impl From<ReconciliationError> for ServerError {
    fn from(e: ReconciliationError) -> Self {
        match e {
            ReconciliationError::InvalidSession(s) => Self::InvalidSession(s),
            ReconciliationError::LineItemFetch(e) => Self::LineItemFetchError(e.to_string()),
            ReconciliationError::Persistence(s) => Self::BackendError(s),
        }
    }
}
