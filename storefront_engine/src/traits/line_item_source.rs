use thiserror::Error;

use crate::sfe_api::reconciliation_objects::PaidLineItem;

#[derive(Debug, Clone, Error)]
#[error("Could not fetch line items for session {session_id}: {reason}")]
pub struct LineItemSourceError {
    pub session_id: String,
    pub reason: String,
}

impl LineItemSourceError {
    pub fn new<S: Into<String>>(session_id: &str, reason: S) -> Self {
        Self { session_id: session_id.to_string(), reason: reason.into() }
    }
}

/// Supplies the purchased line items of a checkout session, as reported by the payment provider.
#[allow(async_fn_in_trait)]
pub trait LineItemSource {
    async fn fetch_line_items(&self, session_id: &str) -> Result<Vec<PaidLineItem>, LineItemSourceError>;
}
