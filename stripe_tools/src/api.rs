use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{config::StripeConfig, LineItem, LineItemList, StripeApiError};

/// Stripe's maximum page size for list endpoints
const PAGE_SIZE: &str = "100";

#[derive(Clone)]
pub struct StripeApi {
    config: StripeConfig,
    client: Arc<Client>,
}

impl StripeApi {
    pub fn new(config: StripeConfig) -> Result<Self, StripeApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        let mut val = HeaderValue::from_str(&format!("Bearer {}", config.secret_key.reveal()))
            .map_err(|e| StripeApiError::Initialization(e.to_string()))?;
        val.set_sensitive(true);
        headers.insert(AUTHORIZATION, val);
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| StripeApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<T, StripeApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {url}");
        let mut req = self.client.request(method, url);
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.form(&body);
        }
        let response = req.send().await.map_err(|e| StripeApiError::RestRequestError(e.to_string()))?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| StripeApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| StripeApiError::RestResponseError(e.to_string()))?;
            Err(StripeApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/v1{path}", self.config.api_url.trim_end_matches('/'))
    }

    /// Fetches every line item for the checkout session, with the product objects expanded so that the metadata
    /// attached at checkout time is available.
    pub async fn fetch_line_items(&self, session_id: &str) -> Result<Vec<LineItem>, StripeApiError> {
        let path = format!("/checkout/sessions/{session_id}/line_items");
        let mut result = Vec::new();
        let mut starting_after: Option<String> = None;
        loop {
            let mut params = vec![("limit", PAGE_SIZE), ("expand[]", "data.price.product")];
            if let Some(cursor) = starting_after.as_deref() {
                params.push(("starting_after", cursor));
            }
            let page = self.rest_query::<LineItemList, ()>(Method::GET, &path, &params, None).await?;
            trace!("Fetched {} line items for session {session_id}", page.data.len());
            let last_id = page.data.last().map(|li| li.id.clone());
            result.extend(page.data);
            match (page.has_more, last_id) {
                (true, Some(id)) => starting_after = Some(id),
                _ => break,
            }
        }
        debug!("Fetched {} line items for checkout session {session_id}", result.len());
        Ok(result)
    }
}
