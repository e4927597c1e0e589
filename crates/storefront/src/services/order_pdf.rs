//! HTTP client for the remote order/PDF service.
//!
//! The service renders the order PDF and emails it
//! (`POST /send-order-pdf`), and serves rendered PDFs for the history
//! screen (`GET /order-pdf/:order_number`). One quirk inherited from
//! the deployed service: failures can come back as HTTP 200 with an
//! `error` field in the JSON body, so success requires both a 2xx
//! status and the absence of that field.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::orders::{DispatchError, OrderDispatcher, OrderPayload};

/// Errors from the remote order/PDF service.
#[derive(Debug, Error)]
pub enum OrderPdfError {
    /// HTTP transport failure (includes timeouts).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service reported a failure.
    #[error("order service error ({status}): {message}")]
    Service {
        /// HTTP status of the response.
        status: u16,
        /// Server-provided message when available.
        message: String,
    },
}

/// Client for the remote order/PDF service.
#[derive(Clone)]
pub struct OrderPdfClient {
    client: reqwest::Client,
    base_url: String,
}

impl OrderPdfClient {
    /// Create a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderPdfError::Http`] if the HTTP client fails to
    /// build.
    pub fn new(base_url: &str) -> Result<Self, OrderPdfError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Send an order for PDF rendering and email dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`OrderPdfError::Service`] on non-2xx responses or on a
    /// 2xx body carrying an `error` field, [`OrderPdfError::Http`] on
    /// transport failure.
    pub async fn send_order(&self, payload: &OrderPayload) -> Result<(), OrderPdfError> {
        let url = format!("{}/send-order-pdf", self.base_url);
        let response = self.client.post(&url).json(payload).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OrderPdfError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response.json().await?;
        if let Some(error) = body.get("error")
            && !error.is_null()
        {
            return Err(OrderPdfError::Service {
                status: status.as_u16(),
                message: error
                    .as_str()
                    .map_or_else(|| error.to_string(), str::to_owned),
            });
        }

        Ok(())
    }

    /// Fetch the rendered PDF bytes for an order number.
    ///
    /// # Errors
    ///
    /// Returns [`OrderPdfError::Service`] on non-2xx responses,
    /// [`OrderPdfError::Http`] on transport failure.
    pub async fn fetch_pdf(&self, order_number: &str) -> Result<Vec<u8>, OrderPdfError> {
        let url = format!("{}/order-pdf/{order_number}", self.base_url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OrderPdfError::Service {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl OrderDispatcher for OrderPdfClient {
    async fn send_order(&self, payload: &OrderPayload) -> Result<(), DispatchError> {
        Self::send_order(self, payload)
            .await
            .map_err(|e| DispatchError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_strips_trailing_slash() {
        let client = OrderPdfClient::new("http://localhost:3001/").unwrap();
        assert_eq!(client.base_url, "http://localhost:3001");
    }
}
