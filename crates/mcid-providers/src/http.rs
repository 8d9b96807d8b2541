//! Shared HTTP plumbing for provider clients.

use mcid_core::{McidError, McidResult};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Thin wrapper over `reqwest::Client` applying the provider error
/// contract: 429 becomes `RateLimited`, connectivity and payload failures
/// become `Unavailable`, and "no record" responses become `None`.
pub(crate) struct ApiClient {
    client: Client,
    service: &'static str,
}

impl ApiClient {
    pub fn new(service: &'static str, timeout: Duration) -> McidResult<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            McidError::internal(format!("failed to build HTTP client: {}", e))
        })?;
        Ok(Self { client, service })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> McidResult<Option<T>> {
        debug!("GET {} ({})", url, self.service);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| McidError::unavailable(self.service, e.to_string()))?;
        self.decode(response).await
    }

    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> McidResult<Option<T>>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        debug!("POST {} ({})", url, self.service);
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| McidError::unavailable(self.service, e.to_string()))?;
        self.decode(response).await
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> McidResult<Option<T>> {
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let message = response.text().await.unwrap_or_default();
            return Err(McidError::rate_limited(self.service, message));
        }
        if status == StatusCode::NOT_FOUND || status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(McidError::unavailable(
                self.service,
                format!("unexpected status {}", status),
            ));
        }

        let text = response
            .text()
            .await
            .map_err(|e| McidError::unavailable(self.service, e.to_string()))?;
        // Some endpoints answer an empty body instead of 404.
        if text.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&text).map(Some).map_err(|e| {
            McidError::unavailable(self.service, format!("unparseable payload: {}", e))
        })
    }
}
