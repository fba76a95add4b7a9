//! JSON HTTP client used by the REST API client.

use anyhow::{Context, Result};
use log::debug;
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;

use super::error::classify_error;

/// Thin wrapper over a reqwest Client that speaks JSON.
///
/// No retries and no timeouts are applied here; a failed request is
/// reported once to the caller.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Performs a GET request and returns the JSON body.
    #[tracing::instrument(skip(self))]
    pub async fn get_json(&self, url: &str) -> Result<Value> {
        debug!("GET JSON from {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        Self::read_json(response).await
    }

    /// Sends `body` as JSON with the given method and returns the JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: &B,
    ) -> Result<Value> {
        debug!("{} JSON to {}...", method, url);

        let response = self
            .client
            .request(method, url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        Self::read_json(response).await
    }

    async fn read_json(response: reqwest::Response) -> Result<Value> {
        let response = response.error_for_status().map_err(classify_error)?;

        let text = response
            .text()
            .await
            .context("Failed to read response body")?;

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).context("Failed to parse JSON response")
    }
}
