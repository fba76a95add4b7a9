use anyhow::Result;
use log::debug;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};

use crate::http::HttpClient;

pub const DEFAULT_API_URL: &str = "http://localhost:7891";

/// Where the MMPM backend lives and how to authenticate against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub token: Option<String>,
}

impl Config {
    /// Empty values count as unset.
    pub fn new(api_url: Option<String>, token: Option<String>) -> Self {
        let api_url = api_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let token = token.filter(|token| !token.is_empty());
        Self { api_url, token }
    }

    pub fn build_http_client(&self) -> Result<HttpClient> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.token {
            let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))?;
            auth_value.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth_value);
            debug!("Using MMPM_TOKEN for authentication");
        }

        let client = Client::builder()
            .user_agent("mmpm-console")
            .default_headers(headers)
            .build()?;

        debug!("Talking to MMPM at {}", self.api_url);
        Ok(HttpClient::new(client))
    }
}
