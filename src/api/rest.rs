use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{ApiClient, urls};
use crate::http::{HttpClient, decode_payload};
use crate::package::{BatchReport, Package, SourceAck};

#[derive(Deserialize)]
struct ConflictReport {
    #[serde(default)]
    conflicts: Vec<Package>,
}

/// [`ApiClient`] backed by the MMPM HTTP API.
pub struct RestApiClient {
    http: HttpClient,
    api_url: String,
}

impl RestApiClient {
    #[tracing::instrument(skip(http))]
    pub fn new(http: HttpClient, api_url: &str) -> Self {
        Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, urls::endpoint_path(path))
    }

    async fn post_selected(&self, path: &str, packages: &[Package]) -> Result<Value> {
        self.http
            .send_json(
                Method::POST,
                &self.url(path),
                &json!({ "selected-modules": packages }),
            )
            .await
    }
}

#[async_trait]
impl ApiClient for RestApiClient {
    #[tracing::instrument(skip(self))]
    async fn retrieve(&self, path: &str) -> Result<Value> {
        let body = self
            .http
            .get_json(&self.url(path))
            .await
            .with_context(|| format!("Failed to retrieve {}", path))?;
        decode_payload(body)
    }

    #[tracing::instrument(skip(self, packages))]
    async fn check_for_installation_conflicts(&self, packages: &[Package]) -> Result<Vec<Package>> {
        debug!("Checking {} package(s) for conflicts", packages.len());
        let body = self
            .post_selected(urls::CHECK_FOR_INSTALLATION_CONFLICTS, packages)
            .await
            .context("Failed to check for installation conflicts")?;
        let report: ConflictReport = decode_payload(body)?;
        Ok(report.conflicts)
    }

    #[tracing::instrument(skip(self, packages))]
    async fn install_modules(&self, packages: &[Package]) -> Result<BatchReport> {
        let body = self
            .post_selected(urls::INSTALL_MODULES, packages)
            .await
            .context("Failed to install modules")?;
        decode_payload(body)
    }

    #[tracing::instrument(skip(self, packages))]
    async fn uninstall_modules(&self, packages: &[Package]) -> Result<BatchReport> {
        let body = self
            .post_selected(urls::UNINSTALL_MODULES, packages)
            .await
            .context("Failed to uninstall modules")?;
        decode_payload(body)
    }

    #[tracing::instrument(skip(self, packages))]
    async fn upgrade_modules(&self, packages: &[Package]) -> Result<BatchReport> {
        let body = self
            .post_selected(urls::UPGRADE_MODULES, packages)
            .await
            .context("Failed to upgrade modules")?;
        decode_payload(body)
    }

    #[tracing::instrument(skip(self, source))]
    async fn add_external_module_source(&self, source: &Package) -> Result<SourceAck> {
        let body = self
            .http
            .send_json(
                Method::POST,
                &self.url(urls::ADD_EXTERNAL_MODULE_SOURCE),
                &json!({ "external-source": source }),
            )
            .await
            .context("Failed to add external module source")?;
        decode_payload(body)
    }

    #[tracing::instrument(skip(self, sources))]
    async fn remove_external_module_source(&self, sources: &[Package]) -> Result<()> {
        self.http
            .send_json(
                Method::DELETE,
                &self.url(urls::REMOVE_EXTERNAL_MODULE_SOURCE),
                &json!({ "external-sources": sources }),
            )
            .await
            .context("Failed to remove external module sources")?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn refresh_modules(&self) -> Result<()> {
        self.http
            .get_json(&self.url(urls::REFRESH_MODULES))
            .await
            .context("Failed to refresh modules")?;
        Ok(())
    }
}
