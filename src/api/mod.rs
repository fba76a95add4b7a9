//! Client abstraction for the MMPM REST API.
//!
//! [`ApiClient`] is the seam every console component talks through. The
//! production implementation is [`RestApiClient`]; tests use `MockApiClient`.

mod rest;
pub mod urls;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::package::{BatchReport, Package, SourceAck};

pub use rest::RestApiClient;

/// Operations offered by the MMPM backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Fetch the JSON document served at `path`.
    async fn retrieve(&self, path: &str) -> Result<Value>;

    /// Packages among `packages` whose directory already exists locally.
    async fn check_for_installation_conflicts(&self, packages: &[Package]) -> Result<Vec<Package>>;

    async fn install_modules(&self, packages: &[Package]) -> Result<BatchReport>;

    async fn uninstall_modules(&self, packages: &[Package]) -> Result<BatchReport>;

    async fn upgrade_modules(&self, packages: &[Package]) -> Result<BatchReport>;

    async fn add_external_module_source(&self, source: &Package) -> Result<SourceAck>;

    async fn remove_external_module_source(&self, sources: &[Package]) -> Result<()>;

    /// Ask the backend to re-download the package database.
    async fn refresh_modules(&self) -> Result<()>;
}
