//! In-memory cache of the package collections shown by the console.
//!
//! Every collection lives in a `watch` channel: it always holds the latest
//! value and hands it to new subscribers immediately. Collections are only
//! ever replaced as a whole by [`DataStore::load`].

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use log::{debug, error, info};
use serde_json::Value;
use tokio::sync::watch;

use crate::api::{ApiClient, urls};
use crate::package::{Package, flatten_catalog, packages_from_value};

pub type EnvironmentVars = BTreeMap<String, String>;

/// Result of removing installed packages from the available listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reconciled {
    pub marketplace: Vec<Package>,
    pub installed: Vec<Package>,
    pub external: Vec<Package>,
}

/// Build the marketplace view: everything available (marketplace plus
/// external sources) minus what is installed.
///
/// Each installed package removes at most one entry, the first one that is
/// the same package. Duplicates beyond that stay listed.
pub fn reconcile(
    marketplace: Vec<Package>,
    installed: Vec<Package>,
    external: Vec<Package>,
) -> Reconciled {
    let mut available: Vec<Package> = marketplace
        .into_iter()
        .chain(external.iter().cloned())
        .collect();

    for installed_pkg in &installed {
        if let Some(index) = available
            .iter()
            .position(|candidate| candidate.is_same_package(installed_pkg))
        {
            available.remove(index);
        }
    }

    Reconciled {
        marketplace: available,
        installed,
        external,
    }
}

pub struct DataStore {
    api: Arc<dyn ApiClient>,
    marketplace: watch::Sender<Vec<Package>>,
    installed: watch::Sender<Vec<Package>>,
    external: watch::Sender<Vec<Package>>,
    upgradeable: watch::Sender<Vec<Package>>,
    available_upgrades: watch::Sender<Value>,
    environment: watch::Sender<EnvironmentVars>,
}

impl DataStore {
    pub fn new(api: Arc<dyn ApiClient>) -> Self {
        Self {
            api,
            marketplace: watch::channel(Vec::new()).0,
            installed: watch::channel(Vec::new()).0,
            external: watch::channel(Vec::new()).0,
            upgradeable: watch::channel(Vec::new()).0,
            available_upgrades: watch::channel(Value::Object(Default::default())).0,
            environment: watch::channel(EnvironmentVars::new()).0,
        }
    }

    /// Refresh every collection from the backend.
    ///
    /// The environment, the upgrade check and the package listings are
    /// fetched concurrently. A failing sequence is logged and leaves its
    /// collections untouched; the others still publish.
    pub async fn load(&self) {
        info!("Loading package collections");
        tokio::join!(
            self.load_environment(),
            self.load_upgradeable(),
            self.load_packages()
        );
    }

    async fn load_environment(&self) {
        match self.fetch_environment().await {
            Ok(vars) => {
                debug!("Loaded {} environment variable(s)", vars.len());
                self.environment.send_replace(vars);
            }
            Err(e) => error!("Failed to load environment variables: {:#}", e),
        }
    }

    async fn fetch_environment(&self) -> Result<EnvironmentVars> {
        let payload = self.api.retrieve(urls::ENVIRONMENT_VARS).await?;
        let Value::Object(entries) = payload else {
            bail!("Environment variables are not an object");
        };

        Ok(entries
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect())
    }

    async fn load_upgradeable(&self) {
        let update = match self.api.retrieve(urls::PACKAGES_UPDATE).await {
            Ok(update) => update,
            Err(e) => {
                error!("Failed to check for updates: {:#}", e);
                return;
            }
        };
        self.available_upgrades.send_replace(update);

        match self.fetch_upgradeable().await {
            Ok(packages) => {
                debug!("{} package(s) can be upgraded", packages.len());
                self.upgradeable.send_replace(packages);
            }
            Err(e) => error!("Failed to load upgradeable packages: {:#}", e),
        }
    }

    async fn fetch_upgradeable(&self) -> Result<Vec<Package>> {
        let payload = self.api.retrieve(urls::PACKAGES_UPGRADEABLE).await?;
        match payload.get("packages") {
            Some(packages) => packages_from_value(packages),
            None => Ok(Vec::new()),
        }
    }

    async fn load_packages(&self) {
        match self.fetch_packages().await {
            Ok(reconciled) => {
                debug!(
                    "Publishing {} marketplace, {} installed, {} external package(s)",
                    reconciled.marketplace.len(),
                    reconciled.installed.len(),
                    reconciled.external.len()
                );
                self.marketplace.send_replace(reconciled.marketplace);
                self.installed.send_replace(reconciled.installed);
                self.external.send_replace(reconciled.external);
            }
            Err(e) => error!("Failed to load packages: {:#}", e),
        }
    }

    async fn fetch_packages(&self) -> Result<Reconciled> {
        let marketplace = self.api.retrieve(urls::MARKETPLACE).await?;
        let installed = self.api.retrieve(urls::INSTALLED).await?;
        let external = self.api.retrieve(urls::EXTERNAL).await?;

        Ok(reconcile(
            flatten_catalog(&marketplace).context("Invalid marketplace listing")?,
            flatten_catalog(&installed).context("Invalid installed listing")?,
            flatten_catalog(&external).context("Invalid external source listing")?,
        ))
    }

    pub fn marketplace_packages(&self) -> watch::Receiver<Vec<Package>> {
        self.marketplace.subscribe()
    }

    pub fn installed_packages(&self) -> watch::Receiver<Vec<Package>> {
        self.installed.subscribe()
    }

    pub fn external_packages(&self) -> watch::Receiver<Vec<Package>> {
        self.external.subscribe()
    }

    pub fn upgradeable_packages(&self) -> watch::Receiver<Vec<Package>> {
        self.upgradeable.subscribe()
    }

    pub fn available_upgrades(&self) -> watch::Receiver<Value> {
        self.available_upgrades.subscribe()
    }

    pub fn environment_variables(&self) -> watch::Receiver<EnvironmentVars> {
        self.environment.subscribe()
    }
}
