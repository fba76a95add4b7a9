//! Wiring of the console components used by every command.

use std::sync::Arc;

use anyhow::Result;

use crate::{
    api::{ApiClient, RestApiClient},
    config::Config,
    notify::TableUpdateNotifier,
    registration::RegistrationForm,
    store::DataStore,
    table::TableComponent,
    ui::{Dialogs, Snackbar, TerminalDialogs, TerminalSnackbar},
};

/// Build the REST client for the configured backend.
pub fn build_api_client(config: &Config) -> Result<RestApiClient> {
    let http = config.build_http_client()?;
    Ok(RestApiClient::new(http, &config.api_url))
}

/// Components shared by the tables a command creates.
pub struct Services {
    pub api: Arc<dyn ApiClient>,
    pub dialogs: Arc<TerminalDialogs>,
    pub snackbar: Arc<dyn Snackbar>,
    pub updates: TableUpdateNotifier,
}

impl Services {
    pub fn new(config: &Config, registration: RegistrationForm, interactive: bool) -> Result<Self> {
        let api = build_api_client(config)?;
        Ok(Self::from_parts(
            Arc::new(api),
            TerminalDialogs::new(registration, interactive),
            Arc::new(TerminalSnackbar),
        ))
    }

    pub fn from_parts(
        api: Arc<dyn ApiClient>,
        dialogs: TerminalDialogs,
        snackbar: Arc<dyn Snackbar>,
    ) -> Self {
        Self {
            api,
            dialogs: Arc::new(dialogs),
            snackbar,
            updates: TableUpdateNotifier::new(),
        }
    }

    /// A table bound to `url`, sharing this command's update notifier.
    pub fn table(&self, url: &str) -> TableComponent {
        let dialogs: Arc<dyn Dialogs> = self.dialogs.clone();
        TableComponent::new(
            url,
            self.api.clone(),
            dialogs,
            self.snackbar.clone(),
            self.updates.clone(),
        )
    }

    pub fn store(&self) -> DataStore {
        DataStore::new(self.api.clone())
    }
}
