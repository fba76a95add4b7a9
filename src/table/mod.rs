//! Package table: one collection with selection, sorting and paging, and the
//! bulk operations that act on the selection.
//!
//! A table is bound to one endpoint (`url`). It re-fetches from that endpoint
//! whenever the shared [`TableUpdateNotifier`] fires, and fires it itself
//! after every completed operation so that sibling tables follow along.
//!
//! Failures talking to the backend are logged and leave the table as it was;
//! nothing is propagated to the caller.

mod selection;
mod view;

use std::sync::Arc;

use log::{debug, error, info};

use crate::api::{ApiClient, urls};
use crate::notify::{TableUpdateNotifier, TableUpdateSubscription};
use crate::package::{BatchReport, EXTERNAL_MODULE_SOURCES, Package, flatten_catalog};
use crate::ui::{Dialogs, Snackbar};

pub use selection::SelectionModel;
pub use view::{
    DEFAULT_PAGE_SIZE, DataSource, MAX_DESCRIPTION_LENGTH, Paginator, Sort, SortColumn,
    SortDirection, truncate_description,
};

pub const EXECUTING_MESSAGE: &str = "Process executing ...";
pub const COMPLETE_MESSAGE: &str = "Process complete";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BatchOperation {
    Install,
    Uninstall,
    Upgrade,
}

impl BatchOperation {
    fn success_message(self) -> &'static str {
        match self {
            BatchOperation::Install => "Installed successfully!",
            BatchOperation::Uninstall => "Removed successfully!",
            BatchOperation::Upgrade => "Upgraded selected modules successfully!",
        }
    }

    fn failure_message(self, count: usize) -> String {
        let noun = if count == 1 { "package" } else { "packages" };
        match self {
            BatchOperation::Install => format!("{} {} failed to install", count, noun),
            BatchOperation::Uninstall => format!("Failed to remove {} {}", count, noun),
            BatchOperation::Upgrade => format!("Failed to upgrade {} {}", count, noun),
        }
    }
}

/// Apply the directories chosen in the rename dialog to the selection.
///
/// A selected package with a same-titled entry takes that entry's directory,
/// or is dropped when the directory was left empty. Packages the dialog did
/// not mention are kept unchanged.
pub fn apply_renamed_directories(selected: Vec<Package>, renamed: &[Package]) -> Vec<Package> {
    selected
        .into_iter()
        .filter_map(|mut pkg| {
            for entry in renamed.iter().filter(|entry| entry.title == pkg.title) {
                if entry.directory.is_empty() {
                    debug!("Dropping '{}' from installation", pkg.title);
                    return None;
                }
                pkg.directory = entry.directory.clone();
            }
            Some(pkg)
        })
        .collect()
}

pub struct TableComponent {
    url: String,
    api: Arc<dyn ApiClient>,
    dialogs: Arc<dyn Dialogs>,
    snackbar: Arc<dyn Snackbar>,
    updates: TableUpdateNotifier,
    subscription: Option<TableUpdateSubscription>,
    data: DataSource,
    selection: SelectionModel,
}

impl TableComponent {
    pub fn new(
        url: impl Into<String>,
        api: Arc<dyn ApiClient>,
        dialogs: Arc<dyn Dialogs>,
        snackbar: Arc<dyn Snackbar>,
        updates: TableUpdateNotifier,
    ) -> Self {
        Self {
            url: url.into(),
            api,
            dialogs,
            snackbar,
            updates,
            subscription: None,
            data: DataSource::default(),
            selection: SelectionModel::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn data(&self) -> &DataSource {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut DataSource {
        &mut self.data
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionModel {
        &mut self.selection
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Subscribe to table updates and fetch the initial rows.
    pub async fn init(&mut self) {
        if self.subscription.is_none() {
            self.subscription = Some(self.updates.subscribe());
        }
        self.retrieve().await;
    }

    /// Stop listening for table updates.
    pub fn teardown(&mut self) {
        self.subscription = None;
    }

    /// Wait for the next table update and re-fetch. Returns `false` when not
    /// subscribed or when the notifier is gone.
    pub async fn next_update(&mut self) -> bool {
        let Some(subscription) = self.subscription.as_mut() else {
            return false;
        };
        if !subscription.notified().await {
            return false;
        }
        self.retrieve().await;
        true
    }

    /// Re-fetch once if any table update arrived since the last check.
    pub async fn process_pending_updates(&mut self) -> bool {
        let pending = self
            .subscription
            .as_mut()
            .is_some_and(|subscription| subscription.take_pending() > 0);
        if pending {
            self.retrieve().await;
        }
        pending
    }

    /// Replace the rows with a fresh listing from the endpoint.
    pub async fn retrieve(&mut self) {
        self.data.paginator_mut().reset();

        let path = urls::endpoint_path(&self.url);
        let fetched = match self.api.retrieve(&path).await {
            Ok(payload) => flatten_catalog(&payload),
            Err(e) => Err(e),
        };

        match fetched {
            Ok(packages) => {
                debug!("Retrieved {} package(s) from {}", packages.len(), path);
                self.selection = SelectionModel::new();
                self.data.replace(packages);
            }
            Err(e) => error!("Failed to retrieve packages from {}: {:#}", path, e),
        }
    }

    /// Select rows by title. Returns the titles that matched nothing.
    pub fn select_titles<S: AsRef<str>>(&mut self, titles: &[S]) -> Vec<String> {
        let mut missing = Vec::new();
        for title in titles {
            let title = title.as_ref();
            let matches: Vec<Package> = self
                .data
                .rows()
                .iter()
                .filter(|pkg| pkg.title == title)
                .cloned()
                .collect();
            if matches.is_empty() {
                missing.push(title.to_string());
            }
            for pkg in &matches {
                self.selection.select(pkg);
            }
        }
        missing
    }

    /// Select every row of the filtered view, or clear the selection when all
    /// of them are selected already.
    pub fn master_toggle(&mut self) {
        let rows = self.data.filtered();
        self.selection.master_toggle(rows);
    }

    fn executing(&self) {
        self.snackbar.notify(EXECUTING_MESSAGE);
    }

    fn complete(&self) {
        self.snackbar.notify(COMPLETE_MESSAGE);
    }

    async fn report_batch(&self, operation: BatchOperation, report: BatchReport) {
        if report.is_success() {
            self.snackbar.success(operation.success_message());
        } else {
            self.dialogs.show_failures(&report.failures).await;
            self.snackbar
                .error(&operation.failure_message(report.failures.len()));
        }
        self.updates.trigger();
    }

    async fn install(&self, packages: &[Package]) {
        info!("Installing {} package(s)", packages.len());
        match self.api.install_modules(packages).await {
            Ok(report) => self.report_batch(BatchOperation::Install, report).await,
            Err(e) => error!("Failed to install packages: {:#}", e),
        }
    }

    /// Install the selection, resolving directory conflicts first.
    pub async fn install_selected(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        let selected = self.selection.take();

        let conflicts = match self.api.check_for_installation_conflicts(&selected).await {
            Ok(conflicts) => conflicts,
            Err(e) => {
                error!("Failed to check for installation conflicts: {:#}", e);
                return;
            }
        };

        if conflicts.is_empty() {
            self.install(&selected).await;
            return;
        }

        debug!("{} installation conflict(s)", conflicts.len());
        let Some(renamed) = self.dialogs.rename_conflicts(conflicts).await else {
            info!("Installation cancelled");
            return;
        };

        let remaining = apply_renamed_directories(selected, &renamed);
        if !remaining.is_empty() {
            self.install(&remaining).await;
        }
    }

    pub async fn uninstall_selected(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.executing();
        let selected = self.selection.take();

        info!("Removing {} package(s)", selected.len());
        match self.api.uninstall_modules(&selected).await {
            Ok(report) => self.report_batch(BatchOperation::Uninstall, report).await,
            Err(e) => error!("Failed to remove packages: {:#}", e),
        }
    }

    pub async fn upgrade_selected(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.executing();
        let selected = self.selection.take();

        info!("Upgrading {} package(s)", selected.len());
        match self.api.upgrade_modules(&selected).await {
            Ok(report) => self.report_batch(BatchOperation::Upgrade, report).await,
            Err(e) => error!("Failed to upgrade packages: {:#}", e),
        }
    }

    pub async fn refresh_modules(&mut self) {
        self.executing();

        match self.api.refresh_modules().await {
            Ok(()) => {
                self.complete();
                self.updates.trigger();
            }
            Err(e) => error!("Failed to refresh modules: {:#}", e),
        }
    }

    pub async fn add_external_source(&mut self) {
        let Some(source) = self.dialogs.register_external_source().await else {
            debug!("External source registration cancelled");
            return;
        };

        match self.api.add_external_module_source(&source).await {
            Ok(ack) => {
                debug!("Add source answered: {}", ack.error);
                if ack.is_success() {
                    self.snackbar.success(&format!(
                        "Successfully added '{}' to '{}'",
                        source.title, EXTERNAL_MODULE_SOURCES
                    ));
                } else {
                    self.snackbar.error("Failed to add new source");
                }
                self.updates.trigger();
            }
            Err(e) => error!("Failed to add external source: {:#}", e),
        }
    }

    pub async fn remove_external_sources(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.executing();
        let selected = self.selection.take();

        info!("Removing {} external source(s)", selected.len());
        match self.api.remove_external_module_source(&selected).await {
            Ok(()) => {
                self.complete();
                self.updates.trigger();
            }
            Err(e) => error!("Failed to remove external sources: {:#}", e),
        }
    }
}
