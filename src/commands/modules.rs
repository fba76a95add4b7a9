use anyhow::{Result, bail};
use log::{debug, info, warn};

use crate::{api::urls, table::TableComponent};

use super::services::Services;

/// A bulk operation on packages picked by title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Install,
    Uninstall,
    Upgrade,
    RemoveSource,
}

impl Action {
    /// The table the titles are looked up in.
    fn table_url(self) -> &'static str {
        match self {
            Action::Install => urls::MARKETPLACE,
            Action::Uninstall | Action::Upgrade => urls::INSTALLED,
            Action::RemoveSource => urls::EXTERNAL,
        }
    }

    fn collection(self) -> &'static str {
        match self {
            Action::Install => "the marketplace",
            Action::Uninstall | Action::Upgrade => "the installed packages",
            Action::RemoveSource => "the external module sources",
        }
    }

    fn confirmation(self, count: usize) -> Option<String> {
        match self {
            Action::Uninstall => Some(format!("Remove {} package(s)?", count)),
            Action::RemoveSource => Some(format!("Remove {} external source(s)?", count)),
            Action::Install | Action::Upgrade => None,
        }
    }

    async fn run(self, table: &mut TableComponent) {
        match self {
            Action::Install => table.install_selected().await,
            Action::Uninstall => table.uninstall_selected().await,
            Action::Upgrade => table.upgrade_selected().await,
            Action::RemoveSource => table.remove_external_sources().await,
        }
    }
}

/// Select `titles` in the table `action` works on and run it.
#[tracing::instrument(skip(services))]
pub async fn run_on_titles(services: &Services, action: Action, titles: &[String]) -> Result<()> {
    let mut table = services.table(action.table_url());
    table.init().await;

    let missing = table.select_titles(titles);
    for title in &missing {
        warn!("No package titled '{}' in {}", title, action.collection());
    }
    if table.selection().is_empty() {
        table.teardown();
        bail!("None of the given packages were found in {}", action.collection());
    }

    if let Some(prompt) = action.confirmation(table.selection().len()) {
        if !services.dialogs.confirm(&prompt)? {
            println!("Cancelled.");
            table.teardown();
            return Ok(());
        }
    }

    action.run(&mut table).await;
    finish(&mut table).await;
    Ok(())
}

/// Ask the backend to re-download the package database.
#[tracing::instrument(skip(services))]
pub async fn refresh(services: &Services) -> Result<()> {
    let mut table = services.table(urls::MARKETPLACE);
    table.refresh_modules().await;
    Ok(())
}

/// Register the external source held by the command's registration form.
#[tracing::instrument(skip(services))]
pub async fn add_source(services: &Services) -> Result<()> {
    let errors = services.dialogs.registration().errors();
    if !errors.is_empty() {
        let details: Vec<String> = errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        bail!("Invalid external source ({})", details.join(", "));
    }

    let mut table = services.table(urls::EXTERNAL);
    table.init().await;
    table.add_external_source().await;
    finish(&mut table).await;
    Ok(())
}

async fn finish(table: &mut TableComponent) {
    if table.process_pending_updates().await {
        debug!("{} now lists {} package(s)", table.url(), table.data().len());
    }
    table.teardown();
    info!("Done");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockall::predicate::eq;
    use serde_json::json;

    use super::*;
    use crate::api::MockApiClient;
    use crate::package::{BatchReport, Package, SourceAck};
    use crate::registration::{Field, RegistrationForm};
    use crate::ui::{MockSnackbar, TerminalDialogs};

    fn installed_listing() -> serde_json::Value {
        json!({
            "Utility": [
                {"title": "MMM-Clock", "repository": "https://x/clock", "author": "a", "description": "c"}
            ]
        })
    }

    fn services(api: MockApiClient, form: RegistrationForm, snackbar: MockSnackbar) -> Services {
        Services::from_parts(
            Arc::new(api),
            TerminalDialogs::new(form, false),
            Arc::new(snackbar),
        )
    }

    #[tokio::test]
    async fn test_uninstall_by_title() {
        let mut api = MockApiClient::new();
        api.expect_retrieve()
            .with(eq(urls::INSTALLED))
            .times(2)
            .returning(|_| Ok(installed_listing()));
        api.expect_uninstall_modules()
            .withf(|packages: &[Package]| packages.len() == 1 && packages[0].title == "MMM-Clock")
            .times(1)
            .returning(|_| Ok(BatchReport::default()));

        let mut snackbar = MockSnackbar::new();
        snackbar.expect_notify().return_const(());
        snackbar
            .expect_success()
            .with(eq("Removed successfully!"))
            .times(1)
            .return_const(());

        let services = services(api, RegistrationForm::new(), snackbar);

        run_on_titles(&services, Action::Uninstall, &["MMM-Clock".to_string()])
            .await
            .unwrap();

        assert_eq!(services.updates.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_titles_fail() {
        let mut api = MockApiClient::new();
        api.expect_retrieve().returning(|_| Ok(installed_listing()));
        api.expect_upgrade_modules().never();

        let services = services(api, RegistrationForm::new(), MockSnackbar::new());

        let err = run_on_titles(&services, Action::Upgrade, &["MMM-Nope".to_string()])
            .await
            .unwrap_err();

        assert!(err.to_string().contains("None of the given packages"));
    }

    #[tokio::test]
    async fn test_add_source_rejects_incomplete_form() {
        let mut api = MockApiClient::new();
        api.expect_add_external_module_source().never();

        let mut form = RegistrationForm::new();
        form.set(Field::Title, "MMM-Mine");

        let services = services(api, form, MockSnackbar::new());

        let err = add_source(&services).await.unwrap_err();
        assert!(err.to_string().contains("repository: You must enter a value"));
    }

    #[tokio::test]
    async fn test_add_source_submits_form() {
        let mut api = MockApiClient::new();
        api.expect_retrieve()
            .with(eq(urls::EXTERNAL))
            .returning(|_| Ok(json!({})));
        api.expect_add_external_module_source()
            .withf(|source: &Package| source.title == "MMM-Mine" && source.is_external())
            .times(1)
            .returning(|_| {
                Ok(SourceAck {
                    error: SourceAck::NO_ERROR.to_string(),
                })
            });

        let mut form = RegistrationForm::new();
        form.set(Field::Title, "MMM-Mine");
        form.set(Field::Repository, "https://x/mine");
        form.set(Field::Author, "me");
        form.set(Field::Description, "mine");

        let mut snackbar = MockSnackbar::new();
        snackbar.expect_success().times(1).return_const(());

        let services = services(api, form, snackbar);

        add_source(&services).await.unwrap();
    }

    #[tokio::test]
    async fn test_refresh() {
        let mut api = MockApiClient::new();
        api.expect_refresh_modules().times(1).returning(|| Ok(()));

        let mut snackbar = MockSnackbar::new();
        snackbar.expect_notify().times(2).return_const(());

        let services = services(api, RegistrationForm::new(), snackbar);

        refresh(&services).await.unwrap();
    }
}
