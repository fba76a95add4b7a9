//! Presentation seams: modal dialogs and transient status messages.
//!
//! Tables never render anything themselves; they ask a [`Dialogs`]
//! implementation for user decisions and report progress to a [`Snackbar`].

mod terminal;

use async_trait::async_trait;

use crate::package::{FailureDetail, Package};

pub use terminal::{TerminalDialogs, TerminalSnackbar, confirm_with_io, prompt_with_io};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Dialogs: Send + Sync {
    /// Let the user pick new directories for packages that clash with
    /// existing ones. An empty directory means "skip this package".
    /// `None` means the dialog was dismissed.
    async fn rename_conflicts(&self, conflicts: Vec<Package>) -> Option<Vec<Package>>;

    /// Show the packages a batch operation failed on.
    async fn show_failures(&self, failures: &[FailureDetail]);

    /// Collect a new external source. `None` when cancelled.
    async fn register_external_source(&self) -> Option<Package>;
}

#[cfg_attr(test, mockall::automock)]
pub trait Snackbar: Send + Sync {
    fn notify(&self, message: &str);
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}
