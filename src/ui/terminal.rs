//! Terminal renditions of the dialogs and the snackbar.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, warn};

use super::{Dialogs, Snackbar};
use crate::package::{FailureDetail, Package};
use crate::registration::RegistrationForm;

/// Write `prompt`, read one line and return it trimmed.
pub fn prompt_with_io<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> Result<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    Ok(line.trim().to_string())
}

pub fn confirm_with_io<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> Result<bool> {
    let response = prompt_with_io(&format!("{} [y/N] ", prompt), input, output)?.to_lowercase();
    Ok(response == "y" || response == "yes")
}

/// Ask for a replacement directory for every conflicting package.
pub(crate) fn rename_with_io<R: BufRead, W: Write>(
    conflicts: Vec<Package>,
    input: &mut R,
    output: &mut W,
) -> Result<Vec<Package>> {
    writeln!(
        output,
        "{} package(s) conflict with existing module directories.",
        conflicts.len()
    )?;

    let mut renamed = Vec::with_capacity(conflicts.len());
    for mut pkg in conflicts {
        let prompt = format!(
            "New directory for '{}' (leave empty to skip): ",
            pkg.title
        );
        pkg.directory = prompt_with_io(&prompt, input, output)?;
        renamed.push(pkg);
    }
    Ok(renamed)
}

pub(crate) fn write_failures<W: Write>(failures: &[FailureDetail], output: &mut W) -> Result<()> {
    for failure in failures {
        let reason = if failure.error.is_empty() {
            "(no reason given)"
        } else {
            failure.error.as_str()
        };
        writeln!(output, "  {}: {}", failure.package.title, reason)?;
    }
    Ok(())
}

pub struct TerminalDialogs {
    registration: RegistrationForm,
    interactive: bool,
}

impl TerminalDialogs {
    /// `interactive == false` answers every prompt with its default: conflicting
    /// packages are skipped.
    pub fn new(registration: RegistrationForm, interactive: bool) -> Self {
        Self {
            registration,
            interactive,
        }
    }

    pub fn registration(&self) -> &RegistrationForm {
        &self.registration
    }

    pub fn confirm(&self, prompt: &str) -> Result<bool> {
        if !self.interactive {
            return Ok(true);
        }
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        confirm_with_io(prompt, &mut stdin.lock(), &mut stdout)
    }
}

#[async_trait]
impl Dialogs for TerminalDialogs {
    async fn rename_conflicts(&self, mut conflicts: Vec<Package>) -> Option<Vec<Package>> {
        if !self.interactive {
            for pkg in &mut conflicts {
                warn!("Skipping '{}': its module directory already exists", pkg.title);
                pkg.directory.clear();
            }
            return Some(conflicts);
        }

        let stdin = io::stdin();
        let mut stdout = io::stdout();
        match rename_with_io(conflicts, &mut stdin.lock(), &mut stdout) {
            Ok(renamed) => Some(renamed),
            Err(e) => {
                debug!("Rename prompt aborted: {:#}", e);
                None
            }
        }
    }

    async fn show_failures(&self, failures: &[FailureDetail]) {
        let mut stderr = io::stderr();
        if let Err(e) = write_failures(failures, &mut stderr) {
            debug!("Failed to print failures: {:#}", e);
        }
    }

    async fn register_external_source(&self) -> Option<Package> {
        for (field, message) in self.registration.errors() {
            eprintln!("{}: {}", field, message);
        }
        self.registration.submit()
    }
}

pub struct TerminalSnackbar;

impl Snackbar for TerminalSnackbar {
    fn notify(&self, message: &str) {
        println!("{}", message);
    }

    fn success(&self, message: &str) {
        println!("{}", message);
    }

    fn error(&self, message: &str) {
        eprintln!("{}", message);
    }
}
