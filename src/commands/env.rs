use std::io::{self, Write};

use anyhow::Result;

use crate::store::EnvironmentVars;

use super::services::Services;

/// Print the MagicMirror environment the backend reports.
#[tracing::instrument(skip(services))]
pub async fn env(services: &Services) -> Result<()> {
    let store = services.store();
    store.load().await;

    let vars = store.environment_variables().borrow().clone();
    let stdout = io::stdout();
    print_environment(&vars, &mut stdout.lock())
}

fn print_environment<W: Write>(vars: &EnvironmentVars, out: &mut W) -> Result<()> {
    if vars.is_empty() {
        writeln!(out, "No environment variables reported.")?;
    }
    for (key, value) in vars {
        writeln!(out, "{}={}", key, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_environment_sorted() {
        let mut vars = EnvironmentVars::new();
        vars.insert("MMPM_MAGICMIRROR_ROOT".to_string(), "/home/pi/MagicMirror".to_string());
        vars.insert("MMPM_IS_DOCKER_IMAGE".to_string(), "false".to_string());

        let mut out = Vec::new();
        print_environment(&vars, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "MMPM_IS_DOCKER_IMAGE=false\nMMPM_MAGICMIRROR_ROOT=/home/pi/MagicMirror\n"
        );
    }

    #[test]
    fn test_print_empty_environment() {
        let mut out = Vec::new();
        print_environment(&EnvironmentVars::new(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No environment variables reported.\n");
    }
}
