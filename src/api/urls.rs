//! Backend endpoint paths.

pub const MARKETPLACE: &str = "/api/all-modules";
pub const INSTALLED: &str = "/api/all-installed-modules";
pub const EXTERNAL: &str = "/api/all-external-module-sources";

pub const ENVIRONMENT_VARS: &str = "/api/mmpm/environment-vars";
pub const PACKAGES_UPDATE: &str = "/api/db/update";
pub const PACKAGES_UPGRADEABLE: &str = "/api/db/upgradable";

pub const CHECK_FOR_INSTALLATION_CONFLICTS: &str = "/api/check-for-installation-conflicts";
pub const INSTALL_MODULES: &str = "/api/install-modules";
pub const UNINSTALL_MODULES: &str = "/api/uninstall-modules";
pub const UPGRADE_MODULES: &str = "/api/upgrade-modules";
pub const ADD_EXTERNAL_MODULE_SOURCE: &str = "/api/add-external-module-source";
pub const REMOVE_EXTERNAL_MODULE_SOURCE: &str = "/api/remove-external-module-source";
pub const REFRESH_MODULES: &str = "/api/refresh-modules";

/// Normalize a configured endpoint (`api/all-modules` or `/api/all-modules`)
/// into an absolute path.
pub fn endpoint_path(url: &str) -> String {
    format!("/{}", url.trim_start_matches('/'))
}
