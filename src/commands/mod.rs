mod env;
mod list;
mod modules;
mod services;

pub use env::env;
pub use list::{Collection, ListOptions, list};
pub use modules::{Action, add_source, refresh, run_on_titles};
pub use services::{Services, build_api_client};
