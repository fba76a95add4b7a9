pub mod api;
pub mod commands;
pub mod config;
pub mod http;
pub mod notify;
pub mod package;
pub mod registration;
pub mod store;
pub mod table;
pub mod ui;
