//! HTTP transport for the MMPM backend: JSON requests and error classification.

mod client;
mod error;

pub use client::HttpClient;
pub use error::{ApiError, classify_error, decode_payload};
