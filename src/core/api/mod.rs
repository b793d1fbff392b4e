//! Festival REST API: wire models, error type and the HTTP client.

mod client;
mod error;
mod models;

pub use client::*;
pub use error::*;
pub use models::*;
