//! mermaid-render library interface
//!
//! Transports over `mermaid_render_core`: the HTTP API, the stdio tool
//! bridge, and the CLI. Exposed as a library for integration tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod app;
pub mod cli;
pub mod http;
pub mod tool;

pub use app::{Adapters, AppState};
