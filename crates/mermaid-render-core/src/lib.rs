//! # Mermaid Render Core
//!
//! Domain model, use cases, and adapters for rendering Mermaid diagrams to SVG
//! and exporting them as PNG or SVG images.
//!
//! ## Layers
//!
//! - [`domain`]: value objects, aggregates, events, and trait seams (no I/O)
//! - [`application`]: use cases that orchestrate aggregates through the seams
//! - [`infrastructure`]: repositories, publishers, renderer, and converter
//! - [`config`]: layered TOML + environment configuration
//!
//! ## Laws (Compiler Enforced)
//!
//! - No `unwrap()` - returns `Result` instead
//! - No `expect()` - returns `Result` instead
//! - No `unsafe` - safe Rust only
//! - No `todo!()` / `unimplemented!()` - complete implementations only
//!
//! ## Error Handling
//!
//! All fallible use-case operations return `Result<T, Error>`. Transports map
//! [`Error::code`] and [`Error::exit_code`] onto their own status vocabulary.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![forbid(unsafe_code)]

pub mod application;
pub mod config;
pub mod domain;
mod error;
pub mod infrastructure;

pub use error::{Entity, Error, Result};
