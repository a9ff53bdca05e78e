//! Command-line interface: argument builders and handlers.

mod args;
mod handlers;

pub use args::build_cli;
pub use handlers::{run, run_cli};
