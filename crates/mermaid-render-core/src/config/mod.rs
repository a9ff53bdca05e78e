//! Configuration loading and management
//!
//! # Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Global config: `~/.config/mermaid-render/config.toml`
//! 3. Project config: `.mermaid-render/config.toml`
//! 4. Explicit file passed with `--config`
//! 5. Environment variables: `MERMAID_RENDER_*`
//! 6. CLI flags (command-specific)
//!
//! # Example Config
//!
//! ```toml
//! [server]
//! port = 8080
//!
//! [renderer]
//! command = "mmdc"
//! args = ["-p", "puppeteer.json"]
//! timeout_secs = 20
//!
//! [storage]
//! backend = "sqlite"
//! path = ".mermaid-render/state.db"
//! ```
//!
//! # Module Structure
//!
//! - `types`: Configuration structure definitions
//! - `defaults`: Default value implementations
//! - `load`: Loading from files and environment
//! - `merge`: Layering of partial TOML documents
//! - `validate`: Range and consistency checks

mod defaults;
mod load;
mod merge;
mod types;
mod validate;

#[cfg(test)]
mod tests_loading;
#[cfg(test)]
mod tests_validation;

pub use load::{global_config_path, load_config, load_from_sources, project_config_path};
pub use types::{
    Config, ConverterConfig, RendererConfig, ServerConfig, StorageBackend, StorageConfig,
    ToolConfig,
};
pub use validate::MAX_TTL_SECS;
