//! Configuration loading from files and environment
//!
//! Sources, later overriding earlier:
//! 1. Built-in defaults
//! 2. Global config: `~/.config/mermaid-render/config.toml`
//! 3. Project config: `.mermaid-render/config.toml`
//! 4. Explicit `--config` file (must exist)
//! 5. Environment variables: `MERMAID_RENDER_*`

use std::path::{Path, PathBuf};

use toml::{Table, Value};

use super::{merge::merge_tables, types::Config};
use crate::{Error, Result};

// ═══════════════════════════════════════════════════════════════════════════
// PUBLIC API
// ═══════════════════════════════════════════════════════════════════════════

/// Load configuration from all sources with hierarchy
///
/// # Errors
///
/// Returns error if:
/// - A config file is malformed TOML or cannot be read
/// - The explicit config file does not exist
/// - An environment override cannot be parsed
/// - The result fails validation
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let layers = global_config_path()
        .into_iter()
        .chain(std::iter::once(project_config_path()?));

    load_from_sources(layers, explicit, |key| std::env::var(key).ok())
}

/// Load configuration from the given optional files, an explicit file, and an
/// environment lookup.
///
/// Missing optional files are skipped.
///
/// # Errors
///
/// Same as [`load_config`].
pub fn load_from_sources<I, F>(layers: I, explicit: Option<&Path>, env: F) -> Result<Config>
where
    I: IntoIterator<Item = PathBuf>,
    F: Fn(&str) -> Option<String>,
{
    let defaults = match Value::try_from(Config::default()) {
        Ok(Value::Table(table)) => table,
        Ok(_) => Table::new(),
        Err(e) => return Err(Error::invalid_config(e.to_string())),
    };

    let merged = layers
        .into_iter()
        .filter(|path| path.exists())
        .try_fold(defaults, |acc, path| {
            load_toml_table(&path).map(|table| merge_tables(acc, table))
        })?;

    let merged = match explicit {
        Some(path) if !path.exists() => {
            return Err(Error::invalid_config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        Some(path) => merge_tables(merged, load_toml_table(path)?),
        None => merged,
    };

    let config = Value::Table(merged).try_into::<Config>()?;
    let config = config.apply_env(env)?;
    config.validate()?;
    Ok(config)
}

// ═══════════════════════════════════════════════════════════════════════════
// PATH HELPERS
// ═══════════════════════════════════════════════════════════════════════════

/// Get path to global config file
pub fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "mermaid-render")
        .map(|proj_dirs| proj_dirs.config_dir().join("config.toml"))
}

/// Get path to project config file
///
/// # Errors
///
/// Returns error if current directory cannot be determined
pub fn project_config_path() -> Result<PathBuf> {
    std::env::current_dir()
        .map(|dir| dir.join(".mermaid-render/config.toml"))
        .map_err(|e| Error::Io(format!("Failed to get current directory: {e}")))
}

fn load_toml_table(path: &Path) -> Result<Table> {
    if path.is_dir() {
        return Err(Error::Io(format!(
            "Config path is a directory, not a file: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Io(format!("Failed to read config file {}: {e}", path.display()))
    })?;

    content.parse::<Table>().map_err(|e| {
        Error::invalid_config(format!(
            "Failed to parse config file {}: {e}",
            path.display()
        ))
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// ENVIRONMENT VARIABLE OVERRIDES
// ═══════════════════════════════════════════════════════════════════════════

impl Config {
    /// Apply `MERMAID_RENDER_*` overrides read through `env`.
    ///
    /// # Errors
    ///
    /// Returns error if a numeric or enum value cannot be parsed
    pub fn apply_env<F>(mut self, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = env("MERMAID_RENDER_HOST") {
            self.server.host = value;
        }

        if let Some(value) = env("MERMAID_RENDER_PORT") {
            self.server.port = parse_env("MERMAID_RENDER_PORT", &value)?;
        }

        if let Some(value) = env("MERMAID_RENDER_RENDERER_COMMAND") {
            self.renderer.command = value;
        }

        if let Some(value) = env("MERMAID_RENDER_RENDERER_TIMEOUT_SECS") {
            self.renderer.timeout_secs =
                parse_env("MERMAID_RENDER_RENDERER_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = env("MERMAID_RENDER_STORAGE_BACKEND") {
            self.storage.backend = parse_env("MERMAID_RENDER_STORAGE_BACKEND", &value)?;
        }

        if let Some(value) = env("MERMAID_RENDER_STORAGE_PATH") {
            self.storage.path = Some(PathBuf::from(value));
        }

        if let Some(value) = env("MERMAID_RENDER_TOOL_OUTPUT_DIR") {
            self.tool.output_dir = PathBuf::from(value);
        }

        Ok(self)
    }
}

fn parse_env<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::invalid_config(format!("Invalid {key} value: {e}")))
}
