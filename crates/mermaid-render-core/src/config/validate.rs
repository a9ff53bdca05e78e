//! Configuration validation

use super::types::{Config, StorageBackend};
use crate::{Error, Result};

/// Longest accepted storage TTL: one year.
pub const MAX_TTL_SECS: u64 = 365 * 24 * 60 * 60;

impl Config {
    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any values are out of range or inconsistent
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::invalid_config("server.port must be greater than 0"));
        }

        if self.renderer.command.trim().is_empty() {
            return Err(Error::invalid_config("renderer.command cannot be empty"));
        }

        if self.renderer.timeout_secs == 0 {
            return Err(Error::invalid_config(
                "renderer.timeout_secs must be greater than 0",
            ));
        }

        if self.storage.result_ttl_secs == 0 || self.storage.session_ttl_secs == 0 {
            return Err(Error::invalid_config(
                "storage TTLs must be greater than 0",
            ));
        }

        if self.storage.result_ttl_secs > MAX_TTL_SECS || self.storage.session_ttl_secs > MAX_TTL_SECS
        {
            return Err(Error::invalid_config(format!(
                "storage TTLs must be at most {MAX_TTL_SECS} seconds"
            )));
        }

        if self.storage.backend == StorageBackend::Sqlite && self.storage.path.is_none() {
            return Err(Error::invalid_config(
                "storage.path is required when storage.backend = \"sqlite\"",
            ));
        }

        if self.tool.width == 0 || self.tool.height == 0 {
            return Err(Error::invalid_config(
                "tool.width and tool.height must be greater than 0",
            ));
        }

        Ok(())
    }
}
