//! Default configuration values

use std::path::PathBuf;

use super::types::{
    Config, ConverterConfig, RendererConfig, ServerConfig, StorageBackend, StorageConfig,
    ToolConfig,
};

// ═══════════════════════════════════════════════════════════════════════════
// DEFAULT IMPLEMENTATIONS
// ═══════════════════════════════════════════════════════════════════════════

#[allow(clippy::derivable_impls)]
impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            renderer: RendererConfig::default(),
            converter: ConverterConfig::default(),
            storage: StorageConfig::default(),
            tool: ToolConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            command: "mmdc".to_string(),
            args: Vec::new(),
            timeout_secs: 30,
        }
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self { system_fonts: true }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            path: None,
            result_ttl_secs: 60 * 60,
            session_ttl_secs: 24 * 60 * 60,
        }
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            width: 1920,
            height: 1440,
        }
    }
}
