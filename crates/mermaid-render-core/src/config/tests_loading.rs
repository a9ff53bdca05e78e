//! Loading-focused tests for configuration
//!
//! File layering, explicit files, and environment overrides.

#[cfg(test)]
mod loading_tests {
    use std::{collections::HashMap, path::PathBuf};

    use serial_test::serial;

    use crate::{
        config::{load_config, load_from_sources, Config, StorageBackend},
        Error, Result,
    };

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> Result<PathBuf> {
        let path = dir.path().join(name);
        std::fs::write(&path, content)?;
        Ok(path)
    }

    #[test]
    fn test_no_config_files_returns_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = load_from_sources([dir.path().join("missing.toml")], None, no_env)?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn test_later_files_override_earlier_keys_only() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let global = write(&dir, "global.toml", "[server]\nport = 4000\nhost = \"0.0.0.0\"")?;
        let project = write(&dir, "project.toml", "[server]\nport = 5000")?;

        let config = load_from_sources([global, project], None, no_env)?;
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.renderer.command, "mmdc");
        Ok(())
    }

    #[test]
    fn test_explicit_file_wins_over_layers() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let project = write(&dir, "project.toml", "[renderer]\ntimeout_secs = 10")?;
        let explicit = write(&dir, "explicit.toml", "[renderer]\ntimeout_secs = 5")?;

        let config = load_from_sources([project], Some(&explicit), no_env)?;
        assert_eq!(config.renderer.timeout_secs, 5);
        Ok(())
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let missing = dir.path().join("nope.toml");

        let result = load_from_sources(Vec::<PathBuf>::new(), Some(&missing), no_env);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
        Ok(())
    }

    #[test]
    fn test_malformed_toml_returns_parse_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let bad = write(&dir, "bad.toml", "[server\nport = ")?;

        let result = load_from_sources([bad], None, no_env);
        assert!(result
            .err()
            .is_some_and(|e| e.to_string().contains("Failed to parse config file")));
        Ok(())
    }

    #[test]
    fn test_directory_as_config_path_is_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let result = load_from_sources([dir.path().to_path_buf()], None, no_env);
        assert!(matches!(result, Err(Error::Io(_))));
        Ok(())
    }

    #[test]
    fn test_env_overrides_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let project = write(&dir, "project.toml", "[server]\nport = 5000")?;
        let env: HashMap<&str, &str> = [
            ("MERMAID_RENDER_PORT", "6000"),
            ("MERMAID_RENDER_STORAGE_BACKEND", "sqlite"),
            ("MERMAID_RENDER_STORAGE_PATH", "/tmp/state.db"),
        ]
        .into_iter()
        .collect();

        let config = load_from_sources([project], None, |key| {
            env.get(key).map(|value| (*value).to_string())
        })?;
        assert_eq!(config.server.port, 6000);
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.storage.path, Some(PathBuf::from("/tmp/state.db")));
        Ok(())
    }

    #[test]
    fn test_invalid_env_value_is_reported() {
        let result = Config::default().apply_env(|key| {
            (key == "MERMAID_RENDER_PORT").then(|| "not-a-port".to_string())
        });
        assert!(result
            .err()
            .is_some_and(|e| e.to_string().contains("MERMAID_RENDER_PORT")));
    }

    #[test]
    #[serial]
    fn test_load_config_reads_process_environment() -> Result<()> {
        std::env::set_var("MERMAID_RENDER_RENDERER_TIMEOUT_SECS", "7");
        let result = load_config(None);
        std::env::remove_var("MERMAID_RENDER_RENDERER_TIMEOUT_SECS");

        assert_eq!(result?.renderer.timeout_secs, 7);
        Ok(())
    }
}
