//! Validation-focused tests for configuration

#[cfg(test)]
mod validation_tests {
    use std::path::PathBuf;

    use crate::{
        config::{Config, StorageBackend, MAX_TTL_SECS},
        Error,
    };

    fn assert_invalid(config: &Config, fragment: &str) {
        match config.validate() {
            Err(Error::InvalidConfig(message)) => {
                assert!(message.contains(fragment), "message: {message}");
            }
            other => panic!("expected invalid config, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_zero_port_rejected() {
        let mut config = Config::default();
        config.server.port = 0;
        assert_invalid(&config, "server.port");
    }

    #[test]
    fn test_blank_renderer_command_rejected() {
        let mut config = Config::default();
        config.renderer.command = "  ".into();
        assert_invalid(&config, "renderer.command");
    }

    #[test]
    fn test_zero_timeout_and_ttl_rejected() {
        let mut config = Config::default();
        config.renderer.timeout_secs = 0;
        assert_invalid(&config, "timeout_secs");

        let mut config = Config::default();
        config.storage.session_ttl_secs = 0;
        assert_invalid(&config, "TTLs");
    }

    #[test]
    fn test_oversized_ttl_rejected() {
        let mut config = Config::default();
        config.storage.result_ttl_secs = u64::MAX;
        assert_invalid(&config, "at most");

        let mut config = Config::default();
        config.storage.session_ttl_secs = MAX_TTL_SECS + 1;
        assert_invalid(&config, "at most");

        config.storage.session_ttl_secs = MAX_TTL_SECS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sqlite_backend_requires_path() {
        let mut config = Config::default();
        config.storage.backend = StorageBackend::Sqlite;
        assert_invalid(&config, "storage.path");

        config.storage.path = Some(PathBuf::from("state.db"));
        assert!(config.validate().is_ok());
    }
}
