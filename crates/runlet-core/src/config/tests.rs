//! Tests for configuration loading, overrides and validation

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::executors::language::Language;
    use serial_test::serial;
    use std::env;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn clear_env() {
        env::remove_var(ENV_TIMEOUT);
        env::remove_var(ENV_MAX_WORKERS);
        env::remove_var(ENV_RUNNER_TIMEOUT);
    }

    #[test]
    #[serial]
    fn empty_document_yields_defaults() {
        clear_env();
        let config = ConfigLoader::from_str("").unwrap();
        assert_eq!(config, ExecutorConfig::default());
        assert_eq!(config.timeout, 10);
        assert_eq!(config.max_workers, 4);
        assert_eq!(config.runner_timeout, 30);
        assert_eq!(config.interpreters.binary_for(Language::Python3), "python3");
        assert_eq!(config.interpreters.binary_for(Language::NodeJs), "node");
    }

    #[test]
    #[serial]
    fn partial_yaml_keeps_other_defaults() {
        clear_env();
        let config = ConfigLoader::from_str(
            r#"
timeout: 3
interpreters:
  python3: /usr/local/bin/python3.12
"#,
        )
        .unwrap();
        assert_eq!(config.timeout, 3);
        assert_eq!(config.max_workers, 4);
        assert_eq!(config.interpreters.python3, "/usr/local/bin/python3.12");
        assert_eq!(config.interpreters.nodejs, "node");
    }

    #[test]
    #[serial]
    fn env_overrides_yaml() {
        clear_env();
        env::set_var(ENV_MAX_WORKERS, "16");
        env::set_var(ENV_TIMEOUT, " 20 ");
        let result = ConfigLoader::from_str("max_workers: 2\ntimeout: 5\n");
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.max_workers, 16);
        assert_eq!(config.timeout, 20);
    }

    #[test]
    #[serial]
    fn invalid_env_value_is_rejected() {
        clear_env();
        env::set_var(ENV_RUNNER_TIMEOUT, "soon");
        let result = ConfigLoader::from_env();
        clear_env();

        let err = result.unwrap_err().to_string();
        assert!(err.contains(ENV_RUNNER_TIMEOUT), "unexpected error: {}", err);
    }

    #[test]
    #[serial]
    fn zero_workers_fail_validation() {
        clear_env();
        let err = ConfigLoader::from_str("max_workers: 0").unwrap_err();
        assert!(err.to_string().contains("max_workers"));
    }

    #[test]
    #[serial]
    fn malformed_yaml_is_a_config_error() {
        clear_env();
        let err = ConfigLoader::from_str("timeout: [1, 2").unwrap_err();
        assert!(matches!(err, crate::errors::ExecutorError::Config(_)));
    }

    #[tokio::test]
    #[serial]
    async fn loads_from_file() {
        clear_env();
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "timeout: 7\nmax_workers: 1\nrunner_timeout: 7").unwrap();

        let config = load_config(file.path()).await.unwrap();
        assert_eq!(config, ExecutorConfig::new(7, 1).with_runner_timeout(7));
    }

    #[tokio::test]
    #[serial]
    async fn missing_file_is_reported() {
        let err = ConfigLoader::from_file("/nonexistent/runlet.yaml")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/runlet.yaml"));
    }

    #[test]
    fn builder_validation() {
        assert!(ExecutorConfig::default().with_timeout(0).validate().is_err());
        assert!(ExecutorConfig::default().with_runner_timeout(0).validate().is_err());
        let mut config = ExecutorConfig::default();
        config.interpreters.nodejs = "  ".to_string();
        assert!(config.validate().is_err());
        assert!(ExecutorConfig::new(1, 1).validate().is_ok());
    }
}
