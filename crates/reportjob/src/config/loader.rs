use std::path::Path;

use crate::config::schema::RendererConfig;
use crate::error::ConfigError;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RendererConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<RendererConfig, ConfigError> {
    let config: RendererConfig = serde_json::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_config(config: &RendererConfig) -> Result<(), ConfigError> {
    if config.java_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation {
            message: "java_path must not be empty".to_string(),
        });
    }

    if config.version.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "version must not be empty".to_string(),
        });
    }

    if config.locale.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "locale must not be empty".to_string(),
        });
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation {
            message: "timeout_secs must be at least 1".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_empty_object_yields_defaults() {
        let config = load_config_from_str("{}").unwrap();
        assert_eq!(config.java_path, PathBuf::from("/usr/bin/java"));
        assert_eq!(config.locale, "de_DE.UTF-8");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_partial_override() {
        let config = load_config_from_str(
            r#"{"java_path": "/opt/jdk/bin/java", "timeout_secs": 30}"#,
        )
        .unwrap();
        assert_eq!(config.java_path, PathBuf::from("/opt/jdk/bin/java"));
        assert_eq!(config.timeout_secs, 30);
        // Untouched fields keep their defaults
        assert_eq!(config.version, "2.0.0");
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let result = load_config_from_str("{not json");
        assert!(matches!(result, Err(ConfigError::ParseJson(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = load_config_from_str(r#"{"timeout_secs": 0}"#);
        match result {
            Err(ConfigError::Validation { message }) => {
                assert!(message.contains("timeout_secs"));
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_locale_rejected() {
        let result = load_config_from_str(r#"{"locale": "  "}"#);
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("renderer.json");
        std::fs::write(&path, r#"{"version": "2.5.1"}"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.version, "2.5.1");
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = load_config("/nonexistent/renderer.json");
        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }
}
