use std::fs;
use std::path::Path;

use super::error::ConfigError;
use super::types::AppConfig;

/// Reads the TOML config at `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    match fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            log::info!("No config at {}, using defaults", path.display());
            Ok(AppConfig::default())
        }
        Err(err) => Err(ConfigError::Io(err)),
    }
}

pub fn parse_config(contents: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(contents)?;
    config.registry()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.backends.len(), 3);
        assert_eq!(config.server.listen_addr, "0.0.0.0:8080");
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[storage]
database_path = "/tmp/x.db"
persist_failures = false

[[backends]]
name = "tiny"
endpoint_path = "tinyllama"
temperature = 0.1
numeric_id = 9
"#
        )
        .unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.storage.database_path, "/tmp/x.db");
        assert!(!config.storage.persist_failures);
        assert_eq!(config.dispatch.invocation_timeout_secs, 120);
        let registry = config.registry().unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("tiny").unwrap().numeric_id, 9);
    }

    #[test]
    fn duplicate_backends_are_rejected() {
        let err = parse_config(
            r#"
[[backends]]
name = "a"
endpoint_path = "x"
temperature = 0.1
numeric_id = 1

[[backends]]
name = "a"
endpoint_path = "y"
temperature = 0.2
numeric_id = 2
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBackend(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(parse_config("[server"), Err(ConfigError::Toml(_))));
    }
}
