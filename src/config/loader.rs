//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the upstream credential.
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable overriding the upstream base URL.
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
/// Environment variable overriding the listening port.
pub const ENV_PORT: &str = "PORT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ProxyConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build the startup configuration: optional file, then environment overrides.
///
/// A `.env` file in the working directory is honoured if present.
pub fn load(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    if let Ok(env_file) = dotenvy::dotenv() {
        tracing::debug!(path = %env_file.display(), "Loaded .env file");
    }

    let mut config = match path {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides using the given lookup.
///
/// The credential is not checked here; a missing key surfaces as an
/// upstream authentication failure at request time.
pub fn apply_env_overrides<F>(config: &mut ProxyConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(ENV_API_KEY).filter(|k| !k.is_empty()) {
        config.upstream.api_key = Some(key);
    }

    if let Some(url) = lookup(ENV_BASE_URL).filter(|u| !u.is_empty()) {
        config.upstream.base_url = url;
    }

    if let Some(port) = lookup(ENV_PORT) {
        match port.parse::<u16>() {
            Ok(port) => {
                config.listener.bind_address = with_port(&config.listener.bind_address, port);
            }
            Err(_) => tracing::warn!(port = %port, "Ignoring invalid PORT value"),
        }
    }
}

fn with_port(bind_address: &str, port: u16) -> String {
    let host = bind_address
        .rsplit_once(':')
        .map(|(host, _)| host)
        .unwrap_or("0.0.0.0");
    format!("{}:{}", host, port)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ProxyConfig::default();
        apply_env_overrides(
            &mut config,
            lookup(&[
                (ENV_API_KEY, "sk-test"),
                (ENV_PORT, "8123"),
                (ENV_BASE_URL, "http://127.0.0.1:9999/v1"),
            ]),
        );

        assert_eq!(config.upstream.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.listener.bind_address, "0.0.0.0:8123");
        assert_eq!(config.upstream.base_url, "http://127.0.0.1:9999/v1");
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let mut config = ProxyConfig::default();
        apply_env_overrides(&mut config, lookup(&[(ENV_PORT, "http")]));
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
    }

    #[test]
    fn test_missing_key_is_not_an_error() {
        let mut config = ProxyConfig::default();
        apply_env_overrides(&mut config, lookup(&[]));
        assert!(config.upstream.api_key.is_none());
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let dir = std::env::temp_dir().join(format!("compliment-proxy-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("invalid.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[upstream]\ntemperature = 9.0").unwrap();

        match load_config(&path) {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors, vec![ValidationError::Temperature(9.0)]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        let _ = std::fs::remove_dir_all(&dir);
    }
}
