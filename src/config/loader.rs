//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

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

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ServerConfig, ConfigError> {
    let config: ServerConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse_config("").unwrap();
        assert!(config.debug);
        assert!(!config.tls);
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.https_port, 8443);
        assert_eq!(config.host, "0.0.0.0");
        assert!(config.domain_name.is_empty());
    }

    #[test]
    fn parses_full_file() {
        let config = parse_config(
            r#"
            debug = false
            tls = true
            domain_name = "example.com"
            http_port = 80
            https_port = 443
            host = "127.0.0.1"
            chain = "/etc/ssl/chain.pem"
            key = "/etc/ssl/key.pem"

            [static_files]
            root = "public"
            mount = "/assets"
            cache_secs = 60

            [proxy]
            upstreams = ["10.0.0.1:3000", "10.0.0.2:3000"]

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.domain_name, "example.com");
        assert_eq!(config.chain_path, "/etc/ssl/chain.pem");
        assert_eq!(config.https_address(), "127.0.0.1:443");
        assert_eq!(config.static_files.cache_secs, 60);
        assert_eq!(config.proxy.upstreams.len(), 2);
        assert_eq!(config.proxy.mount, "/api");
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn rejects_semantic_errors() {
        let err = parse_config("tls = true").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 2));
        assert!(err.to_string().contains("chain_path"));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(parse_config("http_port = \"x\""), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
