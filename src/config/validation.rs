//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (ports, addresses)
//! - Require certificate paths when TLS is on
//! - Detect conflicting mounts
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::load_balancer::Upstream;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must be non-zero")]
    ZeroPort(&'static str),

    #[error("http_port and https_port are both {0}")]
    PortConflict(u16),

    #[error("host must not be empty")]
    EmptyHost,

    #[error("tls is enabled but {0} is empty")]
    MissingTlsPath(&'static str),

    #[error("invalid upstream address {0:?}")]
    InvalidUpstream(String),

    #[error("{field} must start with '/', got {value:?}")]
    InvalidMount { field: &'static str, value: String },

    #[error("static_files.mount and proxy.mount are both {0:?}")]
    MountConflict(String),

    #[error("invalid metrics address {0:?}")]
    InvalidMetricsAddress(String),
}

/// Check `config` for semantic errors.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.host.trim().is_empty() {
        errors.push(ValidationError::EmptyHost);
    }
    if config.http_port == 0 {
        errors.push(ValidationError::ZeroPort("http_port"));
    }

    if config.tls {
        if config.https_port == 0 {
            errors.push(ValidationError::ZeroPort("https_port"));
        } else if config.https_port == config.http_port {
            errors.push(ValidationError::PortConflict(config.https_port));
        }
        if config.chain_path.trim().is_empty() {
            errors.push(ValidationError::MissingTlsPath("chain_path"));
        }
        if config.key_path.trim().is_empty() {
            errors.push(ValidationError::MissingTlsPath("key_path"));
        }
    }

    for addr in &config.proxy.upstreams {
        if Upstream::new(addr).is_err() {
            errors.push(ValidationError::InvalidUpstream(addr.clone()));
        }
    }

    let static_enabled = config.static_files.root.is_some();
    let proxy_enabled = !config.proxy.upstreams.is_empty();
    if static_enabled && !config.static_files.mount.starts_with('/') {
        errors.push(ValidationError::InvalidMount {
            field: "static_files.mount",
            value: config.static_files.mount.clone(),
        });
    }
    if proxy_enabled && !config.proxy.mount.starts_with('/') {
        errors.push(ValidationError::InvalidMount {
            field: "proxy.mount",
            value: config.proxy.mount.clone(),
        });
    }
    if static_enabled
        && proxy_enabled
        && config.static_files.mount.trim_end_matches('/')
            == config.proxy.mount.trim_end_matches('/')
    {
        errors.push(ValidationError::MountConflict(config.proxy.mount.clone()));
    }

    if let Some(addr) = &config.observability.metrics_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidMetricsAddress(addr.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
