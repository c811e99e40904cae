//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration, read once at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Verbose logging.
    pub debug: bool,

    /// Serve TLS on `https_port` in addition to cleartext on `http_port`.
    pub tls: bool,

    /// Public domain name, informational.
    pub domain_name: String,

    /// Cleartext (HTTP/1.1 + h2c) port.
    pub http_port: u16,

    /// TLS (HTTP/1.1 + HTTP/2) port.
    pub https_port: u16,

    /// Bind host for both listeners.
    pub host: String,

    /// Path to the certificate chain (PEM).
    #[serde(alias = "chain")]
    pub chain_path: String,

    /// Path to the private key (PEM).
    #[serde(alias = "key")]
    pub key_path: String,

    /// Static folder mounted by the binary.
    pub static_files: StaticFilesConfig,

    /// Reverse proxy mounted by the binary.
    pub proxy: ProxyConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            debug: true,
            tls: false,
            domain_name: String::new(),
            http_port: 8080,
            https_port: 8443,
            host: "0.0.0.0".to_string(),
            chain_path: String::new(),
            key_path: String::new(),
            static_files: StaticFilesConfig::default(),
            proxy: ProxyConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl ServerConfig {
    /// `host:http_port`
    pub fn http_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }

    /// `host:https_port`
    pub fn https_address(&self) -> String {
        format!("{}:{}", self.host, self.https_port)
    }
}

/// Static folder configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Folder to serve. Disabled when unset.
    pub root: Option<String>,

    /// URL prefix the folder is mounted under.
    pub mount: String,

    /// `Cache-Control: max-age` in seconds.
    pub cache_secs: u64,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: None,
            mount: "/static".to_string(),
            cache_secs: 3600,
        }
    }
}

/// Reverse proxy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Upstream `host:port` addresses. Disabled when empty.
    pub upstreams: Vec<String>,

    /// URL prefix the proxy is mounted under.
    pub mount: String,

    /// Upstream connect timeout in seconds. 0 disables it.
    pub connect_timeout_secs: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            upstreams: Vec::new(),
            mount: "/api".to_string(),
            connect_timeout_secs: 5,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log output format.
    pub log_format: LogFormat,

    /// Prometheus endpoint bind address. Disabled when unset.
    pub metrics_address: Option<String>,
}
