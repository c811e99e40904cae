//! TLS configuration and certificate loading.

use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;

use crate::net::listener::ServeError;

/// Load TLS configuration from certificate chain and key files.
pub async fn load_tls_config(chain_path: &Path, key_path: &Path) -> Result<RustlsConfig, ServeError> {
    for (what, path) in [("certificate chain", chain_path), ("private key", key_path)] {
        if !path.exists() {
            return Err(ServeError::Tls(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{what} file not found: {}", path.display()),
            )));
        }
    }

    // RustlsConfig advertises h2 and http/1.1 over ALPN.
    RustlsConfig::from_pem_file(chain_path, key_path)
        .await
        .map_err(ServeError::Tls)
}
