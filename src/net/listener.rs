//! Listener binding and serve loops.
//!
//! # Responsibilities
//! - Bind the cleartext and TLS listeners
//! - Run the serve loop for each until it fails
//! - Classify failures as bind or serve errors

use std::net::SocketAddr;

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;
use tokio::net::TcpListener;

/// Fatal listener errors.
#[derive(Debug, Error)]
pub enum ServeError {
    /// Failed to bind to address.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Certificate chain or key could not be loaded.
    #[error("TLS configuration error: {0}")]
    Tls(#[source] std::io::Error),

    /// The serve loop stopped with an error.
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Bind a cleartext listener on `addr` (`host:port`).
pub async fn bind_plain(addr: &str) -> Result<TcpListener, ServeError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind {
            addr: addr.to_string(),
            source,
        })
}

/// Serve `router` over HTTP/1.1 and h2c until a fatal error.
pub async fn serve_plain(listener: TcpListener, router: Router) -> Result<(), ServeError> {
    let addr = listener.local_addr().map_err(ServeError::Serve)?;
    tracing::info!(address = %addr, "HTTP listener serving");

    axum::serve(listener, router)
        .await
        .map_err(ServeError::Serve)?;

    tracing::info!(address = %addr, "HTTP listener stopped");
    Ok(())
}

/// Bind `addr` and serve `router` over TLS until a fatal error.
pub async fn serve_tls(addr: &str, router: Router, tls: RustlsConfig) -> Result<(), ServeError> {
    let bind_err = |source: std::io::Error| ServeError::Bind {
        addr: addr.to_string(),
        source,
    };
    let listener = std::net::TcpListener::bind(addr).map_err(bind_err)?;
    listener.set_nonblocking(true).map_err(bind_err)?;

    let local: SocketAddr = listener.local_addr().map_err(ServeError::Serve)?;
    tracing::info!(address = %local, "HTTPS listener serving");

    axum_server::from_tcp_rustls(listener, tls)
        .serve(router.into_make_service())
        .await
        .map_err(ServeError::Serve)?;

    tracing::info!(address = %local, "HTTPS listener stopped");
    Ok(())
}
