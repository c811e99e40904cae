//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! host:http_port
//!     → listener.rs (bind, axum::serve: HTTP/1.1 + h2c)
//! host:https_port
//!     → tls.rs (load PEM chain + key into rustls)
//!     → listener.rs (axum-server: TLS, ALPN h2 / http/1.1)
//!     → Hand off to the shared router
//! ```
//!
//! # Design Decisions
//! - Protocol negotiation is left to hyper and rustls
//! - Bind, certificate and serve errors are fatal and returned to the caller
//! - No admission control: every accepted connection is served

pub mod listener;
pub mod tls;

pub use listener::{bind_plain, serve_plain, serve_tls, ServeError};
pub use tls::load_tls_config;
