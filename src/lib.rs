//! Embeddable web-serving toolkit.
//!
//! - Cleartext and TLS listeners sharing one router
//! - Least-outstanding-requests reverse proxy
//! - Static folder with conditional GET
//! - Binary, text and streamed JSON response encoding

pub mod config;
pub mod encoding;
pub mod http;
pub mod load_balancer;
pub mod net;
pub mod observability;
pub mod proxy;
pub mod static_files;

pub use config::ServerConfig;
pub use http::Application;
pub use proxy::ReverseProxy;
pub use static_files::StaticFolder;
