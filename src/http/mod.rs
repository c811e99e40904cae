//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Application: router, listeners)
//!     → request.rs (request ID, tracing span)
//!     → mounted handler (proxy, static folder, or application route)
//!     → encoding (for non-streamed responses)
//!     → Send to client
//! ```

pub mod request;
pub mod server;

pub use request::{with_request_tracing, RequestIdExt, X_REQUEST_ID};
pub use server::Application;
