//! Reverse proxy subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → handler.rs (pick upstream from pool, rewrite URI)
//!     → hyper-util client (forward)
//!     → Result mapping:
//!         - transport failure        → 502
//!         - upstream status != 200   → 502 (observed status logged)
//!         - upstream status == 200   → streamed through unchanged
//! ```
//!
//! # Design Decisions
//! - No retries, no fallback to another upstream
//! - In-flight guard is held until the response body finishes streaming
//! - Hop-by-hop headers are stripped in both directions

pub mod error;
pub mod handler;

pub use error::ProxyError;
pub use handler::{ProxyOptions, ReverseProxy};
