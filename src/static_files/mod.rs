//! Static asset subsystem.
//!
//! # Data Flow
//! ```text
//! Request path
//!     → resolve.rs (normalize, confine to root)
//!     → folder.rs (stat, Cache-Control, conditional GET)
//!     → http_date.rs (If-Modified-Since / Last-Modified)
//!     → stream file, or delegate to fallback.rs
//! ```
//!
//! # Design Decisions
//! - File metadata is recomputed per request, never cached
//! - One file handle per request, closed when the body stream drops
//! - Paths escaping the root are answered as not found

pub mod fallback;
pub mod folder;
pub mod http_date;
pub mod resolve;

pub use fallback::Fallback;
pub use folder::{FileMeta, StaticFolder};
pub use http_date::{format_http_date, parse_http_date};
pub use resolve::resolve;
