//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Proxy request
//!     → pool.rs (ordered upstreams)
//!     → least_conn.rs (pick upstream with fewest outstanding requests)
//!     → upstream.rs (in-flight guard held for the request's lifetime)
//! ```
//!
//! # Design Decisions
//! - Load balancer is stateless; upstreams track their own load
//! - Selection is a pure function over atomic counters, no locks
//! - No health-based eviction: a failing upstream stays selectable

use std::sync::Arc;

pub mod least_conn;
pub mod pool;
pub mod upstream;

pub use least_conn::{least_loaded, LeastOutstanding};
pub use pool::{PoolError, UpstreamPool};
pub use upstream::{Upstream, UpstreamGuard};

/// Upstream selection policy.
pub trait LoadBalancer: Send + Sync + std::fmt::Debug {
    fn next_server(&self, upstreams: &[Arc<Upstream>]) -> Option<Arc<Upstream>>;
}
