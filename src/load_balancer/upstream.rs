//! Upstream abstraction.
//!
//! # Responsibilities
//! - Represent a single backend server address
//! - Track in-flight requests (for least-outstanding selection)
//! - Release the slot automatically when a request finishes

use std::ops::Deref;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::uri::{Authority, InvalidUri};

/// A single upstream server.
#[derive(Debug)]
pub struct Upstream {
    /// Address the proxy dials, e.g. `127.0.0.1:3000`.
    authority: Authority,
    /// Requests currently outstanding against this upstream.
    in_flight: AtomicUsize,
}

impl Upstream {
    /// Create an upstream from a `host:port` address.
    pub fn new(addr: &str) -> Result<Self, InvalidUri> {
        Ok(Self {
            authority: Authority::from_str(addr.trim())?,
            in_flight: AtomicUsize::new(0),
        })
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Get the current number of outstanding requests.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Count a new request against this upstream.
    /// The returned guard releases it on drop.
    pub fn acquire(self: &Arc<Self>) -> UpstreamGuard {
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        UpstreamGuard {
            upstream: Arc::clone(self),
        }
    }
}

/// A RAII guard that manages the in-flight count.
#[derive(Debug)]
pub struct UpstreamGuard {
    upstream: Arc<Upstream>,
}

impl Deref for UpstreamGuard {
    type Target = Upstream;
    fn deref(&self) -> &Self::Target {
        &self.upstream
    }
}

impl Drop for UpstreamGuard {
    fn drop(&mut self) {
        self.upstream.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}
