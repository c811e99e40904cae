//! Upstream pool management.
//!
//! # Responsibilities
//! - Own the ordered, non-empty list of upstreams
//! - Apply the load balancing algorithm to select one
//! - Hand out in-flight guards for tracking

use std::sync::Arc;

use thiserror::Error;

use crate::load_balancer::{
    least_conn::LeastOutstanding,
    upstream::{Upstream, UpstreamGuard},
    LoadBalancer,
};

/// Errors raised while building a pool.
#[derive(Debug, Error)]
pub enum PoolError {
    /// No upstream addresses were given.
    #[error("upstream pool must contain at least one address")]
    Empty,

    /// An address could not be parsed as `host:port`.
    #[error("invalid upstream address {addr:?}: {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: axum::http::uri::InvalidUri,
    },
}

/// An ordered collection of upstreams plus the selection policy.
#[derive(Debug)]
pub struct UpstreamPool {
    upstreams: Vec<Arc<Upstream>>,
    balancer: Box<dyn LoadBalancer>,
}

impl UpstreamPool {
    /// Build a pool balanced by least outstanding requests.
    pub fn new<I, S>(addrs: I) -> Result<Self, PoolError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_balancer(addrs, Box::new(LeastOutstanding::new()))
    }

    /// Build a pool with a custom selection policy.
    pub fn with_balancer<I, S>(addrs: I, balancer: Box<dyn LoadBalancer>) -> Result<Self, PoolError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let upstreams = addrs
            .into_iter()
            .map(|addr| {
                let addr = addr.as_ref();
                Upstream::new(addr)
                    .map(Arc::new)
                    .map_err(|source| PoolError::InvalidAddress {
                        addr: addr.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if upstreams.is_empty() {
            return Err(PoolError::Empty);
        }

        tracing::debug!(
            upstreams = ?upstreams.iter().map(|u| u.authority().as_str()).collect::<Vec<_>>(),
            "Upstream pool created"
        );

        Ok(Self { upstreams, balancer })
    }

    /// Select an upstream and count the request against it.
    pub fn acquire(&self) -> Option<UpstreamGuard> {
        let upstream = self.balancer.next_server(&self.upstreams)?;
        Some(upstream.acquire())
    }

    /// All upstreams, in pool order.
    pub fn upstreams(&self) -> &[Arc<Upstream>] {
        &self.upstreams
    }

    pub fn len(&self) -> usize {
        self.upstreams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upstreams.is_empty()
    }
}
