//! Proxy error types.

use axum::http::StatusCode;
use thiserror::Error;

use crate::load_balancer::PoolError;

/// Errors produced while building or running the reverse proxy.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The upstream list was empty or malformed.
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// The balancer returned no upstream.
    #[error("no reachable upstream")]
    NoUpstream,

    /// The outbound request could not be built.
    #[error("failed to build upstream request: {0}")]
    Request(#[from] axum::http::Error),

    /// Connection refused, reset or timed out.
    #[error("upstream {upstream} unreachable: {source}")]
    Transport {
        upstream: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },

    /// The upstream answered with something other than 200.
    #[error("unexpected status code from {upstream}: {status}, expecting {}", StatusCode::OK)]
    UpstreamStatus { upstream: String, status: StatusCode },
}

impl ProxyError {
    /// The upstream involved, when one was selected.
    pub fn upstream(&self) -> Option<&str> {
        match self {
            ProxyError::Transport { upstream, .. } | ProxyError::UpstreamStatus { upstream, .. } => {
                Some(upstream)
            }
            _ => None,
        }
    }
}
