//! Reverse proxy request handling.
//!
//! # Responsibilities
//! - Build one shared HTTP client for all upstreams
//! - Select an upstream per request (least outstanding)
//! - Forward method, path, query, headers and body
//! - Map transport failures and non-200 statuses to 502 Bad Gateway

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{self, HeaderMap, HeaderName},
        uri::{Authority, PathAndQuery, Scheme},
        Request, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use futures_util::StreamExt;
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::load_balancer::{UpstreamGuard, UpstreamPool};
use crate::observability::metrics;
use crate::proxy::error::ProxyError;

/// Headers that apply to a single connection and are never forwarded.
static HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Client settings for the proxy.
#[derive(Debug, Clone)]
pub struct ProxyOptions {
    /// TCP connect timeout per upstream dial. `None` waits indefinitely.
    pub connect_timeout: Option<Duration>,
}

impl Default for ProxyOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Some(Duration::from_secs(5)),
        }
    }
}

struct Inner {
    pool: UpstreamPool,
    client: Client<HttpConnector, Body>,
}

/// Load-balancing reverse proxy over a fixed upstream pool.
///
/// Cheap to clone; clones share the pool and the connection pool.
#[derive(Clone)]
pub struct ReverseProxy {
    inner: Arc<Inner>,
}

struct Forwarded {
    upstream: String,
    response: Response,
}

impl ReverseProxy {
    /// Create a proxy for the given `host:port` upstreams.
    pub fn new<I, S>(upstreams: I, options: ProxyOptions) -> Result<Self, ProxyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::with_pool(UpstreamPool::new(upstreams)?, options))
    }

    /// Create a proxy over an already-built pool.
    pub fn with_pool(pool: UpstreamPool, options: ProxyOptions) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(options.connect_timeout);
        let client = Client::builder(TokioExecutor::new()).build(connector);

        tracing::info!(
            upstreams = pool.len(),
            connect_timeout = ?options.connect_timeout,
            "Reverse proxy initialized"
        );

        Self {
            inner: Arc::new(Inner { pool, client }),
        }
    }

    pub fn pool(&self) -> &UpstreamPool {
        &self.inner.pool
    }

    /// Forward `request` and map the outcome to a client response.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let start_time = Instant::now();
        let method = request.method().to_string();
        let path = request.uri().path().to_string();

        match self.forward(request).await {
            Ok(Forwarded { upstream, response }) => {
                tracing::debug!(
                    method = %method,
                    path = %path,
                    upstream = %upstream,
                    "Proxied request"
                );
                metrics::record_request(&method, StatusCode::OK.as_u16(), &upstream, start_time);
                response
            }
            Err(err) => {
                let upstream = err.upstream().unwrap_or("none").to_string();
                match &err {
                    ProxyError::UpstreamStatus { status, .. } => {
                        tracing::warn!(
                            method = %method,
                            path = %path,
                            upstream = %upstream,
                            status = status.as_u16(),
                            expected = StatusCode::OK.as_u16(),
                            "Unexpected upstream status code"
                        );
                    }
                    _ => {
                        tracing::error!(
                            method = %method,
                            path = %path,
                            upstream = %upstream,
                            error = %err,
                            "Upstream request failed"
                        );
                    }
                }
                metrics::record_request(
                    &method,
                    StatusCode::BAD_GATEWAY.as_u16(),
                    &upstream,
                    start_time,
                );
                StatusCode::BAD_GATEWAY.into_response()
            }
        }
    }

    async fn forward(&self, request: Request<Body>) -> Result<Forwarded, ProxyError> {
        let guard = self.inner.pool.acquire().ok_or(ProxyError::NoUpstream)?;
        let upstream = guard.authority().to_string();
        let outbound = build_upstream_request(request, guard.authority())?;

        let response: hyper::Response<Incoming> = self
            .inner
            .client
            .request(outbound)
            .await
            .map_err(|source| ProxyError::Transport {
                upstream: upstream.clone(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ProxyError::UpstreamStatus { upstream, status });
        }

        let (mut parts, body) = response.into_parts();
        strip_hop_by_hop(&mut parts.headers);
        let body = hold_until_done(Body::new(body), guard);

        Ok(Forwarded {
            upstream,
            response: Response::from_parts(parts, body),
        })
    }

    /// Router sending every path on every method to this proxy.
    pub fn into_router(self) -> Router {
        Router::new()
            .route("/", any(proxy_handler))
            .route("/{*path}", any(proxy_handler))
            .with_state(self)
    }
}

async fn proxy_handler(State(proxy): State<ReverseProxy>, request: Request<Body>) -> Response {
    proxy.handle(request).await
}

/// Rewrite the inbound request to target `authority` over plain HTTP.
///
/// Method, path, query, end-to-end headers and body carry over.
fn build_upstream_request(
    request: Request<Body>,
    authority: &Authority,
) -> Result<Request<Body>, ProxyError> {
    let (parts, body) = request.into_parts();

    let path_and_query = parts
        .uri
        .path_and_query()
        .cloned()
        .unwrap_or_else(|| PathAndQuery::from_static("/"));
    let uri = Uri::builder()
        .scheme(Scheme::HTTP)
        .authority(authority.clone())
        .path_and_query(path_and_query)
        .build()?;

    let mut outbound = Request::builder().method(parts.method).uri(uri).body(body)?;
    *outbound.headers_mut() = parts.headers;
    strip_hop_by_hop(outbound.headers_mut());
    Ok(outbound)
}

/// Remove the fixed hop-by-hop set plus any header named in `Connection`.
fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in HOP_BY_HOP.iter().chain(listed.iter()) {
        headers.remove(name);
    }
}

/// Keep the in-flight guard alive until the body is fully streamed or dropped.
fn hold_until_done(body: Body, guard: UpstreamGuard) -> Body {
    let stream = body.into_data_stream().map(move |chunk| {
        let _held = &guard;
        chunk
    });
    Body::from_stream(stream)
}
