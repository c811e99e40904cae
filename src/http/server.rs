//! HTTP server setup and dispatch.
//!
//! # Responsibilities
//! - Hold the immutable configuration and the application router
//! - Build proxy and static handlers from configuration
//! - Wire up middleware (tracing, request ID)
//! - Bind one listener (cleartext) or two (cleartext + TLS) and serve
//!   the same router on each

use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, Uri},
    response::Response,
    routing::{any, MethodRouter},
    Router,
};
use tower::Service;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::http::request::with_request_tracing;
use crate::net::{bind_plain, load_tls_config, serve_plain, serve_tls, ServeError};
use crate::proxy::{ProxyError, ProxyOptions, ReverseProxy};
use crate::static_files::StaticFolder;

/// A configured server: settings plus the handler set.
pub struct Application {
    config: ServerConfig,
    router: Router,
}

impl Application {
    /// Create an application with no routes.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            router: Router::new(),
        }
    }

    /// Create an application with the static folder and proxy described by
    /// `config` mounted.
    pub fn from_config(config: ServerConfig) -> Result<Self, ProxyError> {
        let mut app = Self::new(config);

        let static_files = app.config.static_files.clone();
        if let Some(root) = static_files.root {
            tracing::info!(
                root = %root,
                mount = %static_files.mount,
                cache_secs = static_files.cache_secs,
                "Mounting static folder"
            );
            let folder = app.static_folder(root, static_files.cache_secs);
            app = app.mount(&static_files.mount, folder.into_router());
        }

        let proxy = app.config.proxy.clone();
        if !proxy.upstreams.is_empty() {
            tracing::info!(
                upstreams = ?proxy.upstreams,
                mount = %proxy.mount,
                "Mounting reverse proxy"
            );
            let handler = app.reverse_proxy(&proxy.upstreams)?;
            app = app.mount(&proxy.mount, handler.into_router());
        }

        Ok(app)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Register an application handler.
    pub fn route(mut self, path: &str, method_router: MethodRouter) -> Self {
        self.router = self.router.route(path, method_router);
        self
    }

    /// Mount `router` under `prefix`. A prefix of `/` merges it at the root.
    ///
    /// Both `{prefix}` and `{prefix}/` reach the mounted router's `/`.
    pub fn mount(mut self, prefix: &str, router: Router) -> Self {
        let prefix = prefix.trim_end_matches('/');
        self.router = if prefix.is_empty() {
            self.router.merge(router)
        } else {
            // `nest` leaves the trailing-slash form unmatched.
            let root = router.clone();
            self.router.nest(prefix, router).route(
                &format!("{prefix}/"),
                any(move |request: Request<Body>| at_root(root.clone(), request)),
            )
        };
        self
    }

    /// Build a reverse proxy using this application's client settings.
    pub fn reverse_proxy<I, S>(&self, upstreams: I) -> Result<ReverseProxy, ProxyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let connect_timeout = match self.config.proxy.connect_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        ReverseProxy::new(upstreams, ProxyOptions { connect_timeout })
    }

    /// Build a static folder handler.
    pub fn static_folder(&self, root: impl Into<PathBuf>, cache_secs: u64) -> StaticFolder {
        StaticFolder::new(root, cache_secs)
    }

    /// The final router with middleware applied.
    pub fn into_router(self) -> Router {
        with_request_tracing(self.router)
    }

    /// Serve cleartext on an already-bound listener, ignoring the TLS setting.
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServeError> {
        serve_plain(listener, self.into_router()).await
    }

    /// Bind the configured listeners and serve until one fails.
    ///
    /// Without TLS a single cleartext listener runs on `host:http_port`.
    /// With TLS, cleartext and TLS listeners run concurrently and the first
    /// error from either ends the call.
    pub async fn run(self) -> Result<(), ServeError> {
        let config = self.config.clone();
        tracing::info!(
            host = %config.host,
            http_port = config.http_port,
            https_port = config.https_port,
            tls = config.tls,
            domain_name = %config.domain_name,
            "Starting server"
        );

        let tls = if config.tls {
            Some(load_tls_config(Path::new(&config.chain_path), Path::new(&config.key_path)).await?)
        } else {
            None
        };

        let router = self.into_router();
        let listener = bind_plain(&config.http_address()).await?;

        match tls {
            None => serve_plain(listener, router).await,
            Some(tls) => {
                let https_addr = config.https_address();
                tokio::try_join!(
                    serve_plain(listener, router.clone()),
                    serve_tls(&https_addr, router, tls),
                )?;
                Ok(())
            }
        }
    }
}

/// Dispatch `request` to `router` with its path rewritten to `/`.
async fn at_root(mut router: Router, mut request: Request<Body>) -> Response {
    let uri = match request.uri().query() {
        Some(query) => format!("/?{query}"),
        None => "/".to_string(),
    };
    if let Ok(uri) = uri.parse::<Uri>() {
        *request.uri_mut() = uri;
    }
    match router.call(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    }
}
