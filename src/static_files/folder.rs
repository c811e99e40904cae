//! Static folder handler with conditional-GET support.
//!
//! # Responsibilities
//! - Resolve request paths inside a root folder
//! - Advertise `Cache-Control: max-age` for every found asset
//! - Answer `304 Not Modified` when `If-Modified-Since` matches the mtime
//! - Stream file contents with an extension-derived Content-Type
//! - Delegate missing/unreadable files to injected fallbacks

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use axum::{
    body::Body,
    extract::State,
    http::{header, request::Parts, HeaderMap, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use futures_util::TryStreamExt;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use crate::static_files::{
    fallback::{self, Fallback},
    http_date::{format_http_date, parse_http_date, same_second},
    resolve::resolve,
};

/// Per-request file facts. Never cached.
#[derive(Debug, Clone)]
pub struct FileMeta {
    pub path: PathBuf,
    /// `None` when the platform does not report modification times.
    pub modified: Option<SystemTime>,
    pub mime: Option<&'static str>,
}

/// Serves files under `root`.
#[derive(Clone)]
pub struct StaticFolder {
    root: Arc<PathBuf>,
    cache_control: HeaderValue,
    cache_secs: u64,
    not_found: Fallback,
    error: Fallback,
}

impl StaticFolder {
    /// Serve `root`, advertising `max-age=<cache_secs>`.
    pub fn new(root: impl Into<PathBuf>, cache_secs: u64) -> Self {
        Self {
            root: Arc::new(root.into()),
            cache_control: HeaderValue::try_from(format!("max-age={cache_secs}"))
                .unwrap_or_else(|_| HeaderValue::from_static("max-age=0")),
            cache_secs,
            not_found: fallback::not_found(),
            error: fallback::internal_error(),
        }
    }

    /// Replace the handler used when no file matches.
    pub fn with_not_found<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Parts) -> Response + Send + Sync + 'static,
    {
        self.not_found = Arc::new(handler);
        self
    }

    /// Replace the handler used when a file cannot be opened.
    pub fn with_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Parts) -> Response + Send + Sync + 'static,
    {
        self.error = Arc::new(handler);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cache_secs(&self) -> u64 {
        self.cache_secs
    }

    /// Stat the file behind `request_path`. `None` if absent, outside the
    /// root, or not a regular file.
    pub async fn lookup(&self, request_path: &str) -> Option<FileMeta> {
        let path = match resolve(&self.root, request_path) {
            Some(path) => path,
            None => {
                tracing::warn!(path = %request_path, "Rejected path outside static root");
                return None;
            }
        };

        let metadata = tokio::fs::metadata(&path).await.ok()?;
        if !metadata.is_file() {
            return None;
        }

        let mime = mime_guess::from_path(&path).first_raw();
        Some(FileMeta {
            modified: metadata.modified().ok(),
            mime,
            path,
        })
    }

    /// Answer a GET for a file under the root.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let (parts, _body) = request.into_parts();

        let Some(meta) = self.lookup(parts.uri.path()).await else {
            tracing::debug!(path = %parts.uri.path(), "Static file not found");
            return (self.not_found)(&parts);
        };

        let mut headers = HeaderMap::new();
        headers.insert(header::CACHE_CONTROL, self.cache_control.clone());

        if let (Some(modified), Some(since)) = (meta.modified, if_modified_since(&parts.headers)) {
            if same_second(modified, since) {
                return (StatusCode::NOT_MODIFIED, headers).into_response();
            }
        }

        if let Some(mime) = meta.mime {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(mime));
        }
        if let Some(modified) = meta.modified {
            if let Ok(value) = HeaderValue::from_str(&format_http_date(modified)) {
                headers.insert(header::LAST_MODIFIED, value);
            }
        }

        let file = match File::open(&meta.path).await {
            Ok(file) => file,
            Err(err) => {
                tracing::error!(path = %meta.path.display(), error = %err, "Failed to open static file");
                return (self.error)(&parts);
            }
        };

        // Headers are committed once streaming starts; a read error can only
        // abort the body.
        let path = meta.path;
        let stream = ReaderStream::new(file).inspect_err(move |err| {
            tracing::error!(path = %path.display(), error = %err, "Static file read failed");
        });

        (StatusCode::OK, headers, Body::from_stream(stream)).into_response()
    }

    /// Router serving GET (and HEAD) for every path under this folder.
    pub fn into_router(self) -> Router {
        Router::new()
            .route("/", get(static_handler))
            .route("/{*path}", get(static_handler))
            .with_state(self)
    }
}

async fn static_handler(State(folder): State<StaticFolder>, request: Request<Body>) -> Response {
    folder.handle(request).await
}

fn if_modified_since(headers: &HeaderMap) -> Option<SystemTime> {
    headers
        .get(header::IF_MODIFIED_SINCE)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_http_date)
}
