//! Response builders for the supported payload kinds.

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use bytes::Bytes;

use crate::encoding::json::{JsonBody, JsonPayload};

/// Content-Type for binary data.
pub const CONTENT_BINARY: &str = "application/octet-stream";
/// Content-Type for JSON data.
pub const CONTENT_JSON: &str = "application/json";
/// Content-Type for JSONP data.
pub const CONTENT_JSONP: &str = "application/javascript";
/// Content-Type for plain text.
pub const CONTENT_TEXT: &str = "text/plain";
/// Content-Type for XML data.
pub const CONTENT_XML: &str = "text/xml";

/// An outgoing response body, tagged by kind.
#[derive(Debug)]
pub enum Payload {
    Binary(Bytes),
    Text(Bytes),
    Json(JsonBody),
}

impl Payload {
    pub fn content_type(&self) -> &'static str {
        match self {
            Payload::Binary(_) => CONTENT_BINARY,
            Payload::Text(_) => CONTENT_TEXT,
            Payload::Json(_) => CONTENT_JSON,
        }
    }

    /// Build the response: status first, then Content-Type, then body.
    pub fn into_response(self, status: StatusCode) -> Response {
        let content_type = HeaderValue::from_static(self.content_type());
        let body = match self {
            Payload::Binary(data) | Payload::Text(data) => Body::from(data),
            Payload::Json(json) => json.into_body(),
        };

        let mut response = Response::new(body);
        *response.status_mut() = status;
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type);
        response
    }
}

/// Raw bytes as `application/octet-stream`.
pub fn binary(status: StatusCode, data: impl Into<Bytes>) -> Response {
    Payload::Binary(data.into()).into_response(status)
}

/// Bytes as `text/plain`, written verbatim.
pub fn text_bytes(status: StatusCode, data: impl Into<Bytes>) -> Response {
    Payload::Text(data.into()).into_response(status)
}

/// A string as `text/plain`, written verbatim.
pub fn text(status: StatusCode, data: impl Into<String>) -> Response {
    Payload::Text(Bytes::from(data.into())).into_response(status)
}

/// A structured value as streamed `application/json`.
pub fn json<T: JsonPayload>(status: StatusCode, value: T) -> Response {
    Payload::Json(JsonBody::new(value)).into_response(status)
}
