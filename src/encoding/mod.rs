//! Response encoding subsystem.
//!
//! # Data Flow
//! ```text
//! Handler result
//!     → response.rs (pick payload kind, set status + Content-Type)
//!     → json.rs (streamed JSON: fast self-encoder or serde fallback)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - Status is always set before the body
//! - JSON bodies are streamed in chunks, never buffered whole
//! - Types opt into a hand-written encoder via `JsonPayload::fast_json`

pub mod json;
pub mod response;

pub use json::{encode_json, ChunkWriter, FastJson, JsonBody, JsonPayload};
pub use response::{
    binary, json, text, text_bytes, Payload, CONTENT_BINARY, CONTENT_JSON, CONTENT_JSONP,
    CONTENT_TEXT, CONTENT_XML,
};
