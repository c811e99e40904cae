//! Streamed JSON response bodies.
//!
//! # Responsibilities
//! - Encode any `JsonPayload` without materializing the whole document
//! - Prefer a type's hand-written encoder when it exposes one
//! - Surface encoding errors to the body stream
//!
//! # Design Decisions
//! - Documents up to `INLINE_LIMIT` are encoded on the calling task into a
//!   single buffer; larger ones restart on the blocking pool
//! - Streaming hands 8 KiB chunks to the response body through a bounded
//!   channel (backpressure from the client). A slow reader therefore pins a
//!   blocking-pool thread, which `tokio::fs` shares with static file I/O
//! - A dropped receiver turns into `BrokenPipe` so the encoder stops early
//! - Once streaming has begun an error aborts the body; no recovery

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::io::{self, Write};

use axum::body::Body;
use bytes::{Bytes, BytesMut};
use serde::Serialize;
use tokio::sync::mpsc;

/// Size at which buffered output is handed to the body stream.
const CHUNK_SIZE: usize = 8 * 1024;

/// Chunks allowed in flight between encoder and connection.
const CHANNEL_DEPTH: usize = 4;

/// Largest document encoded inline instead of streamed.
const INLINE_LIMIT: usize = CHUNK_SIZE * CHANNEL_DEPTH;

/// A hand-written JSON encoder, faster than generic serde traversal.
///
/// Output must decode to the same value `serde_json` would produce for the
/// type's `Serialize` impl.
pub trait FastJson {
    fn write_json(&self, out: &mut dyn Write) -> io::Result<()>;
}

/// A value that can be sent as a JSON response body.
pub trait JsonPayload: Serialize + Send + 'static {
    /// The type's fast encoder, if it has one.
    fn fast_json(&self) -> Option<&dyn FastJson> {
        None
    }
}

impl JsonPayload for serde_json::Value {}
impl JsonPayload for String {}
impl JsonPayload for &'static str {}

impl<T> JsonPayload for Vec<T> where T: Serialize + Send + 'static {}

impl<K, V> JsonPayload for BTreeMap<K, V>
where
    K: Serialize + Ord + Send + 'static,
    V: Serialize + Send + 'static,
{
}

impl<K, V, S> JsonPayload for HashMap<K, V, S>
where
    K: Serialize + Eq + Hash + Send + 'static,
    V: Serialize + Send + 'static,
    S: BuildHasher + Send + 'static,
{
}

/// Encode `value` into `out`, using the fast path when available.
pub fn encode_json<T>(value: &T, out: &mut dyn Write) -> io::Result<()>
where
    T: JsonPayload + ?Sized,
{
    match value.fast_json() {
        Some(fast) => fast.write_json(out),
        None => serde_json::to_writer(&mut *out, value).map_err(io::Error::from),
    }
}

type Encoder = Box<dyn Fn(&mut dyn Write) -> io::Result<()> + Send>;

/// A type-erased JSON payload waiting to be streamed.
pub struct JsonBody {
    encode: Encoder,
}

impl JsonBody {
    pub fn new<T: JsonPayload>(value: T) -> Self {
        Self {
            encode: Box::new(move |out| encode_json(&value, out)),
        }
    }

    /// Turn the payload into a response body.
    ///
    /// Small documents come back fully buffered. Larger ones stream from the
    /// blocking pool, or are encoded eagerly outside a Tokio runtime.
    pub fn into_body(self) -> Body {
        let mut inline = InlineBuf::default();
        match (self.encode)(&mut inline) {
            Ok(()) => return Body::from(inline.buf),
            Err(_) if inline.overflowed => {}
            Err(err) => return failed_body(err),
        }

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => return self.into_buffered_body(),
        };

        let (tx, mut rx) = mpsc::channel::<io::Result<Bytes>>(CHANNEL_DEPTH);
        let encode = self.encode;
        handle.spawn_blocking(move || {
            let mut writer = ChunkWriter::new(tx);
            let result = encode(&mut writer).and_then(|()| writer.flush());
            if let Err(err) = result {
                if err.kind() != io::ErrorKind::BrokenPipe {
                    tracing::warn!(error = %err, "JSON encoding failed mid-stream");
                }
                writer.fail(err);
            }
        });

        let stream = futures_util::stream::poll_fn(move |cx| rx.poll_recv(cx));
        Body::from_stream(stream)
    }

    fn into_buffered_body(self) -> Body {
        let mut buf = Vec::new();
        match (self.encode)(&mut buf) {
            Ok(()) => Body::from(buf),
            Err(err) => failed_body(err),
        }
    }
}

fn failed_body(err: io::Error) -> Body {
    tracing::warn!(error = %err, "JSON encoding failed");
    Body::from_stream(futures_util::stream::iter([Err::<Bytes, _>(err)]))
}

/// Buffer that refuses to grow past `INLINE_LIMIT`.
#[derive(Default)]
struct InlineBuf {
    buf: Vec<u8>,
    overflowed: bool,
}

impl Write for InlineBuf {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if self.buf.len() + data.len() > INLINE_LIMIT {
            self.overflowed = true;
            return Err(io::Error::other("inline limit exceeded"));
        }
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for JsonBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonBody").finish_non_exhaustive()
    }
}

/// `io::Write` adapter that forwards fixed-size chunks to a body channel.
///
/// Must be driven from a blocking context.
pub struct ChunkWriter {
    buf: BytesMut,
    tx: mpsc::Sender<io::Result<Bytes>>,
}

impl ChunkWriter {
    pub fn new(tx: mpsc::Sender<io::Result<Bytes>>) -> Self {
        Self {
            buf: BytesMut::with_capacity(CHUNK_SIZE),
            tx,
        }
    }

    fn send_buffered(&mut self) -> io::Result<()> {
        let chunk = self.buf.split().freeze();
        self.tx.blocking_send(Ok(chunk)).map_err(|_| {
            io::Error::new(io::ErrorKind::BrokenPipe, "response body receiver dropped")
        })
    }

    /// Terminate the stream with `err`.
    pub fn fail(self, err: io::Error) {
        let _ = self.tx.blocking_send(Err(err));
    }
}

impl Write for ChunkWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        if self.buf.len() >= CHUNK_SIZE {
            self.send_buffered()?;
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            self.send_buffered()?;
        }
        Ok(())
    }
}
