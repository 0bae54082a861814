//! Streaming plumbing shared by the slow and post handlers.
//!
//! Responses are fed through a one-slot channel: a write resolves once the
//! connection has taken the previous chunk, which is as close to
//! "write + flush" as a hyper body gets. When the connection drops the body,
//! the receiver goes with it and every later write fails with [`ClientGone`].

use std::convert::Infallible;

use axum::{
    body::{Body, BodyDataStream},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use futures_util::{stream, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;

pub const TEXT_HTML: &str = "text/html; charset=utf-8";
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

#[derive(Debug, Error)]
#[error("client disconnected")]
pub struct ClientGone;

/// Write half of a streamed response body.
#[derive(Debug)]
pub struct ResponseWriter {
    tx: mpsc::Sender<Bytes>,
}

impl ResponseWriter {
    pub async fn write(&self, chunk: impl Into<Bytes>) -> Result<(), ClientGone> {
        self.tx.send(chunk.into()).await.map_err(|_| ClientGone)
    }
}

/// Build a response whose body is whatever gets written to the returned writer.
/// The body ends when the writer is dropped.
pub fn streaming_response(status: StatusCode, content_type: &'static str) -> (ResponseWriter, Response) {
    let (tx, rx) = mpsc::channel::<Bytes>(1);
    let chunks = stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|chunk| (Ok::<_, Infallible>(chunk), rx))
    });
    let response = (status, [(CONTENT_TYPE, content_type)], Body::from_stream(chunks)).into_response();
    (ResponseWriter { tx }, response)
}

/// Reads a request body in pieces of at most `max` bytes, independent of how
/// the client framed it.
pub struct ChunkReader {
    stream: BodyDataStream,
    pending: Bytes,
    max: usize,
}

impl ChunkReader {
    pub fn new(body: Body, max: usize) -> Self {
        Self {
            stream: body.into_data_stream(),
            pending: Bytes::new(),
            max: max.max(1),
        }
    }

    /// Number of bytes consumed by this read; `Ok(0)` at end of body.
    pub async fn read(&mut self) -> Result<usize, axum::Error> {
        while self.pending.is_empty() {
            match self.stream.next().await {
                Some(Ok(frame)) => self.pending = frame,
                Some(Err(e)) => return Err(e),
                None => return Ok(0),
            }
        }
        let n = self.pending.len().min(self.max);
        let _ = self.pending.split_to(n);
        Ok(n)
    }
}
