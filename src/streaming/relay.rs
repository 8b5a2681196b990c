//! The relay loop: upstream byte stream in, outbound SSE frames out.
//!
//! One relay per request. It owns its `LineFramer`, reads the upstream one
//! chunk at a time and stops on the first of: terminal sentinel, upstream
//! end-of-data, upstream error, idle timeout, or client disconnect.

use std::fmt::Display;
use std::time::{Duration, Instant};

use axum::body::Body;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::observability::metrics;
use crate::streaming::delta::{parse_line, DeltaEvent};
use crate::streaming::frame::OutboundFrame;
use crate::streaming::framer::LineFramer;

/// Frames buffered between the relay task and the response body.
const CHANNEL_CAPACITY: usize = 32;

/// Largest unterminated line held back before the stream is abandoned.
pub const MAX_PENDING_LINE: usize = 1024 * 1024;

/// Channel feeding the response body.
pub type FrameSender = mpsc::Sender<Result<Bytes, std::io::Error>>;

/// Failures after streaming headers have been committed.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("upstream read failed: {0}")]
    Upstream(String),

    #[error("no upstream data for {0:?}")]
    IdleTimeout(Duration),

    #[error("upstream line exceeds {0} bytes without a terminator")]
    LineTooLong(usize),
}

/// How a relay finished.
#[derive(Debug)]
pub enum RelayOutcome {
    /// Upstream sent the sentinel; the done frame was written.
    Completed,
    /// Upstream closed without a sentinel; the response simply ends.
    UpstreamEnded,
    /// The client went away; upstream reading stopped.
    ClientGone,
    /// Transport failure; the connection is aborted.
    Failed(RelayError),
}

impl RelayOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelayOutcome::Completed => "completed",
            RelayOutcome::UpstreamEnded => "upstream_ended",
            RelayOutcome::ClientGone => "client_gone",
            RelayOutcome::Failed(RelayError::Upstream(_)) => "upstream_error",
            RelayOutcome::Failed(RelayError::IdleTimeout(_)) => "idle_timeout",
            RelayOutcome::Failed(RelayError::LineTooLong(_)) => "line_too_long",
        }
    }
}

/// Re-frames an upstream completion stream for the client.
#[derive(Debug, Clone)]
pub struct Relay {
    idle_timeout: Duration,
    max_pending_line: usize,
    cancel: CancellationToken,
}

impl Relay {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            idle_timeout,
            max_pending_line: MAX_PENDING_LINE,
            cancel: CancellationToken::new(),
        }
    }

    /// Override the limit on an unterminated upstream line.
    pub fn with_max_pending_line(mut self, bytes: usize) -> Self {
        self.max_pending_line = bytes;
        self
    }

    /// Token cancelled when the client disconnects.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Drive the relay to completion, writing encoded frames to `tx`.
    pub async fn run<S, E>(&self, upstream: S, tx: &FrameSender) -> RelayOutcome
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Display,
    {
        let mut upstream = std::pin::pin!(upstream);
        let mut framer = LineFramer::new();

        loop {
            let next = tokio::select! {
                _ = self.cancel.cancelled() => return RelayOutcome::ClientGone,
                next = tokio::time::timeout(self.idle_timeout, upstream.next()) => next,
            };

            let chunk = match next {
                Ok(Some(Ok(chunk))) => chunk,
                Ok(Some(Err(e))) => {
                    return RelayOutcome::Failed(RelayError::Upstream(e.to_string()))
                }
                Ok(None) => {
                    if !framer.is_empty() {
                        tracing::debug!(
                            discarded_bytes = framer.buffered().len(),
                            "Upstream ended with an unterminated line"
                        );
                    }
                    return RelayOutcome::UpstreamEnded;
                }
                Err(_) => return RelayOutcome::Failed(RelayError::IdleTimeout(self.idle_timeout)),
            };

            framer.push(&chunk);
            tracing::trace!(
                buffer = %String::from_utf8_lossy(framer.buffered()),
                chunk_len = chunk.len(),
                "Upstream chunk received"
            );

            while let Some(line) = framer.next_line() {
                match parse_line(&line) {
                    DeltaEvent::Done => {
                        return match send(tx, OutboundFrame::Done).await {
                            Ok(()) => RelayOutcome::Completed,
                            Err(()) => RelayOutcome::ClientGone,
                        };
                    }
                    DeltaEvent::Text(text) => {
                        if send(tx, OutboundFrame::text(&text)).await.is_err() {
                            return RelayOutcome::ClientGone;
                        }
                        metrics::record_frame();
                    }
                    DeltaEvent::Malformed(error) => {
                        tracing::debug!(error = %error, line = %line, "Skipping malformed upstream frame");
                    }
                    DeltaEvent::Ignored => {}
                }
            }

            if framer.buffered().len() > self.max_pending_line {
                return RelayOutcome::Failed(RelayError::LineTooLong(self.max_pending_line));
            }
        }
    }

    /// Spawn the relay and return a response body fed by it.
    ///
    /// Dropping the body (client disconnect) cancels the relay. Transport
    /// failures abort the body with an I/O error so the connection closes.
    pub fn spawn<S, E>(self, upstream: S, request_id: String) -> Body
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let guard = self.cancel.clone().drop_guard();
        let span = tracing::info_span!("relay", request_id = %request_id);

        tokio::spawn(
            async move {
                let started = Instant::now();
                let outcome = self.run(upstream, &tx).await;

                match &outcome {
                    RelayOutcome::Failed(e) => {
                        tracing::warn!(error = %e, "Stream aborted after headers were sent");
                        let _ = tx.send(Err(std::io::Error::other(e.to_string()))).await;
                    }
                    RelayOutcome::ClientGone => {
                        tracing::info!("Client disconnected, upstream read stopped");
                    }
                    _ => tracing::debug!(outcome = outcome.as_str(), "Stream finished"),
                }

                metrics::record_stream(outcome.as_str(), started);
            }
            .instrument(span),
        );

        let body = futures_util::stream::unfold((rx, guard), |(mut rx, guard)| async move {
            rx.recv().await.map(|item| (item, (rx, guard)))
        });
        Body::from_stream(body)
    }
}

async fn send(tx: &FrameSender, frame: OutboundFrame) -> Result<(), ()> {
    tx.send(Ok(frame.encode())).await.map_err(|_| ())
}
