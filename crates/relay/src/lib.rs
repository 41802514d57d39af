#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Relay for streamed text generation
//!
//! A text-generation service produces an ordered, finite sequence of chunks
//! for a prompt. This crate drains such a sequence into an output sink one
//! chunk at a time, flushing after each so the reader sees text as it
//! arrives. Nothing is buffered beyond the chunk in hand.

use binlink_errors::RelayError;
use binlink_events::{AppEvent, EventEmitter, EventSender, FailureContext, RelayEvent};
use futures::stream::{BoxStream, Stream, StreamExt};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// A service that answers a prompt with a lazy sequence of text chunks
pub trait TextStream: Send + Sync {
    fn stream(&self, prompt: &str) -> BoxStream<'_, Result<String, RelayError>>;
}

/// Totals for one drained stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    pub chunks: usize,
    pub bytes: usize,
}

/// Write every chunk of `stream` to `writer` in order, flushing after each.
///
/// # Errors
///
/// Returns the first `Source` error yielded by the stream, or `Sink` if the
/// writer fails. Chunks written before the failure stay written.
pub async fn drain_to<S, W>(stream: S, writer: &mut W) -> Result<RelayStats, RelayError>
where
    S: Stream<Item = Result<String, RelayError>> + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut stats = RelayStats::default();
    drain_counting(stream, writer, &mut stats).await?;
    Ok(stats)
}

async fn drain_counting<S, W>(
    mut stream: S,
    writer: &mut W,
    stats: &mut RelayStats,
) -> Result<(), RelayError>
where
    S: Stream<Item = Result<String, RelayError>> + Unpin,
    W: AsyncWrite + Unpin,
{
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        writer.write_all(chunk.as_bytes()).await?;
        writer.flush().await?;
        stats.chunks += 1;
        stats.bytes += chunk.len();
    }
    Ok(())
}

/// A [`TextStream`] bound to an output sink, reporting progress as events
pub struct Relay<T> {
    source: T,
    event_sender: Option<EventSender>,
}

impl<T: TextStream> Relay<T> {
    #[must_use]
    pub fn new(source: T) -> Self {
        Self {
            source,
            event_sender: None,
        }
    }

    #[must_use]
    pub fn with_event_sender(mut self, sender: Option<EventSender>) -> Self {
        self.event_sender = sender;
        self
    }

    /// Stream the answer to `prompt` into `writer`
    ///
    /// # Errors
    ///
    /// Same as [`drain_to`].
    pub async fn run<W>(&self, prompt: &str, writer: &mut W) -> Result<RelayStats, RelayError>
    where
        W: AsyncWrite + Unpin,
    {
        self.emit(AppEvent::Relay(RelayEvent::StreamStarted {
            prompt_chars: prompt.chars().count(),
        }));

        let mut stats = RelayStats::default();
        match drain_counting(self.source.stream(prompt), writer, &mut stats).await {
            Ok(()) => {
                self.emit(AppEvent::Relay(RelayEvent::StreamCompleted {
                    chunks: stats.chunks,
                    bytes: stats.bytes,
                }));
                Ok(stats)
            }
            Err(e) => {
                self.emit(AppEvent::Relay(RelayEvent::StreamFailed {
                    chunks: stats.chunks,
                    failure: FailureContext::from_error(&e),
                }));
                Err(e)
            }
        }
    }
}

impl<T> EventEmitter for Relay<T> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}
