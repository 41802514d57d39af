//! Integration tests for the text relay

#[cfg(test)]
mod tests {
    use binlink_errors::RelayError;
    use binlink_events::{AppEvent, RelayEvent};
    use binlink_relay::*;
    use futures::stream::{self, BoxStream, StreamExt};
    use std::pin::Pin;
    use std::sync::{Arc, Mutex};
    use std::task::{Context, Poll};
    use tokio::io::AsyncWrite;

    /// Replays a fixed script of chunks, optionally failing after them
    struct Scripted {
        chunks: Vec<&'static str>,
        fail_with: Option<&'static str>,
    }

    impl TextStream for Scripted {
        fn stream(&self, _prompt: &str) -> BoxStream<'_, Result<String, RelayError>> {
            let ok = self.chunks.iter().map(|c| Ok((*c).to_string()));
            let err = self.fail_with.map(|m| {
                Err(RelayError::Source {
                    message: m.to_string(),
                })
            });
            stream::iter(ok.chain(err)).boxed()
        }
    }

    /// Records what was visible to a reader at every flush
    #[derive(Clone, Default)]
    struct FlushLog {
        buffer: Arc<Mutex<Vec<u8>>>,
        flushed: Arc<Mutex<Vec<String>>>,
    }

    impl AsyncWrite for FlushLog {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            self.buffer.lock().unwrap().extend_from_slice(buf);
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            let snapshot = String::from_utf8(self.buffer.lock().unwrap().clone()).unwrap();
            self.flushed.lock().unwrap().push(snapshot);
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    /// A sink that is already closed
    struct BrokenPipe;

    impl AsyncWrite for BrokenPipe {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            Poll::Ready(Err(std::io::ErrorKind::BrokenPipe.into()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_chunks_written_in_order() {
        let source = Scripted {
            chunks: vec!["The ", "sky ", "is ", "blue."],
            fail_with: None,
        };
        let mut out = Vec::new();

        let stats = drain_to(source.stream("why is the sky blue?"), &mut out)
            .await
            .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "The sky is blue.");
        assert_eq!(stats, RelayStats { chunks: 4, bytes: 16 });
    }

    #[tokio::test]
    async fn test_flushes_after_every_chunk() {
        let source = Scripted {
            chunks: vec!["a", "b", "c"],
            fail_with: None,
        };
        let mut sink = FlushLog::default();

        drain_to(source.stream(""), &mut sink).await.unwrap();

        assert_eq!(*sink.flushed.lock().unwrap(), vec!["a", "ab", "abc"]);
    }

    #[tokio::test]
    async fn test_source_error_stops_the_drain() {
        let source = Scripted {
            chunks: vec!["partial ", "answer"],
            fail_with: Some("connection reset"),
        };
        let mut out = Vec::new();

        let err = drain_to(source.stream(""), &mut out).await.unwrap_err();

        assert_eq!(
            err,
            RelayError::Source {
                message: "connection reset".into()
            }
        );
        assert_eq!(String::from_utf8(out).unwrap(), "partial answer");
    }

    #[tokio::test]
    async fn test_sink_error_is_reported() {
        let source = Scripted {
            chunks: vec!["x"],
            fail_with: None,
        };

        let err = drain_to(source.stream(""), &mut BrokenPipe).await.unwrap_err();
        assert!(matches!(err, RelayError::Sink { .. }));
    }

    #[tokio::test]
    async fn test_relay_emits_events() {
        let (tx, mut rx) = binlink_events::channel();
        let relay = Relay::new(Scripted {
            chunks: vec!["hi", "!"],
            fail_with: None,
        })
        .with_event_sender(Some(tx));
        let mut out = Vec::new();

        relay.run("greet me", &mut out).await.unwrap();
        drop(relay);

        let mut events = Vec::new();
        while let Some(AppEvent::Relay(event)) = rx.recv().await {
            events.push(event);
        }
        assert!(matches!(
            events.as_slice(),
            [
                RelayEvent::StreamStarted { prompt_chars: 8 },
                RelayEvent::StreamCompleted { chunks: 2, bytes: 3 },
            ]
        ));
    }

    #[tokio::test]
    async fn test_relay_failure_event_counts_delivered_chunks() {
        let (tx, mut rx) = binlink_events::channel();
        let relay = Relay::new(Scripted {
            chunks: vec!["one"],
            fail_with: Some("model unavailable"),
        })
        .with_event_sender(Some(tx));
        let mut out = Vec::new();

        assert!(relay.run("", &mut out).await.is_err());
        drop(relay);

        let mut failed = None;
        while let Some(event) = rx.recv().await {
            if let AppEvent::Relay(RelayEvent::StreamFailed { chunks, failure }) = event {
                failed = Some((chunks, failure));
            }
        }
        let (chunks, failure) = failed.unwrap();
        assert_eq!(chunks, 1);
        assert_eq!(failure.code.as_deref(), Some("relay.source"));
    }
}
