//! A streamed reply that records itself once fully consumed.
//!
//! Fragments are passed through as soon as the backend produces them while
//! a copy is accumulated. When the backend stream ends, the stream writes
//! the user turn and the accumulated assistant turn before reporting its own
//! end. Dropping it earlier records nothing.

use futures::future::BoxFuture;
use futures::stream::Stream;
use jarvis_core::error::MemoryError;
use jarvis_core::memory::ConversationStore;
use jarvis_core::message::Speaker;
use jarvis_providers::TextStream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tracing::debug;

enum State {
    Streaming,
    Recording(BoxFuture<'static, Result<(), MemoryError>>),
    Finished,
}

/// Yields `Ok(fragment)` for each piece of the reply. If recording the
/// exchange fails, one `Err` is yielded before the end.
pub struct ResponseStream {
    inner: TextStream,
    store: Arc<dyn ConversationStore>,
    input: String,
    reply: String,
    state: State,
}

impl ResponseStream {
    pub(crate) fn new(inner: TextStream, store: Arc<dyn ConversationStore>, input: String) -> Self {
        Self {
            inner,
            store,
            input,
            reply: String::new(),
            state: State::Streaming,
        }
    }

    /// Everything yielded so far.
    pub fn reply_so_far(&self) -> &str {
        &self.reply
    }

    fn record(&mut self) -> BoxFuture<'static, Result<(), MemoryError>> {
        let store = Arc::clone(&self.store);
        let input = std::mem::take(&mut self.input);
        let reply = self.reply.clone();
        Box::pin(async move {
            store.append(Speaker::User, &input).await?;
            store.append(Speaker::Assistant, &reply).await?;
            debug!(chars = reply.len(), "Streamed exchange recorded");
            Ok(())
        })
    }
}

impl Stream for ResponseStream {
    type Item = Result<String, MemoryError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match &mut this.state {
                State::Streaming => match this.inner.as_mut().poll_next(cx) {
                    Poll::Ready(Some(fragment)) => {
                        this.reply.push_str(&fragment);
                        return Poll::Ready(Some(Ok(fragment)));
                    }
                    Poll::Ready(None) => {
                        let recording = this.record();
                        this.state = State::Recording(recording);
                    }
                    Poll::Pending => return Poll::Pending,
                },
                State::Recording(recording) => {
                    let result = match recording.as_mut().poll(cx) {
                        Poll::Ready(result) => result,
                        Poll::Pending => return Poll::Pending,
                    };
                    this.state = State::Finished;
                    if let Err(e) = result {
                        return Poll::Ready(Some(Err(e)));
                    }
                }
                State::Finished => return Poll::Ready(None),
            }
        }
    }
}
