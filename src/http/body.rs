//! Response body module
//!
//! A response body is either a single buffered payload or a stream of chunks
//! fed through a bounded channel by a transfer task. The channel write end is
//! the response sink handed to a [`ChunkedTransfer`]; a failed send is the
//! connection-lost condition.
//!
//! [`ChunkedTransfer`]: crate::handler::transfer::ChunkedTransfer

use bytes::Bytes;
use futures::channel::mpsc;
use futures::{SinkExt, StreamExt};
use http_body::{Body, Frame, SizeHint};
use std::convert::Infallible;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Body of an outgoing response
pub struct ResponseBody {
    inner: Kind,
}

enum Kind {
    Once(Option<Bytes>),
    Stream {
        receiver: mpsc::Receiver<Bytes>,
        declared_len: u64,
    },
}

impl ResponseBody {
    pub fn empty() -> Self {
        Self {
            inner: Kind::Once(None),
        }
    }

    /// Whole payload in one write
    pub fn once(bytes: impl Into<Bytes>) -> Self {
        Self {
            inner: Kind::Once(Some(bytes.into())),
        }
    }

    /// Streaming body fed chunk by chunk through a bounded channel.
    ///
    /// Capacity is one chunk, so the producer suspends until the transport
    /// drains the previous chunk. `declared_len` must match the
    /// Content-Length header set on the response.
    pub fn channel(declared_len: u64) -> (BodySink, Self) {
        let (sender, receiver) = mpsc::channel(1);
        let body = Self {
            inner: Kind::Stream {
                receiver,
                declared_len,
            },
        };
        (BodySink { sender }, body)
    }
}

impl Body for ResponseBody {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match &mut self.get_mut().inner {
            Kind::Once(bytes) => Poll::Ready(bytes.take().map(|b| Ok(Frame::data(b)))),
            Kind::Stream { receiver, .. } => match receiver.poll_next_unpin(cx) {
                Poll::Ready(Some(chunk)) => Poll::Ready(Some(Ok(Frame::data(chunk)))),
                Poll::Ready(None) => Poll::Ready(None),
                Poll::Pending => Poll::Pending,
            },
        }
    }

    fn is_end_stream(&self) -> bool {
        match &self.inner {
            Kind::Once(bytes) => bytes.is_none(),
            Kind::Stream { .. } => false,
        }
    }

    fn size_hint(&self) -> SizeHint {
        match &self.inner {
            Kind::Once(None) => SizeHint::with_exact(0),
            Kind::Once(Some(bytes)) => SizeHint::with_exact(bytes.len() as u64),
            Kind::Stream { declared_len, .. } => SizeHint::with_exact(*declared_len),
        }
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Kind::Once(bytes) => f
                .debug_struct("ResponseBody::Once")
                .field("len", &bytes.as_ref().map_or(0, Bytes::len))
                .finish(),
            Kind::Stream { declared_len, .. } => f
                .debug_struct("ResponseBody::Stream")
                .field("declared_len", declared_len)
                .finish(),
        }
    }
}

/// The receiving half of the body is gone: the client connection was dropped
/// before the transfer finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionLost;

impl fmt::Display for ConnectionLost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "connection lost before response body completed")
    }
}

impl std::error::Error for ConnectionLost {}

/// Write end of a streaming response body
#[derive(Debug)]
pub struct BodySink {
    sender: mpsc::Sender<Bytes>,
}

impl BodySink {
    /// Send one chunk; suspends until the transport has room for it
    pub async fn write(&mut self, chunk: Bytes) -> Result<(), ConnectionLost> {
        self.sender.send(chunk).await.map_err(|_| ConnectionLost)
    }

    /// Signal end of body
    pub async fn finish(&mut self) -> Result<(), ConnectionLost> {
        self.sender.close().await.map_err(|_| ConnectionLost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn check_send<T: Send>() {}

    #[test]
    fn is_send() {
        check_send::<ResponseBody>();
        check_send::<BodySink>();
    }

    #[tokio::test]
    async fn test_once_body() {
        let mut body = ResponseBody::once("hello");

        assert_eq!(body.size_hint().exact(), Some(5));
        assert!(!body.is_end_stream());

        let bytes = body.frame().await.unwrap().unwrap().into_data().unwrap();
        assert_eq!(bytes, Bytes::from("hello"));

        assert!(body.is_end_stream());
        assert!(body.frame().await.is_none());
    }

    #[tokio::test]
    async fn test_empty_body() {
        let mut body = ResponseBody::empty();
        assert_eq!(body.size_hint().exact(), Some(0));
        assert!(body.frame().await.is_none());
    }

    #[tokio::test]
    async fn test_channel_body_in_order() {
        let (mut sink, mut body) = ResponseBody::channel(6);
        assert_eq!(body.size_hint().exact(), Some(6));

        let producer = tokio::spawn(async move {
            sink.write(Bytes::from_static(b"ab")).await.unwrap();
            sink.write(Bytes::from_static(b"cd")).await.unwrap();
            sink.write(Bytes::from_static(b"ef")).await.unwrap();
            sink.finish().await.unwrap();
        });

        let mut collected = Vec::new();
        while let Some(frame) = body.frame().await {
            collected.extend_from_slice(&frame.unwrap().into_data().unwrap());
        }
        assert_eq!(collected, b"abcdef");

        producer.await.unwrap();
    }

    #[tokio::test]
    async fn test_dropped_receiver_fails_write() {
        let (mut sink, body) = ResponseBody::channel(100);
        drop(body);

        // One chunk may land in the channel slot before the loss surfaces
        let mut failed = false;
        for _ in 0..2 {
            if sink.write(Bytes::from_static(b"data")).await.is_err() {
                failed = true;
                break;
            }
        }
        assert!(failed);
    }
}
