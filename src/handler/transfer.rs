//! Chunked transfer module
//!
//! A [`ChunkedTransfer`] is the unit of work behind streaming delivery: each
//! [`advance`] call moves exactly one bounded chunk from the byte source to
//! the response sink. The runtime drives it to retirement via [`drive`]; the
//! send into the bounded body channel is the cooperative suspension point, so
//! a single large download never monopolizes the process.
//!
//! [`advance`]: ChunkedTransfer::advance
//! [`drive`]: ChunkedTransfer::drive

use bytes::Bytes;
use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::http::body::BodySink;
use crate::logger;

/// Identity of the request a transfer belongs to, carried for failure logs
#[derive(Debug, Clone)]
pub struct TransferContext {
    pub uri: String,
    pub remote: SocketAddr,
}

/// Where the chunks come from: a live file handle read on demand, or content
/// already in memory and pre-split
enum ChunkSource {
    File(File),
    Buffer(VecDeque<Bytes>),
}

/// Outcome of a single `advance` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStep {
    /// One chunk of the given length reached the sink
    Sent(usize),
    /// Source exhausted and the response finalized; retire the task
    Completed,
    /// Read or write failed; the transfer is abandoned, retire the task
    Failed,
}

/// An in-progress streaming transfer.
///
/// Emits every byte of the source exactly once, in order. Every chunk is
/// exactly the configured chunk size except the final one, which may be
/// shorter. Dropping the transfer closes the source on every exit path.
pub struct ChunkedTransfer {
    source: ChunkSource,
    sink: BodySink,
    chunk_size: usize,
    bytes_sent: u64,
    ctx: TransferContext,
}

impl ChunkedTransfer {
    /// Transfer from an already-open file handle
    pub fn new(file: File, sink: BodySink, chunk_size: usize, ctx: TransferContext) -> Self {
        Self {
            source: ChunkSource::File(file),
            sink,
            chunk_size,
            bytes_sent: 0,
            ctx,
        }
    }

    /// Transfer from in-memory content, pre-split into chunks without copying
    pub fn from_buffer(
        content: Bytes,
        sink: BodySink,
        chunk_size: usize,
        ctx: TransferContext,
    ) -> Self {
        let mut chunks = VecDeque::with_capacity(content.len().div_ceil(chunk_size.max(1)));
        let mut offset = 0;
        while offset < content.len() {
            let end = (offset + chunk_size).min(content.len());
            chunks.push_back(content.slice(offset..end));
            offset = end;
        }
        Self {
            source: ChunkSource::Buffer(chunks),
            sink,
            chunk_size,
            bytes_sent: 0,
            ctx,
        }
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    /// Move one chunk from source to sink.
    ///
    /// One bounded read and one bounded write; never blocks beyond those.
    pub async fn advance(&mut self) -> TransferStep {
        let chunk = match self.next_chunk().await {
            Ok(chunk) => chunk,
            Err(e) => {
                logger::log_transfer_failure(
                    &self.ctx.uri,
                    self.ctx.remote,
                    &format!("read failed: {e}"),
                );
                return TransferStep::Failed;
            }
        };

        if chunk.is_empty() {
            // End of data is terminal even if finalization fails
            if let Err(e) = self.sink.finish().await {
                logger::log_transfer_failure(&self.ctx.uri, self.ctx.remote, &e.to_string());
            }
            return TransferStep::Completed;
        }

        let len = chunk.len();
        match self.sink.write(chunk).await {
            Ok(()) => {
                self.bytes_sent += len as u64;
                TransferStep::Sent(len)
            }
            Err(e) => {
                logger::log_transfer_failure(&self.ctx.uri, self.ctx.remote, &e.to_string());
                TransferStep::Failed
            }
        }
    }

    /// Drive the transfer to retirement.
    ///
    /// No retry, no partial re-send: delivery is at-most-once per chunk. The
    /// source is released when this returns, whatever the outcome.
    pub async fn drive(mut self) {
        loop {
            match self.advance().await {
                TransferStep::Sent(_) => {}
                TransferStep::Completed | TransferStep::Failed => break,
            }
        }
    }

    /// Read the next chunk; empty means the source is exhausted.
    ///
    /// File reads are filled to the chunk size (short reads retried within
    /// the bound) so only the final chunk can be shorter.
    async fn next_chunk(&mut self) -> io::Result<Bytes> {
        match &mut self.source {
            ChunkSource::File(file) => {
                let mut buf = vec![0u8; self.chunk_size];
                let mut filled = 0;
                while filled < self.chunk_size {
                    let n = file.read(&mut buf[filled..]).await?;
                    if n == 0 {
                        break;
                    }
                    filled += n;
                }
                buf.truncate(filled);
                Ok(Bytes::from(buf))
            }
            ChunkSource::Buffer(chunks) => Ok(chunks.pop_front().unwrap_or_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::body::ResponseBody;
    use http_body_util::BodyExt;

    fn test_ctx() -> TransferContext {
        TransferContext {
            uri: "/test".to_string(),
            remote: "127.0.0.1:9999".parse().unwrap(),
        }
    }

    fn patterned(len: usize) -> Bytes {
        (0..len).map(|i| (i % 251) as u8).collect::<Vec<u8>>().into()
    }

    async fn collect_frames(mut body: ResponseBody) -> Vec<Bytes> {
        let mut frames = Vec::new();
        while let Some(frame) = body.frame().await {
            frames.push(frame.unwrap().into_data().unwrap());
        }
        frames
    }

    #[tokio::test]
    async fn test_buffer_transfer_reproduces_content() {
        let content = patterned(150_000);
        let (sink, body) = ResponseBody::channel(content.len() as u64);
        let transfer = ChunkedTransfer::from_buffer(content.clone(), sink, 65_536, test_ctx());

        let driver = tokio::spawn(transfer.drive());
        let frames = collect_frames(body).await;
        driver.await.unwrap();

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].len(), 65_536);
        assert_eq!(frames[1].len(), 65_536);
        assert_eq!(frames[2].len(), 150_000 - 2 * 65_536);

        let mut collected = Vec::new();
        for frame in &frames {
            collected.extend_from_slice(frame);
        }
        assert_eq!(Bytes::from(collected), content);
    }

    #[tokio::test]
    async fn test_file_transfer_reproduces_content() {
        let content = patterned(40_000);
        let path = std::env::temp_dir().join("staticd-transfer-file-test.bin");
        std::fs::write(&path, &content).unwrap();

        let file = File::open(&path).await.unwrap();
        let (sink, body) = ResponseBody::channel(content.len() as u64);
        let transfer = ChunkedTransfer::new(file, sink, 16_384, test_ctx());

        let driver = tokio::spawn(transfer.drive());
        let frames = collect_frames(body).await;
        driver.await.unwrap();

        // All chunks at the configured size except the final one
        assert_eq!(frames.len(), 3);
        assert!(frames[..2].iter().all(|f| f.len() == 16_384));
        assert_eq!(frames[2].len(), 40_000 - 2 * 16_384);

        let mut collected = Vec::new();
        for frame in &frames {
            collected.extend_from_slice(frame);
        }
        assert_eq!(Bytes::from(collected), content);

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_exact_multiple_of_chunk_size() {
        let content = patterned(32_768);
        let (sink, body) = ResponseBody::channel(content.len() as u64);
        let transfer = ChunkedTransfer::from_buffer(content, sink, 16_384, test_ctx());

        let driver = tokio::spawn(transfer.drive());
        let frames = collect_frames(body).await;
        driver.await.unwrap();

        assert_eq!(frames.len(), 2);
        assert!(frames.iter().all(|f| f.len() == 16_384));
    }

    #[tokio::test]
    async fn test_empty_source_completes_immediately() {
        let (sink, body) = ResponseBody::channel(0);
        let mut transfer = ChunkedTransfer::from_buffer(Bytes::new(), sink, 16_384, test_ctx());

        assert_eq!(transfer.advance().await, TransferStep::Completed);
        assert_eq!(transfer.bytes_sent(), 0);
        assert!(collect_frames(body).await.is_empty());
    }

    #[tokio::test]
    async fn test_dropped_connection_fails_transfer() {
        let content = patterned(100_000);
        let (sink, body) = ResponseBody::channel(content.len() as u64);
        let mut transfer = ChunkedTransfer::from_buffer(content, sink, 16_384, test_ctx());
        drop(body);

        let mut outcome = TransferStep::Sent(0);
        for _ in 0..8 {
            outcome = transfer.advance().await;
            if outcome == TransferStep::Failed {
                break;
            }
        }
        assert_eq!(outcome, TransferStep::Failed);
    }

    #[tokio::test]
    async fn test_bytes_sent_counter() {
        let content = patterned(20_000);
        let (sink, body) = ResponseBody::channel(content.len() as u64);
        let transfer = ChunkedTransfer::from_buffer(content, sink, 16_384, test_ctx());

        let driver = tokio::spawn(async move {
            let mut transfer = transfer;
            while let TransferStep::Sent(_) = transfer.advance().await {}
            transfer.bytes_sent()
        });
        let _ = collect_frames(body).await;
        assert_eq!(driver.await.unwrap(), 20_000);
    }
}
