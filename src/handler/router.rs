//! Request routing dispatch module
//!
//! Entry point for request processing: shutdown special-casing, the root
//! rewrite, path resolution, and dispatch to directory listing, buffered
//! delivery or chunked streaming. Every request ends in exactly one terminal
//! response; no failure escapes past this boundary.

use crate::config::AppState;
use crate::handler::listing;
use crate::handler::transfer::{ChunkedTransfer, TransferContext};
use crate::http::path::{self, ResolvedTarget, TargetKind};
use crate::http::{self, mime, ResponseBody};
use crate::logger::{self, AccessLogEntry};
use bytes::Bytes;
use hyper::{Request, Response};
use percent_encoding::percent_decode_str;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Request context encapsulating what the handlers need from the transport
pub struct RequestContext {
    /// Request URI as received
    pub raw_uri: String,
    /// URI path component, undecoded
    pub path: String,
    /// Percent-decoded path, used for the shutdown check
    pub decoded_path: String,
    /// Peer identity, carried into transfer failure logs
    pub remote: SocketAddr,
}

impl RequestContext {
    pub fn new(raw_uri: String, path: String, remote: SocketAddr) -> Self {
        let decoded_path = percent_decode_str(&path).decode_utf8_lossy().into_owned();
        Self {
            raw_uri,
            path,
            decoded_path,
            remote,
        }
    }
}

/// Main entry point, adapting the hyper service contract
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    remote: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<ResponseBody>, Infallible> {
    let ctx = RequestContext::new(
        req.uri().to_string(),
        req.uri().path().to_string(),
        remote,
    );

    if state.cached_access_log.load(Ordering::Relaxed) {
        let entry = AccessLogEntry::new(remote, req.method().to_string(), ctx.raw_uri.clone());
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(route_request(&ctx, &state).await)
}

/// Produce the single terminal response for a request
pub async fn route_request(ctx: &RequestContext, state: &Arc<AppState>) -> Response<ResponseBody> {
    let server_name = &state.config.http.server_name;

    // 1. Operator shutdown URI, checked against the decoded path
    if let Some(shutdown_path) = &state.config.server.shutdown_path {
        if &ctx.decoded_path == shutdown_path {
            state.request_shutdown();
            return http::build_shutdown_response(server_name);
        }
    }

    // 2. Root rewrite: `/` becomes the index file when it exists
    let index_file = &state.config.http.index_file;
    let effective_path = if ctx.path == "/" && state.document_root.join(index_file).is_file() {
        format!("/{index_file}")
    } else {
        ctx.path.clone()
    };

    // 3. Resolve against the document root
    let target = path::resolve(&state.document_root, &effective_path);

    match target.kind {
        TargetKind::Directory => serve_directory(ctx, &target, server_name),
        TargetKind::Missing => http::build_not_found_response(server_name),
        TargetKind::File => serve_file(ctx, &target, state).await,
    }
}

/// Directory target: render the listing page
fn serve_directory(
    ctx: &RequestContext,
    target: &ResolvedTarget,
    server_name: &str,
) -> Response<ResponseBody> {
    match listing::render(&ctx.path, &target.parent_url, &target.absolute) {
        Ok(page) => http::build_html_response(page),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to list directory '{}': {e}",
                target.absolute.display()
            ));
            http::build_server_error_response(server_name)
        }
    }
}

/// File target: pick buffered or streaming delivery by size and MIME class
async fn serve_file(
    ctx: &RequestContext,
    target: &ResolvedTarget,
    state: &Arc<AppState>,
) -> Response<ResponseBody> {
    let server_name = &state.config.http.server_name;
    let content_type =
        mime::content_type_for(target.absolute.extension().and_then(|e| e.to_str()));

    let file_size = match tokio::fs::metadata(&target.absolute).await {
        Ok(meta) => meta.len(),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to stat '{}': {e}",
                target.absolute.display()
            ));
            return http::build_server_error_response(server_name);
        }
    };

    let streaming = &state.config.streaming;
    if file_size < streaming.threshold {
        // Audio and video stream even when small, so a client that consumes
        // media slowly while buffering does not stall the sender
        if mime::is_streamable_media(content_type) {
            deliver_from_memory(ctx, target, state, content_type, file_size).await
        } else {
            deliver_buffered(target, server_name, content_type, file_size).await
        }
    } else {
        deliver_streamed(ctx, target, state, content_type, file_size).await
    }
}

/// Whole file in a single write
async fn deliver_buffered(
    target: &ResolvedTarget,
    server_name: &str,
    content_type: &'static str,
    file_size: u64,
) -> Response<ResponseBody> {
    match tokio::fs::read(&target.absolute).await {
        Ok(content) => {
            http::build_file_response(ResponseBody::once(content), content_type, file_size)
        }
        Err(e) => {
            logger::log_error(&format!(
                "Reading file '{}' failed: {e}",
                target.absolute.display()
            ));
            http::build_server_error_response(server_name)
        }
    }
}

/// Whole file read up front, then streamed from the pre-split buffer
async fn deliver_from_memory(
    ctx: &RequestContext,
    target: &ResolvedTarget,
    state: &Arc<AppState>,
    content_type: &'static str,
    file_size: u64,
) -> Response<ResponseBody> {
    match tokio::fs::read(&target.absolute).await {
        Ok(content) => {
            let (sink, body) = ResponseBody::channel(file_size);
            let transfer = ChunkedTransfer::from_buffer(
                Bytes::from(content),
                sink,
                state.config.streaming.buffer_chunk_size,
                transfer_context(ctx),
            );
            tokio::task::spawn(transfer.drive());
            http::build_file_response(body, content_type, file_size)
        }
        Err(e) => {
            logger::log_error(&format!(
                "Reading file '{}' failed: {e}",
                target.absolute.display()
            ));
            http::build_server_error_response(&state.config.http.server_name)
        }
    }
}

/// Live file handle, streamed chunk by chunk until retirement
async fn deliver_streamed(
    ctx: &RequestContext,
    target: &ResolvedTarget,
    state: &Arc<AppState>,
    content_type: &'static str,
    file_size: u64,
) -> Response<ResponseBody> {
    match tokio::fs::File::open(&target.absolute).await {
        Ok(file) => {
            let (sink, body) = ResponseBody::channel(file_size);
            let transfer = ChunkedTransfer::new(
                file,
                sink,
                state.config.streaming.file_chunk_size,
                transfer_context(ctx),
            );
            tokio::task::spawn(transfer.drive());
            http::build_file_response(body, content_type, file_size)
        }
        Err(e) => {
            logger::log_error(&format!(
                "Opening file '{}' failed: {e}",
                target.absolute.display()
            ));
            http::build_server_error_response(&state.config.http.server_name)
        }
    }
}

fn transfer_context(ctx: &RequestContext) -> TransferContext {
    TransferContext {
        uri: ctx.raw_uri.clone(),
        remote: ctx.remote,
    }
}
