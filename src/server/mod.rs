//! Server loop module
//!
//! Accepts connections and serves each over HTTP/1.1 until shutdown is
//! requested, either by a termination signal or by the operator URI.

pub mod listener;
pub mod signal;

pub use listener::create_reusable_listener;

use crate::config::AppState;
use crate::handler;
use crate::logger;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};

/// Accept and dispatch connections until shutdown is requested
pub async fn run(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    loop {
        if state.shutdown_requested() {
            break;
        }
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer_addr)) => {
                        serve_connection(stream, peer_addr, Arc::clone(&state));
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }
            () = state.shutdown.notified() => break,
        }
    }

    // Brief drain so the response that carried the shutdown page can flush
    tokio::time::sleep(Duration::from_millis(100)).await;
    Ok(())
}

/// Serve a single connection in a spawned task
fn serve_connection(stream: TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    tokio::task::spawn(async move {
        let io = TokioIo::new(stream);
        let conn = http1::Builder::new().serve_connection(
            io,
            service_fn(move |req| {
                handler::handle_request(req, peer_addr, Arc::clone(&state))
            }),
        );
        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }
    });
}
