//! Logger module
//!
//! Logging utilities for the server: lifecycle messages, access entries in
//! selectable formats, and error reporting. Before `init` runs, everything
//! falls back to stdout/stderr.

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Server started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!(
        "Document root: {}",
        config.server.document_root
    ));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.server.shutdown_path {
        write_info(&format!("Shutdown URI: {path}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

/// A streaming transfer was abandoned mid-flight
pub fn log_transfer_failure(uri: &str, remote: SocketAddr, cause: &str) {
    write_error(&format!(
        "[{}] DATA TRANSFER FAILURE. '{}' from {}:{}. {}",
        chrono::Local::now().format("%d.%m.%Y %H:%M:%S"),
        uri,
        remote.ip(),
        remote.port(),
        cause,
    ));
}

pub fn log_shutdown() {
    write_info("Server was shutdown");
}
