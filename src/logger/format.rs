//! Access log format module
//!
//! Supported formats:
//! - `plain`: `[DD.MM.YYYY HH:MM:SS] 'URI' from addr:port`
//! - `common` (Common Log Format - CLF)
//! - `json` (JSON structured logging)

use chrono::Local;
use std::net::SocketAddr;

/// Access log entry containing request/response information
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client IP address
    pub remote_addr: String,
    /// Client port
    pub remote_port: u16,
    /// Request timestamp
    pub time: chrono::DateTime<Local>,
    /// HTTP method
    pub method: String,
    /// Raw request URI
    pub path: String,
    /// Response status code
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(remote: SocketAddr, method: String, path: String) -> Self {
        Self {
            remote_addr: remote.ip().to_string(),
            remote_port: remote.port(),
            time: Local::now(),
            method,
            path,
            status: 200,
            body_bytes: 0,
        }
    }

    /// Format the log entry according to the specified format
    pub fn format(&self, format: &str) -> String {
        match format {
            "common" => self.format_common(),
            "json" => self.format_json(),
            _ => self.format_plain(),
        }
    }

    /// `[DD.MM.YYYY HH:MM:SS] 'URI' from addr:port`
    fn format_plain(&self) -> String {
        format!(
            "[{}] '{}' from {}:{}",
            self.time.format("%d.%m.%Y %H:%M:%S"),
            self.path,
            self.remote_addr,
            self.remote_port,
        )
    }

    /// Common Log Format (CLF)
    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} HTTP/1.1\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.path,
            self.status,
            self.body_bytes,
        )
    }

    /// JSON structured log format
    fn format_json(&self) -> String {
        format!(
            r#"{{"remote_addr":"{}","remote_port":{},"time":"{}","method":"{}","path":"{}","status":{},"body_bytes":{}}}"#,
            escape_json(&self.remote_addr),
            self.remote_port,
            self.time.to_rfc3339(),
            escape_json(&self.method),
            escape_json(&self.path),
            self.status,
            self.body_bytes,
        )
    }
}

/// Escape special characters for JSON string
fn escape_json(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}
