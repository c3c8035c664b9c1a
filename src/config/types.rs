// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub streaming: StreamingConfig,
    pub http: HttpConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    /// Directory all request paths are resolved under
    pub document_root: String,
    /// Reserved URI that shuts the server down; checked against the decoded
    /// request path. None disables the check.
    pub shutdown_path: Option<String>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// Access log format (plain, common, json)
    pub access_log_format: String,
    /// Access log file path (stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Streaming delivery configuration
///
/// Files at or above `threshold` bytes are streamed chunk by chunk instead of
/// buffered whole. Audio/video below the threshold streams from a pre-split
/// in-memory buffer in `buffer_chunk_size` chunks; live file handles stream
/// in `file_chunk_size` chunks.
#[derive(Debug, Deserialize, Clone)]
pub struct StreamingConfig {
    pub threshold: u64,
    pub file_chunk_size: usize,
    pub buffer_chunk_size: usize,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Name printed in the address line of generated error pages
    pub server_name: String,
    /// File served in place of a bare `/` request when it exists
    pub index_file: String,
}
