//! HTTP protocol layer module
//!
//! Protocol-level building blocks shared by the request handlers: path
//! resolution, MIME lookup, response bodies and status-page builders.

pub mod body;
pub mod mime;
pub mod path;
pub mod response;

// Re-export commonly used types
pub use body::{BodySink, ConnectionLost, ResponseBody};
pub use path::{ResolvedTarget, TargetKind};
pub use response::{
    build_file_response, build_html_response, build_not_found_response,
    build_server_error_response, build_shutdown_response,
};
