//! staticd, an asynchronous static file server.
//!
//! Resolves request paths safely under a document root, renders directory
//! listings, and delivers files either buffered or as a cooperative chunked
//! stream driven by the tokio runtime.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
