// Configuration module entry point
// Layers config.toml, SERVER_* environment variables and hard defaults

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, ServerConfig, StreamingConfig};

impl Config {
    /// Load configuration from "config.toml" in the working directory
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER").separator("__"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.document_root", "/var/www/html")?
            .set_default("server.shutdown_path", "/shutdown")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "plain")?
            .set_default("streaming.threshold", 1_048_576)? // 1 MiB
            .set_default("streaming.file_chunk_size", 16_384)? // 16 KiB
            .set_default("streaming.buffer_chunk_size", 65_536)? // 64 KiB
            .set_default("http.server_name", "staticd web server")?
            .set_default("http.index_file", "index.html")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Apply the document-root override from the first startup argument
    pub fn apply_root_override(&mut self, root: Option<String>) {
        if let Some(root) = root {
            self.server.document_root = root;
        }
    }

    /// Baseline configuration for unit tests
    #[cfg(test)]
    pub fn default_for_tests() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                workers: None,
                document_root: std::env::temp_dir().display().to_string(),
                shutdown_path: Some("/shutdown".to_string()),
            },
            logging: LoggingConfig {
                access_log: false,
                access_log_format: "plain".to_string(),
                access_log_file: None,
                error_log_file: None,
            },
            streaming: StreamingConfig {
                threshold: 1_048_576,
                file_chunk_size: 16_384,
                buffer_chunk_size: 65_536,
            },
            http: HttpConfig {
                server_name: "staticd web server".to_string(),
                index_file: "index.html".to_string(),
            },
        }
    }
}
