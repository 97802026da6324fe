//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI arguments, `WIKI_HISTORY_*` environment variables and
//! an optional configuration file. The record store location is not part of
//! these settings; the server always reads the default database path.

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Default bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default bind port.
pub const DEFAULT_PORT: u16 = 8000;

/// Listener configuration for the HTTP server.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WIKI_HISTORY")]
pub struct ServerSettings {
    /// Interface to bind.
    #[ortho_config(default = String::from(DEFAULT_HOST))]
    pub host: Option<String>,
    /// TCP port to bind.
    #[ortho_config(default = DEFAULT_PORT)]
    pub port: Option<u16>,
}

impl ServerSettings {
    /// Return the configured host, falling back to loopback.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Return the configured port, falling back to 8000.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Address tuple accepted by `HttpServer::bind`.
    pub fn bind_address(&self) -> (&str, u16) {
        (self.host(), self.port())
    }
}
