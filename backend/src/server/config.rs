//! HTTP server configuration object and helpers.

use wiki_history::charts::ChartStyle;
use wiki_history::outbound::persistence::DbPool;
use wiki_history::settings::ServerSettings;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) db_pool: DbPool,
    pub(crate) chart_style: ChartStyle,
}

impl ServerConfig {
    /// Construct a configuration from loaded settings and an open pool.
    #[must_use]
    pub fn new(settings: &ServerSettings, db_pool: DbPool) -> Self {
        Self {
            host: settings.host().to_owned(),
            port: settings.port(),
            db_pool,
            chart_style: ChartStyle::default(),
        }
    }
}
