//! Shared state handed to every request handler

use std::sync::Arc;

use crate::app::services::ingestion::IngestionOrchestrator;
use crate::app::services::storage::SqliteStore;
use crate::app::services::telemetry_parser::TelemetryParser;
use crate::config::{ObdConfig, QueryLimits};
use crate::error::Result;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SqliteStore>,
    pub orchestrator: Arc<IngestionOrchestrator>,
    pub query_limits: QueryLimits,
}

impl AppState {
    /// Build state around an already opened store
    pub fn new(config: &ObdConfig, store: Arc<SqliteStore>) -> Self {
        let orchestrator =
            IngestionOrchestrator::new(TelemetryParser::default(), store.clone(), config.upload);

        Self {
            store,
            orchestrator: Arc::new(orchestrator),
            query_limits: config.query,
        }
    }

    /// Open the configured database and build state around it
    pub fn open(config: &ObdConfig) -> Result<Self> {
        let store = SqliteStore::open(&config.database_path)?.with_session_ttl(config.session.ttl_secs);
        Ok(Self::new(config, Arc::new(store)))
    }
}
