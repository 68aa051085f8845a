//! Shared application state injected into every handler

use asset_index::AssetIndex;
use chrono::{DateTime, Utc};
use policy_engine::PolicyEngine;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: PolicyEngine,
    pub assets: Arc<AssetIndex>,
    pub config_secret: Option<Arc<str>>,
    /// Deployed build reported by the healthcheck
    pub version: Arc<str>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(engine: PolicyEngine, assets: AssetIndex, config_secret: Option<String>) -> Self {
        Self {
            engine,
            assets: Arc::new(assets),
            config_secret: config_secret.map(Arc::from),
            version: Arc::from(updraft_core::VERSION),
            started_at: Utc::now(),
        }
    }

    pub fn with_version(mut self, version: impl Into<Arc<str>>) -> Self {
        self.version = version.into();
        self
    }
}
