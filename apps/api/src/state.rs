use std::sync::Arc;

use crate::config::Config;
use crate::resume::pipeline::ResumeParser;
use crate::store::KeyValueStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub parser: Arc<ResumeParser>,
    /// Keyed record store. Memory-backed unless `REDIS_URL` is set.
    pub store: Arc<dyn KeyValueStore>,
    pub config: Config,
}
