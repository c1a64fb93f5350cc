use std::sync::Arc;

use crate::analysis::Analyzer;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Loaded models and collaborators. Immutable after startup, shared read-only.
    pub analyzer: Arc<Analyzer>,
    pub config: Config,
}
