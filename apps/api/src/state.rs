use std::sync::Arc;

use crate::generation::orchestrator::ResponseOrchestrator;
use crate::profiles::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Learner persistence. Default: PgProfileStore.
    pub profiles: Arc<dyn ProfileStore>,
    /// All generation goes through here; it holds the provider client.
    pub orchestrator: ResponseOrchestrator,
}
