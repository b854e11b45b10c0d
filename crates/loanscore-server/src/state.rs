use std::sync::Arc;

use loanscore_config::Settings;
use loanscore_core::ScoringArtifact;

/// Shared, read-only server context.
pub struct AppState {
    pub artifact: Arc<dyn ScoringArtifact>,
    pub settings: Settings,
}

impl AppState {
    pub fn new(artifact: Arc<dyn ScoringArtifact>, settings: Settings) -> Self {
        Self { artifact, settings }
    }
}
