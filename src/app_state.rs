use crate::artifacts::Artifacts;
use crate::error::ApiError;
use std::sync::Arc;

/// Service context handed to every request.
///
/// `Ready` is terminal: once artifacts are loaded they are shared read-only
/// for the life of the process. `Unready` rejects every prediction.
#[derive(Debug, Clone, Default)]
pub enum AppState {
    #[default]
    Unready,
    Ready(Arc<Artifacts>),
}

impl AppState {
    pub fn ready(artifacts: Artifacts) -> Self {
        AppState::Ready(Arc::new(artifacts))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, AppState::Ready(_))
    }

    pub fn artifacts(&self) -> Result<&Artifacts, ApiError> {
        match self {
            AppState::Ready(artifacts) => Ok(artifacts),
            AppState::Unready => Err(ApiError::NotLoaded),
        }
    }
}
