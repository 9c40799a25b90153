use crate::model::ModelManager;

/// Shared by every handler; cloning only bumps the pool's refcount.
#[derive(Debug, Clone)]
pub struct AppState {
    mm: ModelManager,
}

impl AppState {
    pub fn new(mm: ModelManager) -> Self {
        Self { mm }
    }

    pub fn mm(&self) -> &ModelManager {
        &self.mm
    }
}
