use stackset_core::StackSetService;
use std::sync::Arc;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<StackSetService>,
}

impl AppState {
    pub fn new(service: Arc<StackSetService>) -> Self {
        Self { service }
    }
}
