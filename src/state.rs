//! Application state shared across the web layer.

use std::sync::Arc;
use std::time::Duration;

use crate::core::catalog::SectionRepository;

/// Everything a request handler needs: the catalog collaborator and the
/// search parameters the core doesn't hardcode (deadline, `K` bounds).
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn SectionRepository>,
    pub search_deadline: Duration,
    pub default_k: usize,
    pub max_k: usize,
}

impl AppState {
    pub fn new(
        repo: Arc<dyn SectionRepository>,
        search_deadline: Duration,
        default_k: usize,
        max_k: usize,
    ) -> Self {
        Self {
            repo,
            search_deadline,
            default_k,
            max_k,
        }
    }
}
