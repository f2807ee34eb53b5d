//! C1 -- catalog adapter: the contract the core uses to load sections.
//!
//! Persistent storage of sections and meeting times is an out-of-scope
//! collaborator (§1). This module defines only the interface the core
//! depends on (`SectionRepository`) plus the grouped-by-course shape C4
//! consumes. [`memory`] ships the one concrete implementation used by tests
//! and the demo binary -- a `HashMap`-backed in-memory store, standing in
//! for whatever real repository (Postgres, etc.) a deployment wires up.

pub mod memory;

use std::collections::HashMap;

use async_trait::async_trait;

use super::error::CatalogError;
use super::model::{CourseCode, Section};

/// Sections grouped by course, plus the subset of requested courses that
/// had zero sections (§4.1).
#[derive(Debug, Clone, Default)]
pub struct CatalogFetch {
    pub sections_by_course: HashMap<CourseCode, Vec<Section>>,
    pub missing: Vec<CourseCode>,
}

/// The collaborator contract C1 depends on (§4.1, §6).
///
/// Implementations must be a pure lookup with no side effects on the
/// catalog, and must return every section that advertises membership in
/// any requested course in a single bulk call.
#[async_trait]
pub trait SectionRepository: Send + Sync {
    async fn fetch(&self, courses: &[CourseCode]) -> Result<CatalogFetch, CatalogError>;
}

/// Deduplicate requested course codes (duplicates collapse per §6) while
/// preserving first-seen order, then fetch via the repository.
pub async fn load_catalog(
    repo: &dyn SectionRepository,
    courses: &[CourseCode],
) -> Result<CatalogFetch, CatalogError> {
    let mut seen = std::collections::HashSet::new();
    let deduped: Vec<CourseCode> = courses
        .iter()
        .filter(|c| seen.insert((*c).clone()))
        .cloned()
        .collect();
    repo.fetch(&deduped).await
}

#[cfg(test)]
mod tests {
    use super::memory::InMemorySectionRepository;
    use super::*;

    #[tokio::test]
    async fn load_catalog_deduplicates_requested_courses() {
        let repo = InMemorySectionRepository::new();
        let courses = vec![
            CourseCode::new("CS-1000"),
            CourseCode::new("CS-1000"),
            CourseCode::new("MATH-2000"),
        ];
        let fetch = load_catalog(&repo, &courses).await.unwrap();
        // Both are missing (empty repo), but only once each.
        assert_eq!(fetch.missing.len(), 2);
    }
}
