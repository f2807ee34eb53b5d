//! Error taxonomy for the core (§7 of the scheduling contract).

use thiserror::Error;

/// Errors the core can surface. Maps roughly onto §7's numbered taxonomy;
/// timeout and "infeasible but non-empty" are not errors -- they're
/// [`super::driver::Outcome`] variants, not `Result::Err`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// §7.1 -- invalid preferences, rejected before the search starts.
    #[error("invalid preferences: {0}")]
    InvalidPreferences(String),

    /// §6 -- `courses` was empty or `K` was not positive.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// §7 propagation policy -- the catalog collaborator failed outright.
    #[error("catalog lookup failed: {0}")]
    CatalogFailed(String),

    /// §7.5 -- an internal invariant was violated (e.g. the top-K buffer
    /// exceeded its capacity). This should never happen; if it does, the
    /// request fails rather than returning a quietly-wrong answer.
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

/// Catalog adapter failure, surfaced by [`super::catalog::SectionRepository`].
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("backing store failed: {0}")]
    Backend(String),
}
