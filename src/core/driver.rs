//! C5 -- the search driver: runs the enumerator under a wall-clock deadline
//! and returns a ranked list or a timeout outcome (§4.5).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::catalog::{self, SectionRepository};
use super::enumerator::Enumerator;
use super::error::CoreError;
use super::model::{Break, CourseCode, Preferences, ScoredSchedule};
use super::scorer::Scorer;
use super::topk::TopKBuffer;

/// Result of a bounded search (§4.5).
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Complete: at most `K` schedules, descending score, no repeated scores.
    Ranked {
        schedules: Vec<ScoredSchedule>,
        /// Total complete schedules considered before duplicate suppression
        /// (§9 Design Notes, §C of the service-level spec).
        considered: u64,
        /// Requested courses the catalog reported as having zero sections.
        missing: Vec<CourseCode>,
    },
    /// The wall-clock deadline elapsed before enumeration completed. Any
    /// partial top-K content is discarded, matching the source's base
    /// contract (§4.5).
    TimedOut,
}

/// Bounds a search's wall-clock budget (§4.5 Deadline).
pub struct SearchDriver {
    deadline: Duration,
}

impl SearchDriver {
    /// Default deadline per §4.5 -- 90 seconds.
    pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(90);

    pub fn new(deadline: Duration) -> Self {
        Self { deadline }
    }

    /// Run a complete search: load the catalog, enumerate under the
    /// deadline, and drain the top-K buffer in descending order.
    ///
    /// The enumerator (a synchronous, CPU-bound DFS) runs on a blocking
    /// thread so the deadline is enforced by aborting the await rather than
    /// blocking the async runtime's reactor (§A of the service-level spec).
    /// Only the cancellation flag and the final result cross that boundary,
    /// per §4.5's concurrency model.
    pub async fn generate(
        &self,
        repo: &dyn SectionRepository,
        courses: &[CourseCode],
        breaks: Vec<Break>,
        preferences: Preferences,
        k: usize,
    ) -> Result<Outcome, CoreError> {
        let fetch = catalog::load_catalog(repo, courses)
            .await
            .map_err(|e| CoreError::CatalogFailed(e.to_string()))?;
        let missing = fetch.missing;
        let sections_by_course = fetch.sections_by_course;

        // §7 error taxonomy #2 / §8 "Empty handling": every requested course
        // came back missing, so there is nothing to enumerate -- not the
        // zero-courses-requested edge case the enumerator special-cases.
        // Short-circuit before spawning the search so it never falls into
        // that branch and fabricates a single empty-schedule result.
        if !courses.is_empty() && sections_by_course.is_empty() {
            debug!(missing = missing.len(), "every requested course is missing from the catalog");
            return Ok(Outcome::Ranked {
                schedules: Vec::new(),
                considered: 0,
                missing,
            });
        }

        let stop_flag = Arc::new(AtomicBool::new(false));
        let worker_flag = Arc::clone(&stop_flag);

        let search = tokio::task::spawn_blocking(move || {
            run_search(sections_by_course, breaks, preferences, k, worker_flag)
        });

        tokio::select! {
            result = search => {
                let (schedules, considered) = result.map_err(|e| {
                    CoreError::Invariant(format!("search task panicked: {e}"))
                })?;
                debug!(considered, k, "search completed within deadline");
                Ok(Outcome::Ranked {
                    schedules,
                    considered,
                    missing,
                })
            }
            _ = tokio::time::sleep(self.deadline) => {
                stop_flag.store(true, Ordering::SeqCst);
                warn!(deadline_ms = self.deadline.as_millis() as u64, "search deadline elapsed");
                Ok(Outcome::TimedOut)
            }
        }
    }
}

/// Run the enumerator to completion (or cancellation) and drain its buffer.
/// Pure and synchronous -- the only shared state crossing the blocking
/// boundary is `stop_flag`.
fn run_search(
    sections_by_course: HashMap<CourseCode, Vec<super::model::Section>>,
    breaks: Vec<Break>,
    preferences: Preferences,
    k: usize,
    stop_flag: Arc<AtomicBool>,
) -> (Vec<ScoredSchedule>, u64) {
    let scorer = Scorer::new(preferences);
    let mut topk = TopKBuffer::new(k);
    let enumerator = Enumerator::new(sections_by_course, &breaks, &scorer);
    let should_stop = || stop_flag.load(Ordering::SeqCst);
    let considered = enumerator.enumerate(&mut topk, &should_stop);
    (topk.drain_sorted(), considered)
}
