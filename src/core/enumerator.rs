//! C4 -- the enumerator: bounded depth-first search over the product of
//! per-course section lists, with incremental conflict pruning (§4.4).

use std::collections::BTreeMap;

use super::model::{Break, CourseCode, Crn, MeetingTime, Section};
use super::scorer::Scorer;
use super::topk::TopKBuffer;

/// One course's candidate sections, pre-sorted by `crn` ascending for a
/// deterministic branch order (§4.4's "any deterministic order suffices").
struct CourseBranch {
    course: CourseCode,
    sections: Vec<Section>,
}

/// Depth-first enumerator over courses ordered by ascending branching
/// factor (§4.4 Preprocessing step 1) -- this concentrates pruning early
/// and is load-bearing for the enumeration, not just a perf tweak.
pub struct Enumerator<'a> {
    branches: Vec<CourseBranch>,
    breaks: &'a [Break],
    scorer: &'a Scorer,
}

impl<'a> Enumerator<'a> {
    pub fn new(
        sections_by_course: std::collections::HashMap<CourseCode, Vec<Section>>,
        breaks: &'a [Break],
        scorer: &'a Scorer,
    ) -> Self {
        let mut branches: Vec<CourseBranch> = sections_by_course
            .into_iter()
            .map(|(course, mut sections)| {
                sections.sort_by_key(|s| s.crn);
                CourseBranch { course, sections }
            })
            .collect();
        // Ascending by section count -- smallest branching first. The
        // course code breaks ties: `sections_by_course` arrives as a
        // `HashMap`, whose iteration order is randomized per-instance, so
        // without a secondary key courses with equal section counts would
        // process in a different order on every call with the same input,
        // and the branch order is what decides which same-scoring schedule
        // wins the top-K buffer's duplicate-score suppression (§8
        // Determinism).
        branches.sort_by(|a, b| {
            a.sections
                .len()
                .cmp(&b.sections.len())
                .then_with(|| a.course.cmp(&b.course))
        });
        Self {
            branches,
            breaks,
            scorer,
        }
    }

    /// Run the search, offering every complete feasible schedule to `topk`.
    /// Returns the number of complete schedules considered (pre dedup/
    /// suppression, per §4.4's contract), checking `should_stop` on entry
    /// to every recursive expansion and before every offer (§5).
    pub fn enumerate(
        &self,
        topk: &mut TopKBuffer,
        should_stop: &dyn Fn() -> bool,
    ) -> u64 {
        // §4.4 empty-course edge case: zero requested courses yields exactly
        // one complete schedule, the empty one.
        if self.branches.is_empty() {
            if should_stop() {
                return 0;
            }
            let score = self.scorer.score(&[]);
            topk.offer(super::model::ScoredSchedule {
                score,
                crns: BTreeMap::new(),
                meetings: BTreeMap::new(),
            });
            return 1;
        }

        let mut state = SearchState {
            crns: BTreeMap::new(),
            meetings: BTreeMap::new(),
            flat: Vec::new(),
            considered: 0,
        };
        self.dfs(0, &mut state, topk, should_stop);
        state.considered
    }

    fn dfs(
        &self,
        course_index: usize,
        state: &mut SearchState,
        topk: &mut TopKBuffer,
        should_stop: &dyn Fn() -> bool,
    ) {
        if should_stop() {
            return;
        }

        if course_index == self.branches.len() {
            state.considered += 1;
            if should_stop() {
                return;
            }
            let score = self.scorer.score(&state.flat);
            topk.offer(super::model::ScoredSchedule {
                score,
                crns: state.crns.clone(),
                meetings: state.meetings.clone(),
            });
            return;
        }

        let branch = &self.branches[course_index];
        for section in &branch.sections {
            if should_stop() {
                return;
            }
            if !self.is_compatible(&section.meetings, &state.flat) {
                continue;
            }

            state.crns.insert(branch.course.clone(), section.crn);
            state
                .meetings
                .insert(section.crn, section.meetings.clone());
            let placed = state.flat.len();
            state.flat.extend(section.meetings.iter().copied());

            self.dfs(course_index + 1, state, topk, should_stop);

            state.flat.truncate(placed);
            state.meetings.remove(&section.crn);
            state.crns.remove(&branch.course);
        }
    }

    /// A candidate section's meetings are compatible iff every one of them
    /// is compatible with every already-placed meeting and every break
    /// (§4.4 Compatibility).
    fn is_compatible(&self, candidate: &[MeetingTime], placed: &[MeetingTime]) -> bool {
        for new_meeting in candidate {
            for existing in placed {
                if new_meeting.conflicts_with(existing) {
                    return false;
                }
            }
            for brk in self.breaks {
                if new_meeting.starts_within_break(brk) {
                    return false;
                }
            }
        }
        true
    }
}

/// Mutable DFS stack state -- the partial map is mutated and restored on
/// backtrack rather than copied; only the value offered to the buffer is
/// cloned (§4.4 Search).
struct SearchState {
    crns: BTreeMap<CourseCode, Crn>,
    meetings: BTreeMap<Crn, Vec<MeetingTime>>,
    flat: Vec<MeetingTime>,
    considered: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{DaySet, Preferences, PreferredTime, TimeOfDay};
    use std::collections::HashMap;

    fn meeting(crn: i64, days: DaySet, begin_hm: (u16, u16), end_hm: (u16, u16)) -> MeetingTime {
        MeetingTime::new(
            Crn(crn),
            days,
            TimeOfDay::from_hm(begin_hm.0, begin_hm.1),
            TimeOfDay::from_hm(end_hm.0, end_hm.1),
        )
        .unwrap()
    }

    fn section(crn: i64, course: &str, meetings: Vec<MeetingTime>) -> Section {
        Section::new(
            Crn(crn),
            CourseCode::new(course),
            "LEC",
            "in-person",
            3.0,
            "Staff",
            "Main 101",
            None,
            meetings,
        )
        .unwrap()
    }

    fn no_stop() -> bool {
        false
    }

    fn scorer() -> Scorer {
        Scorer::new(
            Preferences::new(PreferredTime::Morning, 0.5, DaySet::MON_FRI, 0.5).unwrap(),
        )
    }

    #[test]
    fn scenario_s2_conflict_pruning() {
        let a1 = section(
            1,
            "A",
            vec![meeting(1, DaySet::MONDAY | DaySet::WEDNESDAY, (10, 0), (11, 0))],
        );
        let a2 = section(
            2,
            "A",
            vec![meeting(2, DaySet::TUESDAY | DaySet::THURSDAY, (10, 0), (11, 0))],
        );
        let b1 = section(
            3,
            "B",
            vec![meeting(3, DaySet::MONDAY | DaySet::WEDNESDAY, (10, 30), (11, 30))],
        );

        let mut by_course = HashMap::new();
        by_course.insert(CourseCode::new("A"), vec![a1, a2]);
        by_course.insert(CourseCode::new("B"), vec![b1]);

        let sc = scorer();
        let enumerator = Enumerator::new(by_course, &[], &sc);
        let mut topk = TopKBuffer::new(10);
        enumerator.enumerate(&mut topk, &no_stop);

        let results = topk.drain_sorted();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].crns[&CourseCode::new("A")], Crn(2));
        assert_eq!(results[0].crns[&CourseCode::new("B")], Crn(3));
    }

    #[test]
    fn scenario_s3_break_pruning() {
        let a1 = section(
            1,
            "A",
            vec![meeting(1, DaySet::MONDAY | DaySet::WEDNESDAY, (12, 0), (12, 50))],
        );
        let a2 = section(
            2,
            "A",
            vec![meeting(2, DaySet::MONDAY | DaySet::WEDNESDAY, (13, 30), (14, 20))],
        );
        let mut by_course = HashMap::new();
        by_course.insert(CourseCode::new("A"), vec![a1, a2]);

        let brk = Break::new(TimeOfDay::from_hm(12, 0), TimeOfDay::from_hm(13, 0)).unwrap();
        let sc = scorer();
        let enumerator = Enumerator::new(by_course, std::slice::from_ref(&brk), &sc);
        let mut topk = TopKBuffer::new(10);
        enumerator.enumerate(&mut topk, &no_stop);

        let results = topk.drain_sorted();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].crns[&CourseCode::new("A")], Crn(2));
    }

    #[test]
    fn empty_course_list_yields_one_empty_schedule() {
        let sc = scorer();
        let enumerator = Enumerator::new(HashMap::new(), &[], &sc);
        let mut topk = TopKBuffer::new(10);
        let considered = enumerator.enumerate(&mut topk, &no_stop);
        assert_eq!(considered, 1);
        let results = topk.drain_sorted();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, 0.0);
        assert!(results[0].crns.is_empty());
    }

    #[test]
    fn cancellation_stops_enumeration_immediately() {
        let a1 = section(1, "A", vec![meeting(1, DaySet::MONDAY, (9, 0), (9, 50))]);
        let mut by_course = HashMap::new();
        by_course.insert(CourseCode::new("A"), vec![a1]);
        let sc = scorer();
        let enumerator = Enumerator::new(by_course, &[], &sc);
        let mut topk = TopKBuffer::new(10);
        let considered = enumerator.enumerate(&mut topk, &|| true);
        assert_eq!(considered, 0);
        assert!(topk.is_empty());
    }

    #[test]
    fn scenario_s5_topk_tie_suppression() {
        // 3 courses, 2 sections each, 8 combinations -- but only course A's
        // choice of section changes the score (a 9:00 morning meeting vs. a
        // 20:00 evening one). B and C's two sections sit on their own day at
        // an identical day/time (distinct CRNs, so the DFS still branches
        // over them), so swapping between them never moves the score. That
        // collapses the 8 combinations to exactly 2 distinct scores.
        let mut by_course = HashMap::new();
        let a1 = section(1, "A", vec![meeting(1, DaySet::MONDAY, (9, 0), (9, 50))]);
        let a2 = section(2, "A", vec![meeting(2, DaySet::MONDAY, (20, 0), (20, 50))]);
        by_course.insert(CourseCode::new("A"), vec![a1, a2]);

        let b1 = section(11, "B", vec![meeting(11, DaySet::TUESDAY, (9, 0), (9, 50))]);
        let b2 = section(12, "B", vec![meeting(12, DaySet::TUESDAY, (9, 0), (9, 50))]);
        by_course.insert(CourseCode::new("B"), vec![b1, b2]);

        let c1 = section(21, "C", vec![meeting(21, DaySet::WEDNESDAY, (9, 0), (9, 50))]);
        let c2 = section(22, "C", vec![meeting(22, DaySet::WEDNESDAY, (9, 0), (9, 50))]);
        by_course.insert(CourseCode::new("C"), vec![c1, c2]);

        let sc = scorer();
        let enumerator = Enumerator::new(by_course, &[], &sc);
        let mut topk = TopKBuffer::new(10);
        let considered = enumerator.enumerate(&mut topk, &no_stop);
        assert_eq!(considered, 8);
        // Only A's choice moves the score, so 2 of the 8 combinations'
        // scores survive suppression.
        assert_eq!(topk.len(), 2);
    }
}
