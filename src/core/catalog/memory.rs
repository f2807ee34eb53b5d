//! In-memory [`SectionRepository`] -- a test/demo stand-in for a real,
//! persistence-backed catalog.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{CatalogFetch, SectionRepository};
use crate::core::error::CatalogError;
use crate::core::model::{CourseCode, Section};

/// A `HashMap`-backed catalog, pre-seeded by the caller.
///
/// Clone-cheap is not a goal here -- construct once, wrap in `Arc` if shared.
#[derive(Debug, Default)]
pub struct InMemorySectionRepository {
    sections: RwLock<HashMap<CourseCode, Vec<Section>>>,
}

impl InMemorySectionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository pre-seeded with the given sections, grouped by
    /// their own `course` field.
    pub fn seeded(sections: Vec<Section>) -> Self {
        let repo = Self::new();
        for section in sections {
            repo.insert(section);
        }
        repo
    }

    /// Insert (or append) a section under its course.
    pub fn insert(&self, section: Section) {
        let mut guard = self.sections.write().expect("catalog lock poisoned");
        guard.entry(section.course.clone()).or_default().push(section);
    }

    /// A small, hand-seeded catalog for the demo binary and smoke tests --
    /// standing in for the real Postgres-backed repository a deployment
    /// would wire up (§1, §4.1 -- the core treats both identically).
    pub fn demo_catalog() -> Self {
        use crate::core::model::{Crn, DaySet, MeetingTime, TimeOfDay};

        fn meeting(crn: i64, days: DaySet, begin: (u16, u16), end: (u16, u16)) -> MeetingTime {
            MeetingTime::new(
                Crn(crn),
                days,
                TimeOfDay::from_hm(begin.0, begin.1),
                TimeOfDay::from_hm(end.0, end.1),
            )
            .expect("demo meeting time is well-formed")
        }

        #[allow(clippy::too_many_arguments)]
        fn section(
            crn: i64,
            course: &str,
            class_type: &str,
            professor: &str,
            location: &str,
            meetings: Vec<MeetingTime>,
        ) -> Section {
            Section::new(
                Crn(crn),
                CourseCode::new(course),
                class_type,
                "in-person",
                3.0,
                professor,
                location,
                None,
                meetings,
            )
            .expect("demo section is well-formed")
        }

        let repo = Self::new();
        let mwf = DaySet::MONDAY | DaySet::WEDNESDAY | DaySet::FRIDAY;
        let tr = DaySet::TUESDAY | DaySet::THURSDAY;

        repo.insert(section(
            10001,
            "CS-1336",
            "LEC",
            "Dr. Alvarez",
            "ECSS 2.410",
            vec![meeting(10001, mwf, (9, 0), (9, 50))],
        ));
        repo.insert(section(
            10002,
            "CS-1336",
            "LEC",
            "Dr. Okafor",
            "ECSS 2.412",
            vec![meeting(10002, tr, (14, 0), (15, 15))],
        ));
        repo.insert(section(
            20001,
            "MATH-2417",
            "LEC",
            "Dr. Singh",
            "CB1 1.210",
            vec![meeting(20001, mwf, (10, 0), (10, 50))],
        ));
        repo.insert(section(
            20002,
            "MATH-2417",
            "LEC",
            "Dr. Lindqvist",
            "CB1 1.212",
            vec![meeting(20002, tr, (9, 0), (10, 15))],
        ));
        repo.insert(section(
            30001,
            "PHYS-2325",
            "LEC",
            "Dr. Marsh",
            "ECSS 2.307",
            vec![meeting(30001, mwf, (13, 0), (13, 50))],
        ));
        repo.insert(section(
            40001,
            "ECON-2301",
            "LEC",
            "Dr. Patel",
            "JSOM 2.106",
            vec![MeetingTime::new(
                Crn(40001),
                DaySet::ONLINE,
                TimeOfDay::MIDNIGHT,
                TimeOfDay::MIDNIGHT,
            )
            .expect("sentinel online meeting is well-formed")],
        ));
        repo
    }
}

#[async_trait]
impl SectionRepository for InMemorySectionRepository {
    async fn fetch(&self, courses: &[CourseCode]) -> Result<CatalogFetch, CatalogError> {
        let guard = self.sections.read().expect("catalog lock poisoned");
        let mut sections_by_course = HashMap::with_capacity(courses.len());
        let mut missing = Vec::new();

        for course in courses {
            match guard.get(course) {
                Some(sections) if !sections.is_empty() => {
                    sections_by_course.insert(course.clone(), sections.clone());
                }
                _ => missing.push(course.clone()),
            }
        }

        Ok(CatalogFetch {
            sections_by_course,
            missing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Crn, DaySet, MeetingTime, TimeOfDay};

    fn section(crn: i64, course: &str) -> Section {
        let meeting = MeetingTime::new(
            Crn(crn),
            DaySet::MONDAY,
            TimeOfDay::from_hm(9, 0),
            TimeOfDay::from_hm(9, 50),
        )
        .unwrap();
        Section::new(
            Crn(crn),
            CourseCode::new(course),
            "LEC",
            "in-person",
            3.0,
            "Staff",
            "Main 101",
            None,
            vec![meeting],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn fetch_reports_missing_courses() {
        let repo = InMemorySectionRepository::seeded(vec![section(100, "CS-1000")]);
        let fetch = repo
            .fetch(&[CourseCode::new("CS-1000"), CourseCode::new("PHY-2000")])
            .await
            .unwrap();

        assert_eq!(fetch.sections_by_course.len(), 1);
        assert_eq!(fetch.missing, vec![CourseCode::new("PHY-2000")]);
    }

    #[tokio::test]
    async fn fetch_is_a_pure_lookup() {
        let repo = InMemorySectionRepository::seeded(vec![section(100, "CS-1000")]);
        let first = repo.fetch(&[CourseCode::new("CS-1000")]).await.unwrap();
        let second = repo.fetch(&[CourseCode::new("CS-1000")]).await.unwrap();
        assert_eq!(
            first.sections_by_course.len(),
            second.sections_by_course.len()
        );
    }
}
