//! Core data model: courses, sections, meeting times, breaks, and preferences.
//!
//! Everything here is plain data -- no I/O, no async. Invariants are enforced
//! at construction so the rest of the core can treat these types as total.

use std::collections::BTreeMap;
use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// An opaque course identifier (e.g. `"MATH-1226"`). Equality is by bytes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseCode(pub String);

impl CourseCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CourseCode {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Course Reference Number -- the primary key of a section within a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Crn(pub i64);

impl fmt::Display for Crn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

bitflags! {
    /// Day-of-week bits, plus two sentinel bits (`ONLINE`, `ARR`) denoting
    /// "no weekly meeting footprint".
    ///
    /// Conflict checks only ever look at [`DaySet::WEEKDAYS`] bits -- the
    /// sentinel bits are intentionally excluded from [`DaySet::conflict_mask`]
    /// so that online/arranged meetings never intersect anything, including
    /// another online/arranged meeting.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct DaySet: u16 {
        const MONDAY    = 0b0000_0000_0001;
        const TUESDAY   = 0b0000_0000_0010;
        const WEDNESDAY = 0b0000_0000_0100;
        const THURSDAY  = 0b0000_0000_1000;
        const FRIDAY    = 0b0000_0001_0000;
        const SATURDAY  = 0b0000_0010_0000;
        const SUNDAY    = 0b0000_0100_0000;
        const ONLINE    = 0b0000_1000_0000;
        const ARR       = 0b0001_0000_0000;
    }
}

impl DaySet {
    /// Every real weekday bit -- used to mask sentinel bits out of conflict tests.
    pub const WEEKDAYS: DaySet = DaySet::MONDAY
        .union(DaySet::TUESDAY)
        .union(DaySet::WEDNESDAY)
        .union(DaySet::THURSDAY)
        .union(DaySet::FRIDAY)
        .union(DaySet::SATURDAY)
        .union(DaySet::SUNDAY);

    /// Monday through Friday -- the only days a preference can name (§3).
    pub const MON_FRI: DaySet = DaySet::MONDAY
        .union(DaySet::TUESDAY)
        .union(DaySet::WEDNESDAY)
        .union(DaySet::THURSDAY)
        .union(DaySet::FRIDAY);

    /// The bits that participate in meeting-vs-meeting conflict tests.
    ///
    /// `ONLINE`/`ARR` are masked out so sentinel meetings never conflict,
    /// per §3's invariant on day-set sentinels.
    pub fn conflict_mask(self) -> DaySet {
        self & DaySet::WEEKDAYS
    }

    /// Whether two day sets share a non-sentinel day.
    pub fn intersects_weekdays(self, other: DaySet) -> bool {
        !(self.conflict_mask() & other.conflict_mask()).is_empty()
    }

    /// Parse a single-letter day code (`M`, `T`, `W`, `R`, `F`, `S`, `U`) or
    /// the sentinel strings `ONLINE` / `ARR`.
    pub fn parse_code(code: &str) -> Option<DaySet> {
        match code {
            "M" => Some(DaySet::MONDAY),
            "T" => Some(DaySet::TUESDAY),
            "W" => Some(DaySet::WEDNESDAY),
            "R" => Some(DaySet::THURSDAY),
            "F" => Some(DaySet::FRIDAY),
            "S" => Some(DaySet::SATURDAY),
            "U" => Some(DaySet::SUNDAY),
            "ONLINE" => Some(DaySet::ONLINE),
            "ARR" => Some(DaySet::ARR),
            _ => None,
        }
    }

    /// The inverse of [`DaySet::parse_code`] -- every code bit that's set,
    /// in canonical `M,T,W,R,F,S,U,ONLINE,ARR` order. Used by the HTTP
    /// layer to serialize meeting days back to strings.
    pub fn codes(self) -> Vec<&'static str> {
        const ORDER: [(DaySet, &str); 9] = [
            (DaySet::MONDAY, "M"),
            (DaySet::TUESDAY, "T"),
            (DaySet::WEDNESDAY, "W"),
            (DaySet::THURSDAY, "R"),
            (DaySet::FRIDAY, "F"),
            (DaySet::SATURDAY, "S"),
            (DaySet::SUNDAY, "U"),
            (DaySet::ONLINE, "ONLINE"),
            (DaySet::ARR, "ARR"),
        ];
        ORDER
            .iter()
            .filter(|(bit, _)| self.contains(*bit))
            .map(|(_, code)| *code)
            .collect()
    }
}

/// Minutes since midnight, `0..=1439`. Kept as a bare integer so arithmetic
/// (differences, clamping) stays total and exact -- no `NaiveTime` rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeOfDay(pub u16);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    pub fn from_hm(hour: u16, minute: u16) -> Self {
        Self(hour * 60 + minute)
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn abs_diff(self, other: TimeOfDay) -> u16 {
        self.0.abs_diff(other.0)
    }

    /// Parse a `"HH:MM"` string into minutes-since-midnight. Used by the
    /// HTTP layer; the core itself never parses strings.
    pub fn parse_hhmm(s: &str) -> Option<TimeOfDay> {
        let (h, m) = s.split_once(':')?;
        let hour: u16 = h.parse().ok()?;
        let minute: u16 = m.parse().ok()?;
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(TimeOfDay::from_hm(hour, minute))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// One weekly meeting-time block for a section.
///
/// The sentinel value `begin == end == TimeOfDay::MIDNIGHT` together with
/// `days` being exactly `{ONLINE}` or `{ARR}` means "no weekly meeting".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeetingTime {
    pub crn: Crn,
    pub days: DaySet,
    pub begin: TimeOfDay,
    pub end: TimeOfDay,
}

impl MeetingTime {
    /// Construct a `MeetingTime`, validating `begin <= end` and that `days`
    /// is non-empty.
    pub fn new(crn: Crn, days: DaySet, begin: TimeOfDay, end: TimeOfDay) -> Result<Self, String> {
        if days.is_empty() {
            return Err("meeting time must have a non-empty day set".to_owned());
        }
        if begin > end {
            return Err(format!(
                "invalid meeting time: begin ({begin}) is after end ({end})"
            ));
        }
        Ok(Self {
            crn,
            days,
            begin,
            end,
        })
    }

    /// Whether this is a sentinel "no weekly meeting" block (online/arranged).
    pub fn is_sentinel(&self) -> bool {
        self.begin == TimeOfDay::MIDNIGHT
            && self.end == TimeOfDay::MIDNIGHT
            && (self.days == DaySet::ONLINE || self.days == DaySet::ARR)
    }

    /// Meeting-vs-meeting conflict per §4.4: shared weekday AND overlapping
    /// half-open-ish interval (`a.end > b.begin && a.begin < b.end`).
    pub fn conflicts_with(&self, other: &MeetingTime) -> bool {
        self.days.intersects_weekdays(other.days)
            && self.end > other.begin
            && self.begin < other.end
    }

    /// Meeting-vs-break conflict per §4.4: the meeting *starts* inside the
    /// break, inclusive on both ends.
    pub fn starts_within_break(&self, brk: &Break) -> bool {
        brk.begin <= self.begin && self.begin <= brk.end
    }
}

/// A user-declared break window, applied to every day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Break {
    pub begin: TimeOfDay,
    pub end: TimeOfDay,
}

impl Break {
    pub fn new(begin: TimeOfDay, end: TimeOfDay) -> Result<Self, String> {
        if begin > end {
            return Err(format!(
                "invalid break: begin ({begin}) is after end ({end})"
            ));
        }
        Ok(Self { begin, end })
    }
}

/// A specific offering of a course with one professor, one modality, and a
/// fixed set of weekly meeting times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub crn: Crn,
    pub course: CourseCode,
    pub class_type: String,
    pub modality: String,
    pub credit_hours: f64,
    pub professor: String,
    pub location: String,
    pub avg_gpa: Option<f64>,
    pub meetings: Vec<MeetingTime>,
}

impl Section {
    /// Construct a `Section`, validating it has at least one meeting and
    /// that every meeting's `crn` matches the section's own.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        crn: Crn,
        course: CourseCode,
        class_type: impl Into<String>,
        modality: impl Into<String>,
        credit_hours: f64,
        professor: impl Into<String>,
        location: impl Into<String>,
        avg_gpa: Option<f64>,
        meetings: Vec<MeetingTime>,
    ) -> Result<Self, String> {
        if meetings.is_empty() {
            return Err(format!("section {crn} must have at least one meeting"));
        }
        if let Some(bad) = meetings.iter().find(|m| m.crn != crn) {
            return Err(format!(
                "meeting crn {} does not match section crn {crn}",
                bad.crn
            ));
        }
        Ok(Self {
            crn,
            course,
            class_type: class_type.into(),
            modality: modality.into(),
            credit_hours,
            professor: professor.into(),
            location: location.into(),
            avg_gpa,
            meetings,
        })
    }
}

/// Preferred period of day for the time-of-day score component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredTime {
    Morning,
    Afternoon,
    Evening,
}

impl PreferredTime {
    /// The preferred midpoint in minutes-since-midnight (§4.2).
    pub fn midpoint_minutes(self) -> u16 {
        match self {
            PreferredTime::Morning => 600,
            PreferredTime::Afternoon => 840,
            PreferredTime::Evening => 1080,
        }
    }
}

/// User scheduling preferences, validated at construction (§4.2 Failure).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub preferred_time: PreferredTime,
    pub time_weight: f64,
    pub preferred_days: DaySet,
    pub day_weight: f64,
}

impl Preferences {
    /// `time_weight + day_weight` must be within this tolerance of `1.0`.
    const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

    pub fn new(
        preferred_time: PreferredTime,
        time_weight: f64,
        preferred_days: DaySet,
        day_weight: f64,
    ) -> Result<Self, String> {
        if !(0.0..=1.0).contains(&time_weight) {
            return Err(format!("time_weight {time_weight} must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&day_weight) {
            return Err(format!("day_weight {day_weight} must be in [0, 1]"));
        }
        if (time_weight + day_weight - 1.0).abs() > Self::WEIGHT_SUM_TOLERANCE {
            return Err(format!(
                "time_weight ({time_weight}) + day_weight ({day_weight}) must sum to 1"
            ));
        }
        if !DaySet::MON_FRI.contains(preferred_days) {
            return Err("preferred_days must be a subset of {M,T,W,R,F}".to_owned());
        }
        Ok(Self {
            preferred_time,
            time_weight,
            preferred_days,
            day_weight,
        })
    }
}

/// A complete, feasible schedule paired with its score (§3, §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSchedule {
    pub score: f64,
    pub crns: BTreeMap<CourseCode, Crn>,
    pub meetings: BTreeMap<Crn, Vec<MeetingTime>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_set_sentinels_never_conflict() {
        let online = DaySet::ONLINE;
        assert!(!online.intersects_weekdays(online));
        assert!(!online.intersects_weekdays(DaySet::ARR));
        assert!(!DaySet::MONDAY.intersects_weekdays(DaySet::ONLINE));
    }

    #[test]
    fn day_set_codes_round_trip_through_parse() {
        let set = DaySet::MONDAY | DaySet::WEDNESDAY | DaySet::FRIDAY;
        let codes = set.codes();
        assert_eq!(codes, vec!["M", "W", "F"]);
        let reparsed = codes
            .iter()
            .map(|c| DaySet::parse_code(c).unwrap())
            .fold(DaySet::empty(), |acc, d| acc | d);
        assert_eq!(reparsed, set);
    }

    #[test]
    fn day_set_weekday_overlap_detected() {
        let mw = DaySet::MONDAY | DaySet::WEDNESDAY;
        let wf = DaySet::WEDNESDAY | DaySet::FRIDAY;
        assert!(mw.intersects_weekdays(wf));
        assert!(!mw.intersects_weekdays(DaySet::TUESDAY | DaySet::THURSDAY));
    }

    #[test]
    fn time_of_day_parses_hhmm() {
        assert_eq!(TimeOfDay::parse_hhmm("09:05"), Some(TimeOfDay::from_hm(9, 5)));
        assert_eq!(TimeOfDay::parse_hhmm("23:59"), Some(TimeOfDay::from_hm(23, 59)));
        assert_eq!(TimeOfDay::parse_hhmm("24:00"), None);
        assert_eq!(TimeOfDay::parse_hhmm("9:5"), Some(TimeOfDay::from_hm(9, 5)));
        assert_eq!(TimeOfDay::parse_hhmm("garbage"), None);
    }

    #[test]
    fn meeting_time_rejects_inverted_range() {
        let err = MeetingTime::new(
            Crn(1),
            DaySet::MONDAY,
            TimeOfDay::from_hm(10, 0),
            TimeOfDay::from_hm(9, 0),
        );
        assert!(err.is_err());
    }

    #[test]
    fn meeting_time_rejects_empty_days() {
        let err = MeetingTime::new(
            Crn(1),
            DaySet::empty(),
            TimeOfDay::from_hm(9, 0),
            TimeOfDay::from_hm(10, 0),
        );
        assert!(err.is_err());
    }

    #[test]
    fn break_containment_is_inclusive_both_ends() {
        let brk = Break::new(TimeOfDay::from_hm(12, 0), TimeOfDay::from_hm(13, 0)).unwrap();
        let starts_at_begin = MeetingTime::new(
            Crn(1),
            DaySet::MONDAY,
            TimeOfDay::from_hm(12, 0),
            TimeOfDay::from_hm(12, 50),
        )
        .unwrap();
        let starts_at_end = MeetingTime::new(
            Crn(1),
            DaySet::MONDAY,
            TimeOfDay::from_hm(13, 0),
            TimeOfDay::from_hm(13, 50),
        )
        .unwrap();
        let starts_after = MeetingTime::new(
            Crn(1),
            DaySet::MONDAY,
            TimeOfDay::from_hm(13, 30),
            TimeOfDay::from_hm(14, 20),
        )
        .unwrap();
        assert!(starts_at_begin.starts_within_break(&brk));
        assert!(starts_at_end.starts_within_break(&brk));
        assert!(!starts_after.starts_within_break(&brk));
    }

    #[test]
    fn preferences_reject_mismatched_weights() {
        assert!(Preferences::new(PreferredTime::Morning, 0.5, DaySet::MON_FRI, 0.6).is_err());
    }

    #[test]
    fn preferences_reject_non_weekday_preferred_days() {
        assert!(
            Preferences::new(PreferredTime::Morning, 0.5, DaySet::SATURDAY, 0.5).is_err()
        );
    }

    #[test]
    fn section_rejects_empty_meetings() {
        assert!(
            Section::new(Crn(1), CourseCode::new("CS-1000"), "LEC", "P", 3.0, "X", "Y", None, vec![])
                .is_err()
        );
    }

    #[test]
    fn section_rejects_mismatched_meeting_crn() {
        let meeting = MeetingTime::new(
            Crn(2),
            DaySet::MONDAY,
            TimeOfDay::from_hm(9, 0),
            TimeOfDay::from_hm(10, 0),
        )
        .unwrap();
        assert!(
            Section::new(
                Crn(1),
                CourseCode::new("CS-1000"),
                "LEC",
                "P",
                3.0,
                "X",
                "Y",
                None,
                vec![meeting]
            )
            .is_err()
        );
    }
}
