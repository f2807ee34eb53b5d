//! C2 -- the scorer: a pure function from a schedule's meetings to a score
//! in `[0, 1]` (§4.2).
//!
//! The source (`courseflow-backend`) shipped several scorer variants
//! (exponential decay, piecewise-linear peaks, density bonuses); this fixes
//! the one the spec canonizes -- exponential decay around a preferred
//! midpoint, averaged over meetings, plus distribution-vs-match day scoring
//! -- and does not attempt to preserve the others (per the source's own
//! Design Notes).

use std::cell::RefCell;
use std::collections::HashMap;

use super::model::{DaySet, MeetingTime, PreferredTime, Preferences};

/// Exponential decay rate for the time-of-day score.
const DECAY: f64 = 0.5;
/// Differences beyond this many minutes are clamped to the same score.
const MAX_DIFF: f64 = 240.0;
/// Score floor -- `exp(...)` never reaches exactly zero, but clamp the
/// display value at this instead of letting it underflow to a long tail.
const MIN_SCORE: f64 = 1e-4;

/// Canonical, hashable form of a meeting for memoization (§9 Design Notes).
type MeetingKey = (i64, u16, u16, u16);

fn meeting_key(m: &MeetingTime) -> MeetingKey {
    (m.crn.0, m.days.bits(), m.begin.0, m.end.0)
}

/// Canonical key for an entire schedule's flat meeting multiset: sorted so
/// that two schedules built in a different insertion order, but containing
/// the same meetings, memoize to the same entry.
fn schedule_key(meetings: &[MeetingTime]) -> Vec<MeetingKey> {
    let mut keys: Vec<MeetingKey> = meetings.iter().map(meeting_key).collect();
    keys.sort_unstable();
    keys
}

/// Deterministic, preference-bound scorer. Not `Sync` (its memo cache is a
/// `RefCell`) -- construct one per search, as the enumerator does.
pub struct Scorer {
    preferences: Preferences,
    cache: RefCell<HashMap<Vec<MeetingKey>, f64>>,
}

impl Scorer {
    /// Preferences are validated by [`Preferences::new`] before this is
    /// ever constructed, so scoring itself never fails (§4.2 Failure).
    pub fn new(preferences: Preferences) -> Self {
        Self {
            preferences,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Score the flat multiset of meetings in a complete schedule.
    pub fn score(&self, meetings: &[MeetingTime]) -> f64 {
        let key = schedule_key(meetings);
        if let Some(cached) = self.cache.borrow().get(&key) {
            return *cached;
        }

        let time_score = self.time_score(meetings);
        let day_score = self.day_score(meetings);
        let combined = self.preferences.time_weight * time_score
            + self.preferences.day_weight * day_score;
        let clamped = combined.clamp(0.0, 1.0);

        self.cache.borrow_mut().insert(key, clamped);
        clamped
    }

    /// Mean per-meeting exponential-decay score around the preferred
    /// midpoint. Online/async meetings (the `begin == 00:00` sentinel)
    /// score a neutral `0.5`.
    fn time_score(&self, meetings: &[MeetingTime]) -> f64 {
        if meetings.is_empty() {
            return 0.0;
        }
        let midpoint = self.preferences.preferred_time.midpoint_minutes() as f64;
        let total: f64 = meetings
            .iter()
            .map(|m| {
                if m.begin.0 == 0 {
                    0.5
                } else {
                    let diff = (m.begin.0 as f64 - midpoint).abs().min(MAX_DIFF);
                    (-DECAY * diff / MAX_DIFF).exp().max(MIN_SCORE)
                }
            })
            .sum();
        total / meetings.len() as f64
    }

    /// Day-of-week score (§4.2): even-spread reward when every weekday is
    /// preferred, otherwise a preferred-day concentration reward.
    fn day_score(&self, meetings: &[MeetingTime]) -> f64 {
        let mut counts: HashMap<DaySet, u32> = HashMap::new();
        for m in meetings {
            for day in [
                DaySet::MONDAY,
                DaySet::TUESDAY,
                DaySet::WEDNESDAY,
                DaySet::THURSDAY,
                DaySet::FRIDAY,
            ] {
                if m.days.contains(day) {
                    *counts.entry(day).or_insert(0) += 1;
                }
            }
        }

        if self.preferences.preferred_days == DaySet::MON_FRI {
            let values: Vec<f64> = [
                DaySet::MONDAY,
                DaySet::TUESDAY,
                DaySet::WEDNESDAY,
                DaySet::THURSDAY,
                DaySet::FRIDAY,
            ]
            .iter()
            .map(|d| *counts.get(d).unwrap_or(&0) as f64)
            .collect();
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            if mean == 0.0 {
                return 0.0;
            }
            let variance =
                values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
            let stddev = variance.sqrt();
            let cv = stddev / mean;
            1.0 / (1.0 + cv)
        } else {
            let total: u32 = counts.values().sum();
            if total == 0 {
                return 0.0;
            }
            let preferred: u32 = [
                DaySet::MONDAY,
                DaySet::TUESDAY,
                DaySet::WEDNESDAY,
                DaySet::THURSDAY,
                DaySet::FRIDAY,
            ]
            .iter()
            .filter(|d| self.preferences.preferred_days.contains(**d))
            .map(|d| *counts.get(d).unwrap_or(&0))
            .sum();
            let non_preferred = total - preferred;
            let match_rate = 1.0 - (non_preferred as f64 / total as f64);
            match_rate.max(MIN_SCORE)
        }
    }
}
