//! `POST /api/schedules` -- the one `RequestHandler` this service owns
//! (§6). Validates the request body (shape only), maps it onto the core's
//! types, runs [`SearchDriver::generate`], and serializes the [`Outcome`].

use std::collections::BTreeMap;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::core::error::CoreError;
use crate::core::model::{Break, CourseCode, Crn, DaySet, MeetingTime, PreferredTime, Preferences};
use crate::core::{Outcome, SearchDriver};
use crate::state::AppState;
use crate::web::error::ApiError;

#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BreakInput {
    /// `"HH:MM"`, 24-hour.
    pub begin: String,
    pub end: String,
}

#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GenerateRequest {
    pub courses: Vec<String>,
    #[serde(default)]
    pub breaks: Vec<BreakInput>,
    pub preferred_time: String,
    #[serde(default)]
    pub preferred_days: Vec<String>,
    pub time_weight: f64,
    pub day_weight: f64,
    /// Omit for the server default (§6 -- default 10).
    #[serde(default)]
    pub k: Option<usize>,
}

#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MeetingTimeDto {
    pub crn: i64,
    pub days: Vec<String>,
    pub begin: String,
    pub end: String,
}

impl From<&MeetingTime> for MeetingTimeDto {
    fn from(m: &MeetingTime) -> Self {
        Self {
            crn: m.crn.0,
            days: m.days.codes().into_iter().map(str::to_owned).collect(),
            begin: m.begin.to_string(),
            end: m.end.to_string(),
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ScheduleDto {
    pub score: f64,
    pub crns: BTreeMap<String, i64>,
    pub meetings: BTreeMap<String, Vec<MeetingTimeDto>>,
}

#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GenerateResponse {
    pub timed_out: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedules: Option<Vec<ScheduleDto>>,
    /// Complete schedules considered before duplicate-score suppression
    /// (§4.4, §9 Design Notes).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub considered: Option<u64>,
    /// Requested courses the catalog reported as having zero sections
    /// (§7's "Empty catalog" outcome).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<Vec<String>>,
}

fn parse_preferred_time(raw: &str) -> Result<PreferredTime, CoreError> {
    match raw.to_ascii_lowercase().as_str() {
        "morning" => Ok(PreferredTime::Morning),
        "afternoon" => Ok(PreferredTime::Afternoon),
        "evening" => Ok(PreferredTime::Evening),
        other => Err(CoreError::InvalidPreferences(format!(
            "unknown preferred_time '{other}', expected morning/afternoon/evening"
        ))),
    }
}

fn parse_preferred_days(raw: &[String]) -> Result<DaySet, CoreError> {
    let mut set = DaySet::empty();
    for code in raw {
        match DaySet::parse_code(code) {
            Some(day) if DaySet::MON_FRI.contains(day) => set |= day,
            _ => {
                return Err(CoreError::InvalidPreferences(format!(
                    "preferred_days entry '{code}' must be one of M,T,W,R,F"
                )));
            }
        }
    }
    Ok(set)
}

fn parse_break(input: &BreakInput) -> Result<Break, CoreError> {
    let begin = crate::core::model::TimeOfDay::parse_hhmm(&input.begin).ok_or_else(|| {
        CoreError::InvalidRequest(format!("invalid break begin time '{}'", input.begin))
    })?;
    let end = crate::core::model::TimeOfDay::parse_hhmm(&input.end).ok_or_else(|| {
        CoreError::InvalidRequest(format!("invalid break end time '{}'", input.end))
    })?;
    Break::new(begin, end).map_err(CoreError::InvalidRequest)
}

impl GenerateRequest {
    fn into_core(self, default_k: usize, max_k: usize) -> Result<(Vec<CourseCode>, Vec<Break>, Preferences, usize), CoreError> {
        if self.courses.is_empty() {
            return Err(CoreError::InvalidRequest(
                "courses must be a non-empty list".to_owned(),
            ));
        }
        let courses = self.courses.iter().map(|c| CourseCode::new(c.clone())).collect();

        let breaks = self
            .breaks
            .iter()
            .map(parse_break)
            .collect::<Result<Vec<_>, _>>()?;

        let preferred_time = parse_preferred_time(&self.preferred_time)?;
        let preferred_days = parse_preferred_days(&self.preferred_days)?;
        let preferences = Preferences::new(
            preferred_time,
            self.time_weight,
            preferred_days,
            self.day_weight,
        )
        .map_err(CoreError::InvalidPreferences)?;

        let k = match self.k {
            Some(0) => return Err(CoreError::InvalidRequest("k must be positive".to_owned())),
            Some(k) => k.min(max_k),
            None => default_k,
        };

        Ok((courses, breaks, preferences, k))
    }
}

fn schedule_to_dto(s: crate::core::model::ScoredSchedule) -> ScheduleDto {
    let crns: BTreeMap<String, i64> = s
        .crns
        .into_iter()
        .map(|(course, crn): (CourseCode, Crn)| (course.0, crn.0))
        .collect();
    let meetings: BTreeMap<String, Vec<MeetingTimeDto>> = s
        .meetings
        .into_iter()
        .map(|(crn, meetings)| {
            (
                crn.0.to_string(),
                meetings.iter().map(MeetingTimeDto::from).collect(),
            )
        })
        .collect();
    ScheduleDto {
        score: s.score,
        crns,
        meetings,
    }
}

/// `POST /api/schedules`.
///
/// Deserializes with `serde_path_to_error` so a malformed body reports
/// exactly which field was wrong, rather than a bare "invalid JSON".
pub async fn generate_schedules(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, ApiError> {
    let start = std::time::Instant::now();

    let request: GenerateRequest = {
        let de = &mut serde_json::Deserializer::from_slice(&body);
        serde_path_to_error::deserialize(de)
            .map_err(|e| ApiError::bad_request(format!("invalid request body: {e}")))?
    };

    let (courses, breaks, preferences, k) = request
        .into_core(state.default_k, state.max_k)
        .map_err(ApiError::from)?;

    let driver = SearchDriver::new(state.search_deadline);
    let outcome = driver
        .generate(state.repo.as_ref(), &courses, breaks, preferences, k)
        .await
        .map_err(ApiError::from)?;

    crate::utils::log_if_slow(start, std::time::Duration::from_secs(5), "generate_schedules");

    let response = match outcome {
        Outcome::Ranked {
            schedules,
            considered,
            missing,
        } => GenerateResponse {
            timed_out: false,
            schedules: Some(schedules.into_iter().map(schedule_to_dto).collect()),
            considered: Some(considered),
            missing: Some(missing.into_iter().map(|c| c.0).collect()),
        },
        Outcome::TimedOut => GenerateResponse {
            timed_out: true,
            schedules: None,
            considered: None,
            missing: None,
        },
    };

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(courses: Vec<&str>, k: Option<usize>) -> GenerateRequest {
        GenerateRequest {
            courses: courses.into_iter().map(str::to_owned).collect(),
            breaks: vec![],
            preferred_time: "morning".to_owned(),
            preferred_days: vec!["M".to_owned(), "W".to_owned(), "F".to_owned()],
            time_weight: 0.5,
            day_weight: 0.5,
            k,
        }
    }

    #[test]
    fn rejects_empty_course_list() {
        let req = request(vec![], None);
        assert!(req.into_core(10, 50).is_err());
    }

    #[test]
    fn rejects_zero_k() {
        let req = request(vec!["CS-1336"], Some(0));
        assert!(req.into_core(10, 50).is_err());
    }

    #[test]
    fn clamps_k_to_max() {
        let req = request(vec!["CS-1336"], Some(1000));
        let (_, _, _, k) = req.into_core(10, 50).unwrap();
        assert_eq!(k, 50);
    }

    #[test]
    fn rejects_unknown_preferred_time() {
        let mut req = request(vec!["CS-1336"], None);
        req.preferred_time = "noon".to_owned();
        assert!(req.into_core(10, 50).is_err());
    }

    #[test]
    fn rejects_bad_break_time() {
        let mut req = request(vec!["CS-1336"], None);
        req.breaks.push(BreakInput {
            begin: "not-a-time".to_owned(),
            end: "13:00".to_owned(),
        });
        assert!(req.into_core(10, 50).is_err());
    }

    #[test]
    fn accepts_a_well_formed_request() {
        let req = request(vec!["CS-1336", "MATH-2417"], Some(5));
        let (courses, breaks, preferences, k) = req.into_core(10, 50).unwrap();
        assert_eq!(courses.len(), 2);
        assert!(breaks.is_empty());
        assert_eq!(preferences.time_weight, 0.5);
        assert_eq!(k, 5);
    }
}
