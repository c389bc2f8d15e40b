//! DTOs for REST API requests/responses.
//!
//! Older clients send a `year`/`month` pair instead of an explicit range and a
//! boolean `needBoost` instead of `needDelta`. Both are normalized here so the
//! engine only ever sees [`ScheduleInput`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    DayRequest, HalfRequest, Period, ScheduleAssignment, ScheduleInput, StaffMember, WorkRules,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRequestDto {
    #[serde(rename = "dateISO")]
    pub date: NaiveDate,
    #[serde(default)]
    pub off_staff_ids: Vec<String>,
    #[serde(default)]
    pub half_staff: Vec<HalfRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub need_delta: Option<f64>,
    /// Deprecated: `true` means a delta of one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub need_boost: Option<bool>,
}

impl DayRequestDto {
    pub fn to_request(&self) -> DayRequest {
        let need_delta = match self.need_delta {
            Some(delta) if delta.is_finite() => delta,
            _ if self.need_boost == Some(true) => 1.0,
            _ => 0.0,
        };
        DayRequest {
            date: self.date,
            off_staff_ids: self.off_staff_ids.clone(),
            half_staff: self.half_staff.clone(),
            need_delta,
        }
    }
}

impl From<DayRequestDto> for DayRequest {
    fn from(dto: DayRequestDto) -> Self {
        dto.to_request()
    }
}

impl From<&DayRequest> for DayRequestDto {
    fn from(r: &DayRequest) -> Self {
        Self {
            date: r.date,
            off_staff_ids: r.off_staff_ids.clone(),
            half_staff: r.half_staff.clone(),
            need_delta: Some(r.need_delta),
            need_boost: None,
        }
    }
}

/// Schedule input as sent by clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInputDto {
    #[serde(rename = "startDateISO", default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(rename = "endDateISO", default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Deprecated: whole-month period, used when no range is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_rules: Option<WorkRules>,
    #[serde(default)]
    pub staff: Vec<StaffMember>,
    #[serde(default)]
    pub requests: Vec<DayRequestDto>,
}

impl ScheduleInputDto {
    pub fn from_input(input: &ScheduleInput) -> Self {
        let (start_date, end_date, year, month) = match &input.period {
            Period::Range { start, end } => (Some(start.clone()), Some(end.clone()), None, None),
            Period::Month { year, month } => (None, None, Some(*year), Some(*month)),
        };
        Self {
            start_date,
            end_date,
            year,
            month,
            work_rules: Some(input.work_rules),
            staff: input.staff.clone(),
            requests: input.requests.iter().map(DayRequestDto::from).collect(),
        }
    }

    /// Normalizes to the canonical input. `default_rules` apply when the
    /// client sent none.
    ///
    /// A partial range wins over `year`/`month`; the missing end then fails
    /// validation instead of silently falling back to a month.
    pub fn to_input(&self, default_rules: WorkRules) -> ScheduleInput {
        let period = match (&self.start_date, &self.end_date, self.year, self.month) {
            (None, None, Some(year), Some(month)) => Period::Month { year, month },
            (start, end, _, _) => Period::Range {
                start: start.clone().unwrap_or_default(),
                end: end.clone().unwrap_or_default(),
            },
        };
        ScheduleInput {
            period,
            work_rules: self.work_rules.unwrap_or(default_rules),
            staff: self.staff.clone(),
            requests: self.requests.iter().map(DayRequestDto::to_request).collect(),
        }
    }
}

/// Body of `POST /schedules`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveScheduleRequest {
    #[serde(flatten)]
    pub input: ScheduleInputDto,
    /// Set when regenerating from an existing schedule.
    #[serde(default)]
    pub edit_source_schedule_id: Option<String>,
}

/// Body of `POST /staff-presets`. An `id` overwrites that preset.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffPresetRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub staff: Vec<StaffMember>,
}

/// Body of `PUT /schedules/analyze`: assignments to re-check against an input.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(flatten)]
    pub input: ScheduleInputDto,
    #[serde(default)]
    pub assignments: Vec<ScheduleAssignment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_need_boost() {
        let dto: DayRequestDto =
            serde_json::from_str(r#"{"dateISO":"2025-04-01","needBoost":true}"#).unwrap();
        assert_eq!(dto.to_request().need_delta, 1.0);

        let dto: DayRequestDto = serde_json::from_str(
            r#"{"dateISO":"2025-04-01","needBoost":true,"needDelta":0.5}"#,
        )
        .unwrap();
        assert_eq!(dto.to_request().need_delta, 0.5);

        let dto: DayRequestDto = serde_json::from_str(r#"{"dateISO":"2025-04-01"}"#).unwrap();
        let request = dto.to_request();
        assert_eq!(request.need_delta, 0.0);
        assert!(request.off_staff_ids.is_empty());
    }

    #[test]
    fn test_legacy_year_month() {
        let dto: ScheduleInputDto = serde_json::from_str(
            r#"{"year":2025,"month":2,"staff":[{"id":"a","name":"Ana","availableShifts":["open"]}]}"#,
        )
        .unwrap();
        let input = dto.to_input(WorkRules::default());
        assert_eq!(input.period, Period::Month { year: 2025, month: 2 });
        assert_eq!(input.period.dates().len(), 28);
        assert_eq!(input.work_rules, WorkRules::default());
    }

    #[test]
    fn test_explicit_range_wins() {
        let dto: ScheduleInputDto = serde_json::from_str(
            r#"{"startDateISO":"2025-01-30","endDateISO":"2025-02-02","year":2024,"month":1,
                "workRules":{"dailyStaffBase":1,"dailyStaffMax":2,"workHours":6,"breakHours":0.5}}"#,
        )
        .unwrap();
        let input = dto.to_input(WorkRules::default());
        assert_eq!(input.period.dates().len(), 4);
        assert_eq!(input.work_rules.daily_staff_max, 2.0);
    }

    #[test]
    fn test_partial_range_does_not_fall_back_to_month() {
        let dto = ScheduleInputDto {
            start_date: Some("2025-01-01".into()),
            year: Some(2025),
            month: Some(1),
            ..ScheduleInputDto::default()
        };
        let input = dto.to_input(WorkRules::default());
        assert!(matches!(input.period, Period::Range { ref end, .. } if end.is_empty()));
    }

    #[test]
    fn test_save_request_flattens_input() {
        let body: SaveScheduleRequest = serde_json::from_str(
            r#"{"startDateISO":"2025-01-01","endDateISO":"2025-01-02","staff":[],"editSourceScheduleId":"old"}"#,
        )
        .unwrap();
        assert_eq!(body.edit_source_schedule_id.as_deref(), Some("old"));
        assert_eq!(body.input.start_date.as_deref(), Some("2025-01-01"));
    }

    #[test]
    fn test_input_round_trip_keeps_requests() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
        let input = ScheduleInput::new(
            Period::range(date, date),
            WorkRules::default(),
            vec![StaffMember::new("a", "Ana")],
        )
        .with_request(DayRequest::empty(date).with_off("a").with_need_delta(0.5));

        let back = ScheduleInputDto::from_input(&input).to_input(WorkRules::default());
        assert_eq!(back, input);
    }
}
