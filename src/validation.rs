//! Pre-generation input validation.
//!
//! Every check runs; nothing short-circuits. A non-empty result means the
//! engine must not run.

use chrono::NaiveDate;
use std::collections::HashSet;
use thiserror::Error;

use crate::calendar::{self, MAX_SPAN_DAYS};
use crate::domain::{Period, ScheduleInput, Shift, StaffMember, WorkRules};

/// A problem with the input that blocks generation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("start date '{0}' is not a valid YYYY-MM-DD date")]
    MalformedStartDate(String),

    #[error("end date '{0}' is not a valid YYYY-MM-DD date")]
    MalformedEndDate(String),

    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("period spans {days} days; at most {} are allowed", MAX_SPAN_DAYS + 1)]
    SpanTooLong { days: i64 },

    #[error("{year}-{month} is not a valid month")]
    InvalidMonth { year: i32, month: u32 },

    #[error("at least one staff member is required")]
    NoStaff,

    #[error("staff #{} has no name", .index + 1)]
    BlankName { index: usize },

    #[error("staff id '{0}' is used more than once")]
    DuplicateStaffId(String),

    #[error("{name} has no available shifts")]
    NoAvailableShifts { name: String },

    #[error("{name}: required shift {shift} is not in the available shifts")]
    RequiredShiftUnavailable { name: String, shift: Shift },

    #[error("{name}: preferred shift {shift} is not in the available shifts")]
    PreferredShiftUnavailable { name: String, shift: Shift },

    #[error("daily staff base must be at least 0.5 (got {0})")]
    BaseTooLow(f64),

    #[error("daily staff max {max} is below the base {base}")]
    MaxBelowBase { base: f64, max: f64 },

    #[error("work hours must be positive (got {0})")]
    NonPositiveWorkHours(f64),

    #[error("break hours must not be negative (got {0})")]
    NegativeBreakHours(f64),

    #[error("roster preset needs a name")]
    BlankPresetName,
}

/// Runs every input check and returns all failures.
///
/// ```
/// use shift_scheduling::domain::{Period, ScheduleInput, WorkRules};
/// use shift_scheduling::validation::{validate_inputs, InputError};
///
/// let input = ScheduleInput::new(
///     Period::Range { start: "2025-02-30".into(), end: "2025-03-01".into() },
///     WorkRules::default(),
///     vec![],
/// );
/// let errors = validate_inputs(&input);
/// assert!(errors.contains(&InputError::MalformedStartDate("2025-02-30".into())));
/// assert!(errors.contains(&InputError::NoStaff));
/// ```
pub fn validate_inputs(input: &ScheduleInput) -> Vec<InputError> {
    let mut errors = validate_period(&input.period);
    errors.extend(validate_staff(&input.staff));
    errors.extend(validate_work_rules(&input.work_rules));
    errors
}

pub fn validate_period(period: &Period) -> Vec<InputError> {
    let mut errors = Vec::new();
    match period {
        Period::Range { start, end } => {
            let start_date = calendar::parse_iso_date(start);
            let end_date = calendar::parse_iso_date(end);
            if start_date.is_none() {
                errors.push(InputError::MalformedStartDate(start.clone()));
            }
            if end_date.is_none() {
                errors.push(InputError::MalformedEndDate(end.clone()));
            }
            if let (Some(start), Some(end)) = (start_date, end_date) {
                if end < start {
                    errors.push(InputError::EndBeforeStart { start, end });
                } else if calendar::span_days(start, end) > MAX_SPAN_DAYS {
                    errors.push(InputError::SpanTooLong {
                        days: calendar::span_days(start, end) + 1,
                    });
                }
            }
        }
        Period::Month { year, month } => {
            if calendar::month_bounds(*year, *month).is_none() {
                errors.push(InputError::InvalidMonth {
                    year: *year,
                    month: *month,
                });
            }
        }
    }
    errors
}

pub fn validate_staff(staff: &[StaffMember]) -> Vec<InputError> {
    let mut errors = Vec::new();
    if staff.is_empty() {
        errors.push(InputError::NoStaff);
        return errors;
    }

    let mut seen = HashSet::new();
    for (index, member) in staff.iter().enumerate() {
        if member.name.trim().is_empty() {
            errors.push(InputError::BlankName { index });
        }
        if !seen.insert(member.id.as_str()) {
            errors.push(InputError::DuplicateStaffId(member.id.clone()));
        }

        let name = display_name(member);
        if member.available_shifts.is_empty() {
            errors.push(InputError::NoAvailableShifts { name: name.clone() });
        }
        if let Some(shift) = member.required_shift {
            if !member.is_available_for(shift) {
                errors.push(InputError::RequiredShiftUnavailable {
                    name: name.clone(),
                    shift,
                });
            }
        }
        if let Some(shift) = member.preferred_shift {
            if !member.is_available_for(shift) {
                errors.push(InputError::PreferredShiftUnavailable { name, shift });
            }
        }
    }
    errors
}

/// Checks a named staff roster before it is saved as a preset.
pub fn validate_preset(name: &str, staff: &[StaffMember]) -> Vec<InputError> {
    let mut errors = Vec::new();
    if name.trim().is_empty() {
        errors.push(InputError::BlankPresetName);
    }
    errors.extend(validate_staff(staff));
    errors
}

/// Checks work rules on their own, as used when rules are saved separately.
pub fn validate_work_rules(rules: &WorkRules) -> Vec<InputError> {
    let mut errors = Vec::new();
    // Negated comparisons so NaN fails too.
    if !(rules.daily_staff_base >= 0.5) {
        errors.push(InputError::BaseTooLow(rules.daily_staff_base));
    }
    if !(rules.daily_staff_max >= rules.daily_staff_base) {
        errors.push(InputError::MaxBelowBase {
            base: rules.daily_staff_base,
            max: rules.daily_staff_max,
        });
    }
    if !(rules.work_hours > 0.0) {
        errors.push(InputError::NonPositiveWorkHours(rules.work_hours));
    }
    if !(rules.break_hours >= 0.0) {
        errors.push(InputError::NegativeBreakHours(rules.break_hours));
    }
    errors
}

fn display_name(member: &StaffMember) -> String {
    let name = member.name.trim();
    if name.is_empty() {
        "(unnamed)".to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: &str, end: &str) -> Period {
        Period::Range {
            start: start.into(),
            end: end.into(),
        }
    }

    fn input(period: Period, staff: Vec<StaffMember>) -> ScheduleInput {
        ScheduleInput::new(period, WorkRules::default(), staff)
    }

    #[test]
    fn test_preset_checks() {
        let staff = vec![StaffMember::new("a", "Ana")];
        assert!(validate_preset("Weekdays", &staff).is_empty());
        assert_eq!(validate_preset("  ", &staff), vec![InputError::BlankPresetName]);
        assert_eq!(
            validate_preset("", &[]),
            vec![InputError::BlankPresetName, InputError::NoStaff]
        );
    }

    #[test]
    fn test_valid_input_has_no_errors() {
        let input = input(
            range("2025-01-01", "2025-01-31"),
            vec![StaffMember::new("a", "Ana"), StaffMember::new("b", "Bo")],
        );
        assert!(validate_inputs(&input).is_empty());
    }

    #[test]
    fn test_errors_accumulate() {
        let mut input = input(
            range("2025-03-10", "2025-03-01"),
            vec![StaffMember::new("a", " ").with_shifts(Vec::<Shift>::new())],
        );
        input.work_rules.daily_staff_base = 0.0;
        input.work_rules.break_hours = -1.0;

        let errors = validate_inputs(&input);
        assert!(errors.iter().any(|e| matches!(e, InputError::EndBeforeStart { .. })));
        assert!(errors.contains(&InputError::BlankName { index: 0 }));
        assert!(errors.contains(&InputError::NoAvailableShifts {
            name: "(unnamed)".into()
        }));
        assert!(errors.contains(&InputError::BaseTooLow(0.0)));
        assert!(errors.contains(&InputError::NegativeBreakHours(-1.0)));
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn test_span_limit() {
        let staff = vec![StaffMember::new("a", "Ana")];
        // 2024 is a leap year: 2024-01-01..=2025-01-05 is 371 dates.
        let leap = input(range("2024-01-01", "2025-01-05"), staff.clone());
        assert!(validate_inputs(&leap).is_empty());
        assert_eq!(
            validate_inputs(&input(range("2024-01-01", "2025-01-06"), staff)),
            vec![InputError::SpanTooLong { days: 372 }]
        );
    }

    #[test]
    fn test_malformed_dates_are_reported_separately() {
        let errors = validate_period(&range("2025-1-01", "tomorrow"));
        assert_eq!(
            errors,
            vec![
                InputError::MalformedStartDate("2025-1-01".into()),
                InputError::MalformedEndDate("tomorrow".into()),
            ]
        );
    }

    #[test]
    fn test_month_period() {
        assert!(validate_period(&Period::Month { year: 2025, month: 12 }).is_empty());
        assert_eq!(
            validate_period(&Period::Month { year: 2025, month: 13 }),
            vec![InputError::InvalidMonth { year: 2025, month: 13 }]
        );
    }

    #[test]
    fn test_shift_membership_checks() {
        let staff = vec![
            StaffMember::new("a", "Ana")
                .with_shifts([Shift::Open])
                .with_required(Shift::Close)
                .with_preferred(Shift::Middle),
            StaffMember::new("a", "Ana 2"),
        ];
        let errors = validate_staff(&staff);
        assert_eq!(
            errors,
            vec![
                InputError::RequiredShiftUnavailable {
                    name: "Ana".into(),
                    shift: Shift::Close
                },
                InputError::PreferredShiftUnavailable {
                    name: "Ana".into(),
                    shift: Shift::Middle
                },
                InputError::DuplicateStaffId("a".into()),
            ]
        );
    }

    #[test]
    fn test_work_rules_reject_nan() {
        let rules = WorkRules {
            daily_staff_base: f64::NAN,
            daily_staff_max: 3.0,
            work_hours: 0.0,
            break_hours: 1.0,
        };
        let errors = validate_work_rules(&rules);
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&InputError::NonPositiveWorkHours(0.0)));
    }

    #[test]
    fn test_messages_are_readable() {
        assert_eq!(
            InputError::BlankName { index: 2 }.to_string(),
            "staff #3 has no name"
        );
        assert_eq!(
            InputError::SpanTooLong { days: 400 }.to_string(),
            "period spans 400 days; at most 371 are allowed"
        );
    }
}
