//! Hard-constraint checks over a generated schedule.
//!
//! [`validate_assignments`] never changes the schedule. Any violation means the
//! schedule must not be stored or exported; the usual fix is to adjust
//! availability or off requests and generate again.

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::domain::{ScheduleAssignment, ScheduleInput, Shift, MIN_SHIFT_UNITS};

/// A broken hard constraint.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error(
        "{date}: open/close minimum of {} not met ({}); {off_count} off, eligible open {eligible_open} / close {eligible_close}",
        MIN_SHIFT_UNITS,
        describe_floors(.missing)
    )]
    CoverageFloor {
        date: NaiveDate,
        missing: Vec<Shift>,
        off_count: usize,
        eligible_open: usize,
        eligible_close: usize,
    },

    #[error("{date}: unknown staff id '{staff_id}' assigned to {shift}")]
    UnknownStaff {
        date: NaiveDate,
        staff_id: String,
        shift: Shift,
    },

    #[error("{date}: {name} cannot work the {shift} shift")]
    ShiftUnavailable {
        date: NaiveDate,
        staff_id: String,
        name: String,
        shift: Shift,
    },

    #[error("{date}: {name} may only work {required}, assigned to {shift}")]
    RequiredShiftMismatch {
        date: NaiveDate,
        staff_id: String,
        name: String,
        required: Shift,
        shift: Shift,
    },

    #[error("{date}: '{staff_id}' is off but assigned to {shift}")]
    AssignedWhileOff {
        date: NaiveDate,
        staff_id: String,
        shift: Shift,
    },

    #[error("{date}: '{staff_id}' assigned {units} units (max 1)")]
    OverAssigned {
        date: NaiveDate,
        staff_id: String,
        units: f64,
    },

    #[error("{date}: no assignment for this date")]
    MissingDate { date: NaiveDate },

    #[error("{date}: more than one assignment for this date")]
    DuplicateDate { date: NaiveDate },
}

impl Violation {
    pub fn date(&self) -> NaiveDate {
        match self {
            Violation::CoverageFloor { date, .. }
            | Violation::UnknownStaff { date, .. }
            | Violation::ShiftUnavailable { date, .. }
            | Violation::RequiredShiftMismatch { date, .. }
            | Violation::AssignedWhileOff { date, .. }
            | Violation::OverAssigned { date, .. }
            | Violation::MissingDate { date }
            | Violation::DuplicateDate { date } => *date,
        }
    }
}

fn describe_floors(missing: &[Shift]) -> String {
    missing
        .iter()
        .map(|s| format!("{}<{}", s, MIN_SHIFT_UNITS))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Checks every day of `assignments` against the input it was generated from.
pub fn validate_assignments(
    input: &ScheduleInput,
    assignments: &[ScheduleAssignment],
) -> Vec<Violation> {
    let requests = input.requests_by_date();
    let mut violations = Vec::new();
    let mut seen = HashSet::new();

    for day in assignments {
        if !seen.insert(day.date) {
            violations.push(Violation::DuplicateDate { date: day.date });
        }
        let request = requests.get(&day.date).copied();
        let is_off = |id: &str| request.is_some_and(|r| r.is_off(id));

        let missing: Vec<Shift> = [Shift::Open, Shift::Close]
            .into_iter()
            .filter(|&shift| day.units(shift) < MIN_SHIFT_UNITS)
            .collect();
        if !missing.is_empty() {
            let eligible = |shift: Shift| {
                input
                    .staff
                    .iter()
                    .filter(|s| !is_off(&s.id) && s.can_work(shift))
                    .count()
            };
            violations.push(Violation::CoverageFloor {
                date: day.date,
                missing,
                off_count: request.map_or(0, |r| r.off_staff_ids.len()),
                eligible_open: eligible(Shift::Open),
                eligible_close: eligible(Shift::Close),
            });
        }

        let mut units: HashMap<&str, f64> = HashMap::new();
        for (shift, slot) in day.slots() {
            *units.entry(slot.staff_id.as_str()).or_default() += slot.unit.value();

            match input.staff_by_id(&slot.staff_id) {
                None => violations.push(Violation::UnknownStaff {
                    date: day.date,
                    staff_id: slot.staff_id.clone(),
                    shift,
                }),
                Some(member) => {
                    if !member.is_available_for(shift) {
                        violations.push(Violation::ShiftUnavailable {
                            date: day.date,
                            staff_id: member.id.clone(),
                            name: member.name.clone(),
                            shift,
                        });
                    }
                    if let Some(required) = member.required_shift.filter(|r| *r != shift) {
                        violations.push(Violation::RequiredShiftMismatch {
                            date: day.date,
                            staff_id: member.id.clone(),
                            name: member.name.clone(),
                            required,
                            shift,
                        });
                    }
                }
            }
            if is_off(&slot.staff_id) {
                violations.push(Violation::AssignedWhileOff {
                    date: day.date,
                    staff_id: slot.staff_id.clone(),
                    shift,
                });
            }
        }

        let mut over: Vec<(&str, f64)> = units.into_iter().filter(|(_, u)| *u > 1.0).collect();
        over.sort_by(|a, b| a.0.cmp(b.0));
        for (staff_id, units) in over {
            violations.push(Violation::OverAssigned {
                date: day.date,
                staff_id: staff_id.to_string(),
                units,
            });
        }
    }

    for date in input.period.dates() {
        if !seen.contains(&date) {
            violations.push(Violation::MissingDate { date });
        }
    }

    violations
}
