//! Generation pipeline: validate inputs, generate, re-check hard constraints.

use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

use crate::constraints::{validate_assignments, Violation};
use crate::domain::ScheduleInput;
use crate::engine::{generate_schedule, GeneratedSchedule};
use crate::scoring::TieBreak;
use crate::validation::{validate_inputs, InputError};

/// Why a schedule could not be produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// The input failed validation; generation did not run.
    #[error("invalid input: {}", join(.0))]
    InvalidInput(Vec<InputError>),

    /// Generation ran but the result breaks hard constraints. `preview` holds
    /// the result so callers can show where coverage is missing.
    #[error("schedule violates hard constraints: {}", join(.violations))]
    Infeasible {
        violations: Vec<Violation>,
        preview: GeneratedSchedule,
    },
}

impl PlanError {
    /// Human-readable message per underlying error.
    pub fn messages(&self) -> Vec<String> {
        match self {
            PlanError::InvalidInput(errors) => errors.iter().map(ToString::to_string).collect(),
            PlanError::Infeasible { violations, .. } => {
                violations.iter().map(ToString::to_string).collect()
            }
        }
    }
}

fn join<E: ToString>(errors: &[E]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Runs the full pipeline.
///
/// Only a schedule that passed both validators is returned as `Ok`.
pub fn plan<B>(input: &ScheduleInput, tie: &mut B) -> Result<GeneratedSchedule, PlanError>
where
    B: TieBreak + ?Sized,
{
    let errors = validate_inputs(input);
    if !errors.is_empty() {
        warn!(errors = errors.len(), "Rejected schedule input");
        return Err(PlanError::InvalidInput(errors));
    }

    let start = Instant::now();
    let generated = generate_schedule(input, tie);
    let violations = validate_assignments(input, &generated.assignments);

    info!(
        days = generated.assignments.len(),
        staff = input.staff.len(),
        violations = violations.len(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "Generated schedule"
    );

    if violations.is_empty() {
        Ok(generated)
    } else {
        Err(PlanError::Infeasible {
            violations,
            preview: generated,
        })
    }
}
