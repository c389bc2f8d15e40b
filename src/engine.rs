//! Day-by-day assignment engine.
//!
//! Each date is planned independently in four steps: fix half-day requests,
//! enforce the open/close floor, then greedily fill up to the day's target
//! headcount. The only state carried across days is the [`Workload`] tally,
//! which makes less-worked staff slightly more attractive on later days.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::domain::{
    DayRequest, ScheduleAssignment, ScheduleInput, ScheduleStats, Shift, StaffMember, Unit,
    WorkRules, MIN_SHIFT_UNITS,
};
use crate::scoring::{best_shift_for, pick_best, score, TieBreak, Workload};
use crate::stats::compute_stats;

/// Assignments plus the workload tally of the run that produced them.
#[derive(Debug, Clone)]
pub struct Generation {
    pub assignments: Vec<ScheduleAssignment>,
    pub workload: Workload,
}

/// The payload a caller stores or exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSchedule {
    pub assignments: Vec<ScheduleAssignment>,
    pub stats: Vec<ScheduleStats>,
}

/// Generates assignments and statistics in one call.
///
/// The input is expected to have passed [`crate::validation::validate_inputs`].
pub fn generate_schedule<B>(input: &ScheduleInput, tie: &mut B) -> GeneratedSchedule
where
    B: TieBreak + ?Sized,
{
    let generation = assign(input, tie);
    let stats = compute_stats(input, &generation.assignments, &generation.workload);
    GeneratedSchedule {
        assignments: generation.assignments,
        stats,
    }
}

/// Plans every date of the input period.
pub fn assign<B>(input: &ScheduleInput, tie: &mut B) -> Generation
where
    B: TieBreak + ?Sized,
{
    let requests = input.requests_by_date();
    let mut workload = Workload::new();
    let mut assignments = Vec::new();

    for date in input.period.dates() {
        let fallback = DayRequest::empty(date);
        let request = requests.get(&date).copied().unwrap_or(&fallback);
        let day = DayPlanner::new(&input.staff, &input.work_rules, request, &mut workload)
            .plan(tie);
        assignments.push(day);
    }

    Generation {
        assignments,
        workload,
    }
}

/// Target units the greedy fill works towards.
///
/// Never below 1.0, since the open and close floors alone add up to that.
pub fn need_for_fill(rules: &WorkRules, need_delta: f64) -> f64 {
    rules.need_for(need_delta).max(MIN_SHIFT_UNITS * 2.0)
}

struct DayPlanner<'a> {
    staff: &'a [StaffMember],
    rules: &'a WorkRules,
    request: &'a DayRequest,
    workload: &'a mut Workload,
    assigned: HashSet<&'a str>,
    day: ScheduleAssignment,
}

impl<'a> DayPlanner<'a> {
    fn new(
        staff: &'a [StaffMember],
        rules: &'a WorkRules,
        request: &'a DayRequest,
        workload: &'a mut Workload,
    ) -> Self {
        Self {
            staff,
            rules,
            request,
            workload,
            assigned: HashSet::new(),
            day: ScheduleAssignment::new(request.date),
        }
    }

    fn plan<B: TieBreak + ?Sized>(mut self, tie: &mut B) -> ScheduleAssignment {
        let target = need_for_fill(self.rules, self.request.need_delta);

        self.fix_half_requests(tie);
        for shift in [Shift::Open, Shift::Close] {
            if self.day.units(shift) < MIN_SHIFT_UNITS && !self.cover_floor(shift, tie) {
                debug!(date = %self.request.date, shift = %shift, "No eligible staff for floor");
            }
        }
        self.fill_to(target, tie);

        debug!(
            date = %self.request.date,
            need = target,
            units = self.day.total_units(),
            "Day planned"
        );
        self.day
    }

    /// Whether a member can still be placed today.
    fn is_free(&self, staff: &StaffMember) -> bool {
        !self.request.is_off(&staff.id) && !self.assigned.contains(staff.id.as_str())
    }

    fn place(&mut self, staff: &'a StaffMember, shift: Shift, unit: Unit) {
        self.day.push(shift, staff.id.clone(), unit);
        self.workload.add(&staff.id, unit);
        self.assigned.insert(staff.id.as_str());
    }

    /// Half-day requests are fixed first. An invalid shift is re-resolved to
    /// the member's best shift rather than dropped.
    fn fix_half_requests<B: TieBreak + ?Sized>(&mut self, tie: &mut B) {
        let request = self.request;
        let roster = self.staff;
        for half in &request.half_staff {
            if request.is_off(&half.staff_id) || self.assigned.contains(half.staff_id.as_str()) {
                continue;
            }
            let Some(staff) = roster.iter().find(|s| s.id == half.staff_id) else {
                continue;
            };
            let shift = if staff.can_work(half.shift) {
                Some(half.shift)
            } else {
                best_shift_for(staff, self.workload, tie)
            };
            if let Some(shift) = shift {
                self.place(staff, shift, Unit::Half);
            }
        }
    }

    /// Puts one full-unit member on `shift`. Returns false if nobody is eligible.
    fn cover_floor<B: TieBreak + ?Sized>(&mut self, shift: Shift, tie: &mut B) -> bool {
        let staff = self.staff;
        let candidates: Vec<(&'a StaffMember, f64)> = staff
            .iter()
            .filter(|s| self.is_free(s) && s.can_work(shift))
            .map(|s| (s, score(s, shift, self.workload)))
            .collect();

        match pick_best(candidates, tie) {
            Some(best) => {
                self.place(best, shift, Unit::Full);
                true
            }
            None => false,
        }
    }

    /// Adds the best remaining (member, own best shift) pair until the target
    /// is met or the pool runs dry.
    fn fill_to<B: TieBreak + ?Sized>(&mut self, target: f64, tie: &mut B) {
        let staff = self.staff;
        while self.day.total_units() < target {
            let pool: Vec<&'a StaffMember> = staff.iter().filter(|s| self.is_free(s)).collect();
            if pool.is_empty() {
                break;
            }

            let mut candidates = Vec::with_capacity(pool.len());
            for member in pool {
                if let Some(shift) = best_shift_for(member, self.workload, tie) {
                    candidates.push(((member, shift), score(member, shift, self.workload)));
                }
            }

            match pick_best(candidates, tie) {
                Some((member, shift)) => self.place(member, shift, Unit::Full),
                None => break,
            }
        }
    }
}
