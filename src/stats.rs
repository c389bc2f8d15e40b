//! Per-member statistics derived from a generated schedule.

use crate::domain::{ScheduleAssignment, ScheduleInput, ScheduleStats};
use crate::scoring::Workload;

/// Counts off, half and full days per roster member.
///
/// `work_units` is read from the workload tally of the same generation run,
/// so `workload` must come from the call that produced `assignments`.
pub fn compute_stats(
    input: &ScheduleInput,
    assignments: &[ScheduleAssignment],
    workload: &Workload,
) -> Vec<ScheduleStats> {
    let requests = input.requests_by_date();

    input
        .staff
        .iter()
        .map(|member| {
            let mut stats = ScheduleStats {
                staff_id: member.id.clone(),
                name: member.name.clone(),
                off_days: 0,
                half_days: 0,
                full_days: 0,
                work_units: workload.get(&member.id),
            };

            for day in assignments {
                if requests
                    .get(&day.date)
                    .is_some_and(|r| r.is_off(&member.id))
                {
                    stats.off_days += 1;
                    continue;
                }
                let units = day.units_for(&member.id);
                if units == 0.5 {
                    stats.half_days += 1;
                } else if units >= 1.0 {
                    stats.full_days += 1;
                }
            }
            stats
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DayRequest, Period, Shift, StaffMember, Unit, WorkRules};
    use crate::engine::generate_schedule;
    use crate::scoring::RandomTieBreak;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, d).unwrap()
    }

    #[test]
    fn test_counts_from_hand_built_days() {
        let input = ScheduleInput::new(
            Period::range(date(1), date(3)),
            WorkRules::default(),
            vec![StaffMember::new("a", "Ana")],
        )
        .with_request(DayRequest::empty(date(3)).with_off("a"));

        let mut d1 = ScheduleAssignment::new(date(1));
        d1.push(Shift::Open, "a", Unit::Full);
        let mut d2 = ScheduleAssignment::new(date(2));
        d2.push(Shift::Middle, "a", Unit::Half);
        let d3 = ScheduleAssignment::new(date(3));

        let mut workload = Workload::new();
        workload.add("a", Unit::Full);
        workload.add("a", Unit::Half);

        let stats = compute_stats(&input, &[d1, d2, d3], &workload);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].name, "Ana");
        assert_eq!(stats[0].full_days, 1);
        assert_eq!(stats[0].half_days, 1);
        assert_eq!(stats[0].off_days, 1);
        assert_eq!(stats[0].work_units, 1.5);
    }

    #[test]
    fn test_thirty_day_consistency() {
        // "a" must work every day it is not off: it is the only opener.
        let staff = vec![
            StaffMember::new("a", "Ana").with_shifts([Shift::Open]),
            StaffMember::new("b", "Bo").with_shifts([Shift::Close]),
            StaffMember::new("c", "Cy").with_shifts([Shift::Open]),
        ];
        let mut input = ScheduleInput::new(
            Period::range(date(1), date(30)),
            WorkRules {
                daily_staff_base: 1.0,
                daily_staff_max: 1.0,
                ..WorkRules::default()
            },
            staff,
        );
        for d in 1..=30 {
            let mut request = DayRequest::empty(date(d));
            if d <= 5 {
                request = request.with_off("a");
            } else if d <= 7 {
                request = request.with_half("a", Shift::Open);
            } else {
                request = request.with_off("c");
            }
            input.requests.push(request);
        }

        let generated = generate_schedule(&input, &mut RandomTieBreak::seeded(4));
        let ana = &generated.stats[0];
        assert_eq!(ana.off_days, 5);
        assert_eq!(ana.half_days, 2);
        assert_eq!(ana.full_days, 23);
        assert_eq!(ana.work_units, 24.0);

        let bo = &generated.stats[1];
        assert_eq!(bo.full_days, 30);
        assert_eq!(bo.work_units, 30.0);
    }
}
