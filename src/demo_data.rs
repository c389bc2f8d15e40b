//! Demo data generators for Shift Scheduling.

use chrono::{Datelike, Weekday};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::{DayRequest, Period, ScheduleInput, Shift, StaffMember, WorkRules};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoData {
    Small,
    Large,
}

impl std::str::FromStr for DemoData {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SMALL" => Ok(DemoData::Small),
            "LARGE" => Ok(DemoData::Large),
            _ => Err(()),
        }
    }
}

impl DemoData {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemoData::Small => "SMALL",
            DemoData::Large => "LARGE",
        }
    }
}

/// List of available demo data sets.
pub fn list_demo_data() -> Vec<&'static str> {
    vec!["SMALL", "LARGE"]
}

/// Generates a demo input for the given size.
///
/// Rosters are built so every day can meet the open/close floor: off and
/// half-day requests never take out all openers or all closers.
pub fn generate(demo: DemoData) -> ScheduleInput {
    match demo {
        DemoData::Small => generate_small(),
        DemoData::Large => generate_large(),
    }
}

/// Five people over four weeks starting Monday 2025-03-03.
fn generate_small() -> ScheduleInput {
    let mut rng = StdRng::seed_from_u64(0);
    let staff = vec![
        StaffMember::new("mina", "Mina")
            .with_shifts([Shift::Open, Shift::Middle])
            .with_required(Shift::Open)
            .with_priority(3.0, 0.0, 0.0),
        StaffMember::new("sora", "Sora")
            .with_shifts([Shift::Open, Shift::Middle])
            .with_preferred(Shift::Open)
            .with_priority(2.0, 2.0, 0.0),
        StaffMember::new("yuna", "Yuna")
            .with_shifts([Shift::Middle, Shift::Close])
            .with_required(Shift::Close)
            .with_priority(0.0, 1.0, 3.0),
        StaffMember::new("jisoo", "Jisoo")
            .with_shifts([Shift::Middle, Shift::Close])
            .with_preferred(Shift::Close)
            .with_priority(0.0, 2.0, 2.0),
        StaffMember::new("hana", "Hana").with_priority(1.0, 1.0, 1.0),
    ];

    let period = Period::Range {
        start: "2025-03-03".to_string(),
        end: "2025-03-30".to_string(),
    };
    let mut input = ScheduleInput::new(period, WorkRules::default(), Vec::new());

    for (day_idx, date) in input.period.dates().into_iter().enumerate() {
        let mut request = DayRequest::empty(date);
        // Rotating single day off per member.
        if let Some(member) = staff.get(day_idx % 7) {
            request = request.with_off(member.id.clone());
        }
        if !request.is_off("hana") && rng.gen_bool(0.2) {
            request = request.with_half("hana", Shift::Middle);
        }
        if matches!(date.weekday(), Weekday::Fri | Weekday::Sat) {
            request = request.with_need_delta(1.0);
        }
        input.requests.push(request);
    }

    input.staff = staff;
    input
}

const LARGE_NAMES: [&str; 12] = [
    "Amy", "Beth", "Carl", "Dan", "Elsa", "Flo", "Gus", "Hugo", "Ivy", "Jay", "Kim", "Luke",
];

/// Twelve people in three groups of four over eight weeks: openers, closers
/// and a flexible group that is the only one taking half days.
fn generate_large() -> ScheduleInput {
    let mut rng = StdRng::seed_from_u64(0);

    let staff: Vec<StaffMember> = LARGE_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let member = StaffMember::new(format!("staff-{}", i), *name);
            let jitter = rng.gen_range(0..3) as f64;
            match i / 4 {
                0 => {
                    let member = member
                        .with_shifts([Shift::Open, Shift::Middle])
                        .with_priority(3.0 + jitter, 1.0, 0.0);
                    if i % 2 == 0 {
                        member.with_required(Shift::Open)
                    } else {
                        member.with_preferred(Shift::Open)
                    }
                }
                1 => {
                    let member = member
                        .with_shifts([Shift::Middle, Shift::Close])
                        .with_priority(0.0, 1.0, 3.0 + jitter);
                    if i % 2 == 0 {
                        member.with_required(Shift::Close)
                    } else {
                        member.with_preferred(Shift::Close)
                    }
                }
                _ => member
                    .with_priority(1.0 + jitter, 2.0, 1.0)
                    .with_preferred(Shift::Middle),
            }
        })
        .collect();

    let rules = WorkRules {
        daily_staff_base: 4.0,
        daily_staff_max: 6.0,
        ..WorkRules::default()
    };
    let period = Period::Range {
        start: "2025-03-03".to_string(),
        end: "2025-04-27".to_string(),
    };
    let mut input = ScheduleInput::new(period, rules, Vec::new());

    let delta_choices = [0.0, 0.0, 0.0, 0.5, 1.0, 2.0];
    for date in input.period.dates() {
        let mut request = DayRequest::empty(date);
        for group in staff.chunks(4) {
            let off_count = rng.gen_range(0..=2);
            for member in group.choose_multiple(&mut rng, off_count) {
                request = request.with_off(member.id.clone());
            }
        }
        for member in &staff[8..] {
            if !request.is_off(&member.id) && rng.gen_bool(0.15) {
                let shift = *Shift::ALL.choose(&mut rng).unwrap_or(&Shift::Middle);
                request = request.with_half(member.id.clone(), shift);
            }
        }
        let delta = *delta_choices.choose(&mut rng).unwrap_or(&0.0);
        request = request.with_need_delta(delta);
        input.requests.push(request);
    }

    input.staff = staff;
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::plan;
    use crate::scoring::RandomTieBreak;
    use crate::validation::validate_inputs;

    #[test]
    fn test_demo_data_parsing() {
        assert_eq!("small".parse::<DemoData>(), Ok(DemoData::Small));
        assert_eq!("LARGE".parse::<DemoData>(), Ok(DemoData::Large));
        assert!("huge".parse::<DemoData>().is_err());
        for id in list_demo_data() {
            assert_eq!(id.parse::<DemoData>().map(|d| d.as_str()), Ok(id));
        }
    }

    #[test]
    fn test_demo_data_is_deterministic() {
        assert_eq!(generate(DemoData::Small), generate(DemoData::Small));
        assert_eq!(generate(DemoData::Large), generate(DemoData::Large));
    }

    #[test]
    fn test_small_shape() {
        let input = generate(DemoData::Small);
        assert_eq!(input.staff.len(), 5);
        assert_eq!(input.requests.len(), 28);
        assert!(validate_inputs(&input).is_empty());
    }

    #[test]
    fn test_large_shape() {
        let input = generate(DemoData::Large);
        assert_eq!(input.staff.len(), 12);
        assert_eq!(input.requests.len(), 56);
        assert!(validate_inputs(&input).is_empty());
        for request in &input.requests {
            assert!(request.off_staff_ids.len() <= 6);
            assert!(request
                .half_staff
                .iter()
                .all(|h| input.staff[8..].iter().any(|s| s.id == h.staff_id)));
        }
    }

    #[test]
    fn test_demos_are_feasible() {
        for demo in [DemoData::Small, DemoData::Large] {
            let input = generate(demo);
            for seed in 0..5 {
                let result = plan(&input, &mut RandomTieBreak::seeded(seed));
                assert!(result.is_ok(), "{} seed {}: {:?}", demo.as_str(), seed, result.err());
            }
        }
    }
}
