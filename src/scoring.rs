//! Candidate scoring and random tie-breaking.
//!
//! Every selection the engine makes goes through [`pick_best`]: candidates are
//! scored, the maximal set is kept, and a [`TieBreak`] source chooses one of
//! them. Production code breaks ties uniformly at random; tests can plug in a
//! deterministic source.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

use crate::domain::{Shift, StaffMember, Unit};

/// Weight of the per-shift priority.
pub const PRIORITY_WEIGHT: f64 = 10.0;

/// Bonus for a member's preferred shift.
pub const PREFERENCE_BONUS: f64 = 5.0;

/// Penalty per unit already worked in the current run.
pub const WORKLOAD_WEIGHT: f64 = 2.0;

/// Units assigned to each member so far in one generation run.
///
/// Created fresh for every run and threaded through the day loop; never shared
/// between runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workload {
    units: HashMap<String, f64>,
}

impl Workload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, staff_id: &str) -> f64 {
        self.units.get(staff_id).copied().unwrap_or(0.0)
    }

    pub fn add(&mut self, staff_id: &str, unit: Unit) {
        *self.units.entry(staff_id.to_string()).or_insert(0.0) += unit.value();
    }

    /// Sum over all members.
    pub fn total(&self) -> f64 {
        self.units.values().sum()
    }
}

/// Desirability of putting `staff` on `shift`, given the running workload.
///
/// ```
/// use shift_scheduling::domain::{Shift, StaffMember};
/// use shift_scheduling::scoring::{score, Workload};
///
/// let staff = StaffMember::new("a", "Ana")
///     .with_priority(3.0, 1.0, 0.0)
///     .with_preferred(Shift::Open);
/// let workload = Workload::new();
/// assert_eq!(score(&staff, Shift::Open, &workload), 35.0);
/// assert_eq!(score(&staff, Shift::Middle, &workload), 10.0);
/// ```
pub fn score(staff: &StaffMember, shift: Shift, workload: &Workload) -> f64 {
    let priority = staff.priority[shift] * PRIORITY_WEIGHT;
    let preference = if staff.preferred_shift == Some(shift) {
        PREFERENCE_BONUS
    } else {
        0.0
    };
    priority + preference - workload.get(&staff.id) * WORKLOAD_WEIGHT
}

/// Source of tie-break decisions.
pub trait TieBreak {
    /// Returns an index in `0..len`. Never called with `len == 0`.
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform random tie-breaking.
#[derive(Debug, Clone)]
pub struct RandomTieBreak<R = StdRng> {
    rng: R,
}

impl RandomTieBreak<StdRng> {
    /// Seeds from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomTieBreak<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> TieBreak for RandomTieBreak<R> {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Always takes the first tied candidate in enumeration order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstTieBreak;

impl TieBreak for FirstTieBreak {
    fn pick(&mut self, _len: usize) -> usize {
        0
    }
}

/// Keeps every candidate that shares the highest score.
///
/// Candidates with a NaN score are ignored.
pub fn select_best<T>(candidates: impl IntoIterator<Item = (T, f64)>) -> Vec<T> {
    let mut best_score = f64::NEG_INFINITY;
    let mut bests = Vec::new();
    for (candidate, score) in candidates {
        if score.is_nan() {
            continue;
        }
        if score > best_score {
            best_score = score;
            bests.clear();
            bests.push(candidate);
        } else if score == best_score {
            bests.push(candidate);
        }
    }
    bests
}

/// Picks one of the maximal-score candidates.
pub fn pick_best<T, B>(candidates: impl IntoIterator<Item = (T, f64)>, tie: &mut B) -> Option<T>
where
    B: TieBreak + ?Sized,
{
    let mut bests = select_best(candidates);
    match bests.len() {
        0 => None,
        1 => bests.pop(),
        len => {
            let idx = tie.pick(len).min(len - 1);
            Some(bests.swap_remove(idx))
        }
    }
}

/// The shift a member would most like to work right now.
///
/// A required shift always wins; otherwise the best-scoring available shift.
pub fn best_shift_for<B>(staff: &StaffMember, workload: &Workload, tie: &mut B) -> Option<Shift>
where
    B: TieBreak + ?Sized,
{
    if let Some(required) = staff.required_shift {
        return Some(required);
    }
    pick_best(
        staff
            .available_shifts
            .iter()
            .map(|&shift| (shift, score(staff, shift, workload))),
        tie,
    )
}
