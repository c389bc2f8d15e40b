//! Domain model for daily shift scheduling.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::ops::{Index, IndexMut};

use crate::calendar;

/// Minimum units required on the open and close shifts every day.
pub const MIN_SHIFT_UNITS: f64 = 0.5;

/// A coverage category within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Open,
    Middle,
    Close,
}

impl Shift {
    pub const ALL: [Shift; 3] = [Shift::Open, Shift::Middle, Shift::Close];

    pub fn as_str(self) -> &'static str {
        match self {
            Shift::Open => "open",
            Shift::Middle => "middle",
            Shift::Close => "close",
        }
    }

    /// Whether this shift carries the daily coverage floor.
    pub fn has_floor(self) -> bool {
        matches!(self, Shift::Open | Shift::Close)
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Shift {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(Shift::Open),
            "middle" => Ok(Shift::Middle),
            "close" => Ok(Shift::Close),
            _ => Err(()),
        }
    }
}

/// One value per shift, serialized as `{ "open": .., "middle": .., "close": .. }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct ShiftMap<T> {
    pub open: T,
    pub middle: T,
    pub close: T,
}

impl<T> ShiftMap<T> {
    pub fn new(open: T, middle: T, close: T) -> Self {
        Self {
            open,
            middle,
            close,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Shift, &T)> {
        [
            (Shift::Open, &self.open),
            (Shift::Middle, &self.middle),
            (Shift::Close, &self.close),
        ]
        .into_iter()
    }
}

impl<T> Index<Shift> for ShiftMap<T> {
    type Output = T;

    fn index(&self, shift: Shift) -> &T {
        match shift {
            Shift::Open => &self.open,
            Shift::Middle => &self.middle,
            Shift::Close => &self.close,
        }
    }
}

impl<T> IndexMut<Shift> for ShiftMap<T> {
    fn index_mut(&mut self, shift: Shift) -> &mut T {
        match shift {
            Shift::Open => &mut self.open,
            Shift::Middle => &mut self.middle,
            Shift::Close => &mut self.close,
        }
    }
}

/// Staffing rules applied to every day of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkRules {
    /// Baseline headcount per day, in 0.5 steps.
    #[serde(alias = "DAILY_STAFF_BASE", alias = "daily_staff_base")]
    pub daily_staff_base: f64,
    /// Upper bound the per-day delta may raise the headcount to.
    #[serde(alias = "DAILY_STAFF_MAX", alias = "daily_staff_max")]
    pub daily_staff_max: f64,
    #[serde(alias = "WORK_HOURS", alias = "work_hours")]
    pub work_hours: f64,
    #[serde(alias = "BREAK_HOURS", alias = "break_hours")]
    pub break_hours: f64,
}

impl Default for WorkRules {
    fn default() -> Self {
        Self {
            daily_staff_base: 2.0,
            daily_staff_max: 3.0,
            work_hours: 8.0,
            break_hours: 1.0,
        }
    }
}

impl WorkRules {
    /// Target headcount for a day: `base + delta`, clamped to `[base, max]`.
    pub fn need_for(&self, need_delta: f64) -> f64 {
        let wanted = self.daily_staff_base + need_delta;
        wanted
            .min(self.daily_staff_max)
            .max(self.daily_staff_base)
    }
}

/// A member of the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub available_shifts: Vec<Shift>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_shift: Option<Shift>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_shift: Option<Shift>,
    /// Desirability per shift; higher wins.
    #[serde(default)]
    pub priority: ShiftMap<f64>,
}

impl StaffMember {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            available_shifts: Shift::ALL.to_vec(),
            required_shift: None,
            preferred_shift: None,
            priority: ShiftMap::default(),
        }
    }

    pub fn with_shifts(mut self, shifts: impl IntoIterator<Item = Shift>) -> Self {
        self.available_shifts = Vec::new();
        for shift in shifts {
            if !self.available_shifts.contains(&shift) {
                self.available_shifts.push(shift);
            }
        }
        self
    }

    pub fn with_required(mut self, shift: Shift) -> Self {
        self.required_shift = Some(shift);
        self
    }

    pub fn with_preferred(mut self, shift: Shift) -> Self {
        self.preferred_shift = Some(shift);
        self
    }

    pub fn with_priority(mut self, open: f64, middle: f64, close: f64) -> Self {
        self.priority = ShiftMap::new(open, middle, close);
        self
    }

    pub fn is_available_for(&self, shift: Shift) -> bool {
        self.available_shifts.contains(&shift)
    }

    /// Whether the engine may put this member on `shift`.
    pub fn can_work(&self, shift: Shift) -> bool {
        self.is_available_for(shift) && self.required_shift.map_or(true, |r| r == shift)
    }
}

/// A half-day request: the member works 0.5 units on `shift`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HalfRequest {
    pub staff_id: String,
    pub shift: Shift,
}

/// Per-date adjustments to the roster and headcount.
///
/// Deserializes through [`crate::dto::DayRequestDto`], so stored requests
/// written with the legacy `needBoost` flag keep their delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "crate::dto::DayRequestDto")]
pub struct DayRequest {
    #[serde(rename = "dateISO")]
    pub date: NaiveDate,
    #[serde(default)]
    pub off_staff_ids: Vec<String>,
    #[serde(default)]
    pub half_staff: Vec<HalfRequest>,
    #[serde(default)]
    pub need_delta: f64,
}

impl DayRequest {
    /// The zero request used for dates without an explicit entry.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            off_staff_ids: Vec::new(),
            half_staff: Vec::new(),
            need_delta: 0.0,
        }
    }

    pub fn is_off(&self, staff_id: &str) -> bool {
        self.off_staff_ids.iter().any(|id| id == staff_id)
    }

    pub fn with_off(mut self, staff_id: impl Into<String>) -> Self {
        self.off_staff_ids.push(staff_id.into());
        self
    }

    pub fn with_half(mut self, staff_id: impl Into<String>, shift: Shift) -> Self {
        self.half_staff.push(HalfRequest {
            staff_id: staff_id.into(),
            shift,
        });
        self
    }

    pub fn with_need_delta(mut self, delta: f64) -> Self {
        self.need_delta = delta;
        self
    }
}

/// Amount of a shift slot filled by one member on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Full,
    Half,
}

impl Unit {
    pub fn value(self) -> f64 {
        match self {
            Unit::Full => 1.0,
            Unit::Half => 0.5,
        }
    }
}

impl Serialize for Unit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Unit::Full => serializer.serialize_u8(1),
            Unit::Half => serializer.serialize_f64(0.5),
        }
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        if raw == 1.0 {
            Ok(Unit::Full)
        } else if raw == 0.5 {
            Ok(Unit::Half)
        } else {
            Err(serde::de::Error::custom(format!(
                "unit must be 1 or 0.5, got {}",
                raw
            )))
        }
    }
}

/// One staff member placed on a shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftSlot {
    pub staff_id: String,
    pub unit: Unit,
}

/// The generated coverage for one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleAssignment {
    #[serde(rename = "dateISO")]
    pub date: NaiveDate,
    pub by_shift: ShiftMap<Vec<ShiftSlot>>,
}

impl ScheduleAssignment {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            by_shift: ShiftMap::default(),
        }
    }

    pub fn push(&mut self, shift: Shift, staff_id: impl Into<String>, unit: Unit) {
        self.by_shift[shift].push(ShiftSlot {
            staff_id: staff_id.into(),
            unit,
        });
    }

    /// Units placed on one shift.
    pub fn units(&self, shift: Shift) -> f64 {
        self.by_shift[shift].iter().map(|s| s.unit.value()).sum()
    }

    /// Units placed across all shifts.
    pub fn total_units(&self) -> f64 {
        Shift::ALL.iter().map(|s| self.units(*s)).sum()
    }

    /// Units worked by one member on this date.
    pub fn units_for(&self, staff_id: &str) -> f64 {
        self.slots()
            .filter(|(_, slot)| slot.staff_id == staff_id)
            .map(|(_, slot)| slot.unit.value())
            .sum()
    }

    /// Every `(shift, slot)` pair of the day, open first.
    pub fn slots(&self) -> impl Iterator<Item = (Shift, &ShiftSlot)> {
        self.by_shift
            .iter()
            .flat_map(|(shift, slots)| slots.iter().map(move |slot| (shift, slot)))
    }

    /// The first slot held by a member, if any.
    pub fn slot_for(&self, staff_id: &str) -> Option<(Shift, &ShiftSlot)> {
        self.slots().find(|(_, slot)| slot.staff_id == staff_id)
    }
}

/// Per-member totals over a generated schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStats {
    pub staff_id: String,
    pub name: String,
    pub off_days: u32,
    pub half_days: u32,
    pub full_days: u32,
    pub work_units: f64,
}

/// The dates a schedule covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Period {
    /// Inclusive range of raw `YYYY-MM-DD` strings, checked by the input validator.
    Range { start: String, end: String },
    /// A whole calendar month.
    Month { year: i32, month: u32 },
}

impl Period {
    pub fn range(start: NaiveDate, end: NaiveDate) -> Self {
        Period::Range {
            start: start.format("%Y-%m-%d").to_string(),
            end: end.format("%Y-%m-%d").to_string(),
        }
    }

    /// First and last date, if both are well formed.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            Period::Range { start, end } => Some((
                calendar::parse_iso_date(start)?,
                calendar::parse_iso_date(end)?,
            )),
            Period::Month { year, month } => calendar::month_bounds(*year, *month),
        }
    }

    /// Every date of the period; empty when the period is malformed.
    pub fn dates(&self) -> Vec<NaiveDate> {
        match self {
            Period::Range { .. } => self
                .bounds()
                .map(|(start, end)| calendar::expand_date_range(start, end))
                .unwrap_or_default(),
            Period::Month { year, month } => calendar::expand_month(*year, *month),
        }
    }
}

/// Canonical engine input. Legacy shapes are normalized in [`crate::dto`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleInput {
    pub period: Period,
    pub work_rules: WorkRules,
    pub staff: Vec<StaffMember>,
    pub requests: Vec<DayRequest>,
}

impl ScheduleInput {
    pub fn new(period: Period, work_rules: WorkRules, staff: Vec<StaffMember>) -> Self {
        Self {
            period,
            work_rules,
            staff,
            requests: Vec::new(),
        }
    }

    pub fn with_request(mut self, request: DayRequest) -> Self {
        self.requests.push(request);
        self
    }

    /// Requests keyed by date. A later entry for the same date wins.
    pub fn requests_by_date(&self) -> HashMap<NaiveDate, &DayRequest> {
        self.requests.iter().map(|r| (r.date, r)).collect()
    }

    pub fn staff_by_id(&self, id: &str) -> Option<&StaffMember> {
        self.staff.iter().find(|s| s.id == id)
    }
}

/// A generated schedule as stored by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSchedule {
    pub id: String,
    #[serde(rename = "startDateISO")]
    pub start_date: NaiveDate,
    #[serde(rename = "endDateISO")]
    pub end_date: NaiveDate,
    /// Deprecated: year of `start_date`, kept for older readers.
    pub year: i32,
    /// Deprecated: month (1-12) of `start_date`.
    pub month: u32,
    #[serde(rename = "createdAtISO")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAtISO")]
    pub updated_at: DateTime<Utc>,
    pub work_rules: WorkRules,
    pub staff: Vec<StaffMember>,
    #[serde(default)]
    pub requests: Vec<DayRequest>,
    #[serde(default)]
    pub assignments: Vec<ScheduleAssignment>,
    #[serde(default)]
    pub stats: Vec<ScheduleStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_source_schedule_id: Option<String>,
}

impl SavedSchedule {
    /// Wraps a generated result together with the inputs that produced it.
    ///
    /// Returns `None` when the input period is malformed.
    pub fn new(
        id: impl Into<String>,
        input: &ScheduleInput,
        assignments: Vec<ScheduleAssignment>,
        stats: Vec<ScheduleStats>,
        edit_source_schedule_id: Option<String>,
    ) -> Option<Self> {
        let (start_date, end_date) = input.period.bounds()?;
        let (year, month) = calendar::year_month(start_date);
        let now = Utc::now();
        Some(Self {
            id: id.into(),
            start_date,
            end_date,
            year,
            month,
            created_at: now,
            updated_at: now,
            work_rules: input.work_rules,
            staff: input.staff.clone(),
            requests: input.requests.clone(),
            assignments,
            stats,
            edit_source_schedule_id,
        })
    }

    /// Rebuilds the canonical input this schedule was generated from.
    pub fn to_input(&self) -> ScheduleInput {
        ScheduleInput {
            period: Period::range(self.start_date, self.end_date),
            work_rules: self.work_rules,
            staff: self.staff.clone(),
            requests: self.requests.clone(),
        }
    }

    pub fn request_for(&self, date: NaiveDate) -> Option<&DayRequest> {
        self.requests.iter().rev().find(|r| r.date == date)
    }
}
