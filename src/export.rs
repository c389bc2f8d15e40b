//! CSV rendering of saved schedules.
//!
//! Output is UTF-8 with a byte-order mark so spreadsheet tools pick the right
//! encoding, with RFC 4180 quoting and CRLF line endings.

use std::fmt;
use std::str::FromStr;

use crate::domain::{DayRequest, SavedSchedule, ScheduleAssignment, Shift, Unit};

const BOM: &str = "\u{feff}";

/// What one member does on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Full(Shift),
    Half(Shift),
    Off,
    /// Neither assigned nor requested off.
    Rest,
}

impl CellKind {
    pub fn label(&self) -> String {
        match self {
            CellKind::Full(shift) => format!("full-{}", shift),
            CellKind::Half(shift) => format!("half-{}", shift),
            CellKind::Off => "off".to_string(),
            CellKind::Rest => String::new(),
        }
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Classifies one member's day from the assignment and the day's request.
///
/// An off request takes precedence over any slot.
pub fn cell_kind(
    day: &ScheduleAssignment,
    request: Option<&DayRequest>,
    staff_id: &str,
) -> CellKind {
    if request.is_some_and(|r| r.is_off(staff_id)) {
        return CellKind::Off;
    }
    match day.slot_for(staff_id) {
        Some((shift, slot)) => match slot.unit {
            Unit::Full => CellKind::Full(shift),
            Unit::Half => CellKind::Half(shift),
        },
        None => CellKind::Rest,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Grid,
    Daily,
    Stats,
}

impl FromStr for ExportKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "grid" => Ok(ExportKind::Grid),
            "daily" => Ok(ExportKind::Daily),
            "stats" => Ok(ExportKind::Stats),
            _ => Err(()),
        }
    }
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Grid => "grid",
            ExportKind::Daily => "daily",
            ExportKind::Stats => "stats",
        }
    }

    pub fn render(&self, schedule: &SavedSchedule) -> String {
        match self {
            ExportKind::Grid => staff_grid_csv(schedule),
            ExportKind::Daily => daily_csv(schedule),
            ExportKind::Stats => stats_csv(schedule),
        }
    }

    pub fn filename(&self, schedule: &SavedSchedule) -> String {
        format!(
            "{}_{}_{}.csv",
            schedule.start_date.format("%Y-%m-%d"),
            schedule.end_date.format("%Y-%m-%d"),
            self.as_str()
        )
    }
}

/// One row per member, one column per date.
pub fn staff_grid_csv(schedule: &SavedSchedule) -> String {
    let mut rows = Vec::with_capacity(schedule.staff.len() + 1);

    let mut header = vec!["Name".to_string()];
    header.extend(
        schedule
            .assignments
            .iter()
            .map(|a| a.date.format("%Y-%m-%d").to_string()),
    );
    rows.push(header);

    for member in &schedule.staff {
        let mut row = vec![member.name.clone()];
        for day in &schedule.assignments {
            let request = schedule.request_for(day.date);
            row.push(cell_kind(day, request, &member.id).label());
        }
        rows.push(row);
    }
    to_csv(&rows)
}

/// One row per date listing `name(unit)` entries per shift.
pub fn daily_csv(schedule: &SavedSchedule) -> String {
    let mut rows = vec![vec![
        "Date".to_string(),
        "Open".to_string(),
        "Middle".to_string(),
        "Close".to_string(),
    ]];
    for day in &schedule.assignments {
        let mut row = vec![day.date.format("%Y-%m-%d").to_string()];
        for shift in Shift::ALL {
            let names: Vec<String> = day.by_shift[shift]
                .iter()
                .map(|slot| {
                    let name = schedule
                        .staff
                        .iter()
                        .find(|s| s.id == slot.staff_id)
                        .map_or(slot.staff_id.as_str(), |s| s.name.as_str());
                    format!("{}({})", name, slot.unit.value())
                })
                .collect();
            row.push(names.join(" / "));
        }
        rows.push(row);
    }
    to_csv(&rows)
}

pub fn stats_csv(schedule: &SavedSchedule) -> String {
    let mut rows = vec![vec![
        "Name".to_string(),
        "Work units".to_string(),
        "Full days".to_string(),
        "Half days".to_string(),
        "Off days".to_string(),
    ]];
    for st in &schedule.stats {
        rows.push(vec![
            st.name.clone(),
            st.work_units.to_string(),
            st.full_days.to_string(),
            st.half_days.to_string(),
            st.off_days.to_string(),
        ]);
    }
    to_csv(&rows)
}

fn to_csv(rows: &[Vec<String>]) -> String {
    let mut out = String::from(BOM);
    for row in rows {
        let line: Vec<String> = row.iter().map(|field| quote(field)).collect();
        out.push_str(&line.join(","));
        out.push_str("\r\n");
    }
    out
}

/// Quotes a field only when it needs it.
///
/// ```
/// use shift_scheduling::export::quote;
///
/// assert_eq!(quote("plain"), "plain");
/// assert_eq!(quote("a,b"), "\"a,b\"");
/// assert_eq!(quote("say \"hi\""), "\"say \"\"hi\"\"\"");
/// ```
pub fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
