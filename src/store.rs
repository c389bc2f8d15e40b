//! Saved schedules and work rules, optionally written through to a JSON file.
//!
//! The file holds `{ "items": [...], "workRules": {...}, "staffPresets": [...] }`.
//! Items and presets are kept newest-first. A missing or unreadable file yields an empty store; the
//! problem is logged and the next write replaces it.

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{SavedSchedule, StaffMember, WorkRules};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreFile {
    #[serde(default)]
    items: Vec<SavedSchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    work_rules: Option<WorkRules>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    staff_presets: Vec<StaffPreset>,
}

/// A named staff roster saved for reuse in later schedules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffPreset {
    pub id: String,
    pub name: String,
    pub staff: Vec<StaffMember>,
    #[serde(rename = "updatedAtISO")]
    pub updated_at: DateTime<Utc>,
}

/// Listing entry for a saved schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    pub id: String,
    #[serde(rename = "startDateISO")]
    pub start_date: NaiveDate,
    #[serde(rename = "endDateISO")]
    pub end_date: NaiveDate,
    #[serde(rename = "createdAtISO")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAtISO")]
    pub updated_at: DateTime<Utc>,
    pub days: usize,
    pub staff_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_source_schedule_id: Option<String>,
}

impl From<&SavedSchedule> for ScheduleSummary {
    fn from(s: &SavedSchedule) -> Self {
        Self {
            id: s.id.clone(),
            start_date: s.start_date,
            end_date: s.end_date,
            created_at: s.created_at,
            updated_at: s.updated_at,
            days: s.assignments.len(),
            staff_count: s.staff.len(),
            edit_source_schedule_id: s.edit_source_schedule_id.clone(),
        }
    }
}

pub struct ScheduleStore {
    path: Option<PathBuf>,
    state: RwLock<StoreFile>,
    default_rules: WorkRules,
}

impl ScheduleStore {
    /// A store that lives only as long as the process.
    pub fn in_memory(default_rules: WorkRules) -> Self {
        Self {
            path: None,
            state: RwLock::new(StoreFile::default()),
            default_rules,
        }
    }

    /// Opens a file-backed store. Never fails: a bad file degrades to empty.
    pub fn open(path: impl Into<PathBuf>, default_rules: WorkRules) -> Self {
        let path = path.into();
        let state = match read_file(&path) {
            Ok(Some(file)) => {
                info!(path = %path.display(), schedules = file.items.len(), "Loaded schedule store");
                file
            }
            Ok(None) => {
                debug!(path = %path.display(), "No schedule store yet, starting empty");
                StoreFile::default()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unreadable schedule store, starting empty");
                StoreFile::default()
            }
        };
        Self {
            path: Some(path),
            state: RwLock::new(state),
            default_rules,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn list(&self) -> Vec<ScheduleSummary> {
        self.state.read().items.iter().map(ScheduleSummary::from).collect()
    }

    pub fn len(&self) -> usize {
        self.state.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Option<SavedSchedule> {
        self.state.read().items.iter().find(|s| s.id == id).cloned()
    }

    /// Inserts a new schedule at the front, or replaces one with the same id
    /// in place. A replacement keeps the original `created_at`.
    pub fn upsert(&self, schedule: SavedSchedule) -> Result<SavedSchedule, StoreError> {
        self.commit(|file| put_schedule(file, schedule))
    }

    /// Upserts a schedule and saves the work rules in a single write.
    pub fn save_schedule(
        &self,
        schedule: SavedSchedule,
        rules: WorkRules,
    ) -> Result<SavedSchedule, StoreError> {
        self.commit(|file| {
            file.work_rules = Some(rules);
            put_schedule(file, schedule)
        })
    }

    /// Returns whether a schedule was removed.
    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        if self.state.read().items.iter().all(|s| s.id != id) {
            return Ok(false);
        }
        self.commit(|file| {
            let before = file.items.len();
            file.items.retain(|s| s.id != id);
            file.items.len() != before
        })
    }

    /// Saved rules, or the configured defaults when none were saved.
    pub fn work_rules(&self) -> WorkRules {
        self.state.read().work_rules.unwrap_or(self.default_rules)
    }

    pub fn save_work_rules(&self, rules: WorkRules) -> Result<(), StoreError> {
        self.commit(|file| file.work_rules = Some(rules))
    }

    pub fn staff_presets(&self) -> Vec<StaffPreset> {
        self.state.read().staff_presets.clone()
    }

    pub fn staff_preset(&self, id: &str) -> Option<StaffPreset> {
        self.state.read().staff_presets.iter().find(|p| p.id == id).cloned()
    }

    /// Saves a preset, replacing one with the same id in place.
    pub fn upsert_staff_preset(&self, mut preset: StaffPreset) -> Result<StaffPreset, StoreError> {
        preset.updated_at = Utc::now();
        self.commit(|file| {
            match file.staff_presets.iter().position(|p| p.id == preset.id) {
                Some(idx) => file.staff_presets[idx] = preset.clone(),
                None => file.staff_presets.insert(0, preset.clone()),
            }
            preset
        })
    }

    /// Returns whether a preset was removed.
    pub fn delete_staff_preset(&self, id: &str) -> Result<bool, StoreError> {
        if self.state.read().staff_presets.iter().all(|p| p.id != id) {
            return Ok(false);
        }
        self.commit(|file| {
            let before = file.staff_presets.len();
            file.staff_presets.retain(|p| p.id != id);
            file.staff_presets.len() != before
        })
    }

    /// Applies `change` to a copy of the state and swaps it in only once the
    /// copy is on disk. A failed write leaves memory untouched.
    fn commit<R>(&self, change: impl FnOnce(&mut StoreFile) -> R) -> Result<R, StoreError> {
        let mut state = self.state.write();
        let mut next = state.clone();
        let out = change(&mut next);
        self.persist(&next)?;
        *state = next;
        Ok(out)
    }

    fn persist(&self, state: &StoreFile) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(state)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

fn put_schedule(file: &mut StoreFile, mut schedule: SavedSchedule) -> SavedSchedule {
    schedule.updated_at = Utc::now();
    match file.items.iter().position(|s| s.id == schedule.id) {
        Some(idx) => {
            schedule.created_at = file.items[idx].created_at;
            file.items[idx] = schedule.clone();
        }
        None => file.items.insert(0, schedule.clone()),
    }
    schedule
}

fn read_file(path: &Path) -> Result<Option<StoreFile>, StoreError> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_slice(&raw)?))
}
