//! Team file persistence and reconciliation.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use calif_core::TeamMapping;
use calif_core::naming::DEFAULT_TEAM_ID;
use serde::Deserialize;

use crate::error::EngineError;
use crate::fsutil::atomic_write_json;
use crate::layout::GradingLayout;

/// Reads and writes `<grading_root>/Equipos/<group>.json`.
#[derive(Debug, Clone)]
pub struct TeamRegistry {
    layout: GradingLayout,
}

impl TeamRegistry {
    pub const fn new(layout: GradingLayout) -> Self {
        Self { layout }
    }

    #[must_use]
    pub fn file_path(&self, group: &str) -> PathBuf {
        self.layout.team_file(group)
    }

    #[must_use]
    pub fn exists(&self, group: &str) -> bool {
        self.file_path(group).is_file()
    }

    /// Current mapping of `group`.
    ///
    /// A missing file yields an empty mapping. An unreadable or corrupt file
    /// is logged and treated the same way; it is replaced on the next write.
    #[must_use]
    pub fn load(&self, group: &str) -> TeamMapping {
        let path = self.file_path(group);
        match read_mapping(&path, group) {
            Ok(Some(mapping)) => mapping,
            Ok(None) => TeamMapping::empty(group),
            Err(reason) => {
                tracing::warn!(path = %path.display(), %reason, "teams: ignoring unreadable team file");
                TeamMapping::empty(group)
            }
        }
    }

    /// Like [`Self::load`], but a missing file is an error.
    ///
    /// # Errors
    ///
    /// [`EngineError::TeamFileMissing`] when the group was never synced.
    pub fn load_existing(&self, group: &str) -> Result<TeamMapping, EngineError> {
        if self.exists(group) {
            Ok(self.load(group))
        } else {
            Err(EngineError::TeamFileMissing(self.file_path(group)))
        }
    }

    /// Persist `mapping` atomically, students sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the file cannot be written.
    pub fn save(&self, mapping: &TeamMapping) -> Result<(), EngineError> {
        let mut mapping = mapping.clone();
        mapping.students.sort_by(|a, b| a.name.cmp(&b.name));
        atomic_write_json(&self.file_path(&mapping.group), &mapping)
    }

    /// Add unseen `students` with the default team, record the mode, and
    /// persist.
    ///
    /// Existing assignments are never changed. Running it twice with the same
    /// inputs leaves the file unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the file cannot be written.
    pub fn reconcile<'a>(
        &self,
        group: &str,
        students: impl IntoIterator<Item = &'a str>,
        individual: bool,
    ) -> Result<TeamMapping, EngineError> {
        let mut mapping = self.load(group);
        let added = reconcile_mapping(&mut mapping, students, individual);
        if added > 0 {
            tracing::info!(group, added, "teams: new students assigned to the default team");
        }
        self.save(&mapping)?;
        Ok(mapping)
    }

    /// Set one student's team and persist.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the file cannot be written.
    pub fn assign(
        &self,
        group: &str,
        student: &str,
        team_id: u32,
    ) -> Result<TeamMapping, EngineError> {
        let mut mapping = self.load(group);
        mapping.assign(student, team_id);
        self.save(&mapping)?;
        Ok(mapping)
    }
}

/// In-memory reconciliation; returns how many students were added.
pub fn reconcile_mapping<'a>(
    mapping: &mut TeamMapping,
    students: impl IntoIterator<Item = &'a str>,
    individual: bool,
) -> usize {
    let mut added = 0;
    for student in students {
        if !mapping.contains(student) {
            let team_id = mapping.default_team_id;
            mapping.assign(student, team_id);
            added += 1;
        }
    }
    mapping.individual = individual;
    added
}

// ---------------------------------------------------------------------------
// Lenient on-disk shape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct StoredTeamFile {
    #[serde(default)]
    individual: bool,
    #[serde(default)]
    default_team_id: Option<u32>,
    #[serde(default)]
    students: Vec<StoredMember>,
}

#[derive(Debug, Deserialize)]
struct StoredMember {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    team_id: Option<u32>,
}

fn read_mapping(path: &Path, group: &str) -> Result<Option<TeamMapping>, String> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
        Err(error) => return Err(error.to_string()),
    };
    let stored: StoredTeamFile = serde_json::from_str(&raw).map_err(|e| e.to_string())?;

    let mut mapping = TeamMapping::empty(group);
    mapping.individual = stored.individual;
    mapping.default_team_id = stored.default_team_id.unwrap_or(DEFAULT_TEAM_ID);

    for member in stored.students {
        let Some(name) = member.name.filter(|name| !name.trim().is_empty()) else {
            continue;
        };
        mapping.assign(&name, member.team_id.unwrap_or(mapping.default_team_id));
    }
    Ok(Some(mapping))
}
