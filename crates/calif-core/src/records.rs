//! Records persisted as JSON beside the data they describe.
//!
//! - [`TeamMapping`]: `<grading_root>/Equipos/<group>.json`
//! - [`ProgressState`]: `<workspace>/.grading_progress.json`
//! - [`SyncManifest`]: `<workspace>/metadata.json`
//!
//! Field order here is the on-disk key order.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::GradingMode;
use crate::naming::DEFAULT_TEAM_ID;

/// One student's team assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TeamMember {
    pub name: String,
    pub team_id: u32,
}

/// Student → team assignments for one group.
///
/// Every student ever seen in the group appears exactly once, sorted by name.
/// Assignments are only appended or changed, never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TeamMapping {
    pub group: String,
    pub individual: bool,
    pub default_team_id: u32,
    pub students: Vec<TeamMember>,
}

impl TeamMapping {
    /// Mapping with no students, in team mode.
    #[must_use]
    pub fn empty(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            individual: false,
            default_team_id: DEFAULT_TEAM_ID,
            students: Vec::new(),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> GradingMode {
        GradingMode::from_individual_flag(self.individual)
    }

    #[must_use]
    pub fn contains(&self, student: &str) -> bool {
        self.students.iter().any(|member| member.name == student)
    }

    /// Team of `student`, or the default team when unassigned.
    #[must_use]
    pub fn team_of(&self, student: &str) -> u32 {
        self.students
            .iter()
            .find(|member| member.name == student)
            .map_or(self.default_team_id, |member| member.team_id)
    }

    /// Student → team id.
    #[must_use]
    pub fn assignments(&self) -> BTreeMap<String, u32> {
        self.students
            .iter()
            .map(|member| (member.name.clone(), member.team_id))
            .collect()
    }

    /// Team id → member names.
    #[must_use]
    pub fn members_by_team(&self) -> BTreeMap<u32, BTreeSet<String>> {
        let mut teams = BTreeMap::<u32, BTreeSet<String>>::new();
        for member in &self.students {
            teams
                .entry(member.team_id)
                .or_default()
                .insert(member.name.clone());
        }
        teams
    }

    /// Members of one team; empty when nobody is assigned to it.
    #[must_use]
    pub fn members_of(&self, team_id: u32) -> BTreeSet<String> {
        self.students
            .iter()
            .filter(|member| member.team_id == team_id)
            .map(|member| member.name.clone())
            .collect()
    }

    /// Set `student`'s team, adding the student if unseen. Keeps name order.
    pub fn assign(&mut self, student: &str, team_id: u32) {
        match self
            .students
            .iter_mut()
            .find(|member| member.name == student)
        {
            Some(member) => member.team_id = team_id,
            None => {
                self.students.push(TeamMember {
                    name: student.to_string(),
                    team_id,
                });
                self.students.sort_by(|a, b| a.name.cmp(&b.name));
            }
        }
    }
}

/// Completed items of one grading workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProgressState {
    #[serde(default)]
    pub graded_files: BTreeSet<String>,
    #[serde(default)]
    pub last_index: u32,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ProgressState {
    #[must_use]
    pub fn is_done(&self, file_name: &str) -> bool {
        self.graded_files.contains(file_name)
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        self.graded_files.len()
    }
}

/// Copy of one student's artifact (individual mode).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StudentCopy {
    pub student: String,
    pub team_id: u32,
    pub source: String,
    pub dest: String,
}

/// Copy of one team's chosen artifact (team mode).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TeamCopy {
    pub team_id: u32,
    pub chosen_from: String,
    pub source: String,
    pub dest: String,
}

/// Provenance of one file in the grading workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum CopyRecord {
    Student(StudentCopy),
    Team(TeamCopy),
}

impl CopyRecord {
    #[must_use]
    pub fn dest(&self) -> &str {
        match self {
            Self::Student(copy) => &copy.dest,
            Self::Team(copy) => &copy.dest,
        }
    }

    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Self::Student(copy) => &copy.source,
            Self::Team(copy) => &copy.source,
        }
    }
}

/// What a sync copied and from where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SyncManifest {
    pub group: String,
    pub task: String,
    pub mode: GradingMode,
    pub source_root: String,
    pub dest_root: String,
    pub students: Vec<CopyRecord>,
    pub generated_at: DateTime<Utc>,
}
