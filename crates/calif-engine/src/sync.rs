//! Copy the latest submissions of one task into its grading workspace.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use calif_core::naming::{
    MANIFEST_FILENAME, SUBMISSION_EXTENSION, individual_artifact_name, team_artifact_name,
};
use calif_core::{CopyRecord, GradingMode, StudentCopy, SyncManifest, TeamCopy, TeamMapping};
use chrono::Utc;
use serde::Serialize;

use crate::error::EngineError;
use crate::fsutil::{atomic_write_json, copy_preserving_mtime};
use crate::layout::GradingLayout;
use crate::report::ItemIssue;
use crate::scanner::{find_task_dir, list_students};
use crate::teams::TeamRegistry;
use crate::version::{ResolvedArtifact, latest_artifact};

/// Outcome of one sync.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub workspace: String,
    pub manifest_path: String,
    pub manifest: SyncManifest,
    pub skipped: Vec<ItemIssue>,
    pub failed: Vec<ItemIssue>,
}

impl SyncReport {
    #[must_use]
    pub fn copied(&self) -> usize {
        self.manifest.students.len()
    }
}

#[derive(Debug, Clone)]
pub struct SyncEngine {
    layout: GradingLayout,
    registry: TeamRegistry,
}

struct Resolved {
    student: String,
    artifact: ResolvedArtifact,
}

impl SyncEngine {
    pub fn new(layout: GradingLayout) -> Self {
        let registry = TeamRegistry::new(layout.clone());
        Self { layout, registry }
    }

    /// Sync `task` of `group` into `<grading_root>/<group>/<task>`.
    ///
    /// The team file is reconciled first, then each student's (or each
    /// team's) latest artifact is copied under its canonical name and the
    /// manifest is rewritten. Students without the task or without a
    /// submission are reported as skipped; failed copies are reported and do
    /// not stop the batch. Re-running with unchanged inputs rewrites the same
    /// files.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the root or group is missing or when the
    /// workspace, team file, or manifest cannot be written.
    pub fn sync(
        &self,
        group: &str,
        task: &str,
        mode: GradingMode,
    ) -> Result<SyncReport, EngineError> {
        let group_dir = self.layout.require_group_dir(group)?;
        let students = list_students(&group_dir)?;
        let workspace = self.layout.workspace(group, task);
        fs::create_dir_all(&workspace).map_err(|e| EngineError::io(&workspace, e))?;

        let mapping = self.registry.reconcile(
            group,
            students.iter().map(String::as_str),
            mode.is_individual(),
        )?;

        let mut skipped = Vec::new();
        let mut resolved = Vec::new();
        for student in &students {
            let student_dir = group_dir.join(student);
            let Some(task_dir) = find_task_dir(&student_dir, task) else {
                skipped.push(ItemIssue::new(&student_dir, "no folder for this task"));
                continue;
            };
            match latest_artifact(&task_dir) {
                Some(artifact) => resolved.push(Resolved {
                    student: student.clone(),
                    artifact,
                }),
                None => skipped.push(ItemIssue::new(&task_dir, "no submission found")),
            }
        }

        let mut failed = Vec::new();
        let records = match mode {
            GradingMode::Individual => {
                copy_individual(task, &workspace, &mapping, &resolved, &mut failed)
            }
            GradingMode::Teams => copy_teams(task, &workspace, &mapping, &resolved, &mut failed),
        };

        let manifest = SyncManifest {
            group: group.to_string(),
            task: task.to_string(),
            mode,
            source_root: group_dir.to_string_lossy().to_string(),
            dest_root: workspace.to_string_lossy().to_string(),
            students: records,
            generated_at: Utc::now(),
        };
        let manifest_path = workspace.join(MANIFEST_FILENAME);
        atomic_write_json(&manifest_path, &manifest)?;

        tracing::info!(
            group,
            task,
            %mode,
            copied = manifest.students.len(),
            skipped = skipped.len(),
            failed = failed.len(),
            "sync: workspace updated"
        );

        Ok(SyncReport {
            workspace: workspace.to_string_lossy().to_string(),
            manifest_path: manifest_path.to_string_lossy().to_string(),
            manifest,
            skipped,
            failed,
        })
    }
}

fn copy_individual(
    task: &str,
    workspace: &Path,
    mapping: &TeamMapping,
    resolved: &[Resolved],
    failed: &mut Vec<ItemIssue>,
) -> Vec<CopyRecord> {
    let mut records = Vec::new();
    for item in resolved {
        let dest = workspace.join(individual_artifact_name(
            task,
            &item.student,
            &extension_of(&item.artifact.path),
        ));
        if let Err(error) = copy_preserving_mtime(&item.artifact.path, &dest) {
            tracing::warn!(source = %item.artifact.path.display(), %error, "sync: copy failed");
            failed.push(ItemIssue::new(&item.artifact.path, error));
            continue;
        }
        records.push(CopyRecord::Student(StudentCopy {
            student: item.student.clone(),
            team_id: mapping.team_of(&item.student),
            source: item.artifact.path.to_string_lossy().to_string(),
            dest: dest.to_string_lossy().to_string(),
        }));
    }
    records
}

/// One copy per team: the member artifact with the newest modification time.
///
/// Members are visited in name order and only a strictly newer artifact
/// replaces the current pick, so ties go to the first member by name.
fn copy_teams(
    task: &str,
    workspace: &Path,
    mapping: &TeamMapping,
    resolved: &[Resolved],
    failed: &mut Vec<ItemIssue>,
) -> Vec<CopyRecord> {
    let mut chosen = BTreeMap::<u32, &Resolved>::new();
    for item in resolved {
        let team_id = mapping.team_of(&item.student);
        match chosen.get(&team_id) {
            Some(current) if item.artifact.modified <= current.artifact.modified => {}
            _ => {
                chosen.insert(team_id, item);
            }
        }
    }

    let mut records = Vec::new();
    for (team_id, item) in chosen {
        let dest: PathBuf = workspace.join(team_artifact_name(
            task,
            team_id,
            &extension_of(&item.artifact.path),
        ));
        if let Err(error) = copy_preserving_mtime(&item.artifact.path, &dest) {
            tracing::warn!(source = %item.artifact.path.display(), %error, "sync: copy failed");
            failed.push(ItemIssue::new(&item.artifact.path, error));
            continue;
        }
        records.push(CopyRecord::Team(TeamCopy {
            team_id,
            chosen_from: item.student.clone(),
            source: item.artifact.path.to_string_lossy().to_string(),
            dest: dest.to_string_lossy().to_string(),
        }));
    }
    records
}

fn extension_of(path: &Path) -> String {
    path.extension().map_or_else(
        || SUBMISSION_EXTENSION.to_string(),
        |ext| ext.to_string_lossy().to_lowercase(),
    )
}
