//! Fan graded feedback back into each recipient's latest version folder.

use std::fs;
use std::path::Path;

use calif_core::naming::{
    OUTPUT_DIRNAME, has_team_marker, is_graded_name, is_submission_file, parse_individual_stem,
    parse_team_id,
};
use calif_core::{GradingMode, TeamMapping};
use serde::Serialize;

use crate::error::EngineError;
use crate::fsutil::{self, copy_preserving_mtime};
use crate::layout::GradingLayout;
use crate::report::ItemIssue;
use crate::scanner::find_task_dir;
use crate::teams::TeamRegistry;
use crate::version::latest_version_dir;

/// A graded artifact (and its audio sidecars) delivered to one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delivery {
    pub file: String,
    pub student: String,
    pub dest: String,
    pub sidecars: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DistributionReport {
    pub group: String,
    pub task: String,
    pub mode: GradingMode,
    pub graded_files: usize,
    pub delivered: Vec<Delivery>,
    pub skipped: Vec<ItemIssue>,
    pub failed: Vec<ItemIssue>,
}

impl DistributionReport {
    /// Files written, sidecars included.
    #[must_use]
    pub fn copies(&self) -> usize {
        self.delivered
            .iter()
            .map(|delivery| 1 + delivery.sidecars.len())
            .sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkDistributionReport {
    pub group: String,
    pub mode: GradingMode,
    pub tasks: Vec<DistributionReport>,
}

impl BulkDistributionReport {
    #[must_use]
    pub fn copies(&self) -> usize {
        self.tasks.iter().map(DistributionReport::copies).sum()
    }
}

#[derive(Debug, Clone)]
pub struct FeedbackDistributor {
    layout: GradingLayout,
    registry: TeamRegistry,
    audio_extensions: Vec<String>,
}

impl FeedbackDistributor {
    pub fn new(layout: GradingLayout, audio_extensions: Vec<String>) -> Self {
        let registry = TeamRegistry::new(layout.clone());
        Self {
            layout,
            registry,
            audio_extensions,
        }
    }

    /// Deliver every graded artifact of one task workspace.
    ///
    /// Individual mode recovers the student from the filename; team mode
    /// recovers the team id and delivers to every member in `mapping`.
    /// Unparseable names, unknown students, and missing task folders are
    /// skipped; failed copies are reported. Neither stops the batch.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the workspace, the submissions root, or
    /// the group folder is missing.
    pub fn distribute(
        &self,
        group: &str,
        task: &str,
        mode: GradingMode,
        mapping: &TeamMapping,
    ) -> Result<DistributionReport, EngineError> {
        let workspace = self.layout.workspace(group, task);
        let graded = graded_files(&workspace)?;
        let group_dir = self.layout.require_group_dir(group)?;

        let mut report = DistributionReport {
            group: group.to_string(),
            task: task.to_string(),
            mode,
            graded_files: 0,
            delivered: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
        };

        for file in graded {
            let stem = fsutil::file_stem(&file);
            let recipients = match mode {
                GradingMode::Individual => match parse_individual_stem(&stem) {
                    Ok((_, student)) => vec![student.to_string()],
                    Err(error) => {
                        report.skipped.push(ItemIssue::new(&file, error));
                        continue;
                    }
                },
                GradingMode::Teams => {
                    if !has_team_marker(&stem) {
                        report.skipped.push(ItemIssue::new(&file, "not a team artifact"));
                        continue;
                    }
                    let team_id = match parse_team_id(&stem) {
                        Ok(team_id) => team_id,
                        Err(error) => {
                            report.skipped.push(ItemIssue::new(&file, error));
                            continue;
                        }
                    };
                    let members = mapping.members_of(team_id);
                    if members.is_empty() {
                        report.skipped.push(ItemIssue::new(
                            &file,
                            format!("team {team_id} has no members"),
                        ));
                        continue;
                    }
                    members.into_iter().collect()
                }
            };

            report.graded_files += 1;
            for student in recipients {
                self.deliver(&workspace, &file, &group_dir, task, &student, &mut report);
            }
        }

        tracing::info!(
            group,
            task,
            %mode,
            delivered = report.delivered.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "distribute: task done"
        );
        Ok(report)
    }

    /// Distribute every task workspace of `group` that holds graded files,
    /// using the mode and teams recorded in the team file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the group workspace or team file is
    /// missing, or when a task fails at command level.
    pub fn distribute_all(&self, group: &str) -> Result<BulkDistributionReport, EngineError> {
        self.distribute_all_with(group, |_| {})
    }

    /// [`Self::distribute_all`], calling `on_task` before each task.
    ///
    /// # Errors
    ///
    /// Same as [`Self::distribute_all`].
    pub fn distribute_all_with(
        &self,
        group: &str,
        mut on_task: impl FnMut(&str),
    ) -> Result<BulkDistributionReport, EngineError> {
        let tasks = self.graded_tasks(group)?;
        let mapping = self.registry.load_existing(group)?;
        let mode = mapping.mode();

        let mut reports = Vec::new();
        for task in tasks {
            on_task(&task);
            reports.push(self.distribute(group, &task, mode, &mapping)?);
        }
        Ok(BulkDistributionReport {
            group: group.to_string(),
            mode,
            tasks: reports,
        })
    }

    /// Task workspaces of `group` holding at least one graded file.
    ///
    /// # Errors
    ///
    /// [`EngineError::WorkspaceNotFound`] when the group was never synced.
    pub fn graded_tasks(&self, group: &str) -> Result<Vec<String>, EngineError> {
        let group_workspace = self.layout.group_workspace(group);
        if !group_workspace.is_dir() {
            return Err(EngineError::WorkspaceNotFound(group_workspace));
        }
        let dirs = fsutil::child_dirs(&group_workspace)
            .map_err(|e| EngineError::io(&group_workspace, e))?;
        Ok(dirs
            .iter()
            .filter(|dir| graded_files(dir).is_ok_and(|files| !files.is_empty()))
            .map(|dir| fsutil::file_name(dir))
            .collect())
    }

    fn deliver(
        &self,
        workspace: &Path,
        file: &Path,
        group_dir: &Path,
        task: &str,
        student: &str,
        report: &mut DistributionReport,
    ) {
        let student_dir = group_dir.join(student);
        if !student_dir.is_dir() {
            report.skipped.push(ItemIssue::new(
                file,
                format!("no submission folder for student '{student}'"),
            ));
            return;
        }
        let Some(task_dir) = find_task_dir(&student_dir, task) else {
            report.skipped.push(ItemIssue::new(
                file,
                format!("student '{student}' has no folder for task '{task}'"),
            ));
            return;
        };

        let output = latest_version_dir(&task_dir).join(OUTPUT_DIRNAME);
        if let Err(error) = fs::create_dir_all(&output) {
            report.failed.push(ItemIssue::new(&output, error));
            return;
        }

        let file_name = fsutil::file_name(file);
        let dest = output.join(&file_name);
        if let Err(error) = copy_preserving_mtime(file, &dest) {
            tracing::warn!(dest = %dest.display(), %error, "distribute: copy failed");
            report.failed.push(ItemIssue::new(&dest, error));
            return;
        }

        let stem = fsutil::file_stem(file);
        let mut sidecars = Vec::new();
        for ext in &self.audio_extensions {
            let sidecar = workspace.join(format!("{stem}.{ext}"));
            if !sidecar.is_file() {
                continue;
            }
            let sidecar_name = fsutil::file_name(&sidecar);
            match copy_preserving_mtime(&sidecar, &output.join(&sidecar_name)) {
                Ok(()) => sidecars.push(sidecar_name),
                Err(error) => report.failed.push(ItemIssue::new(&sidecar, error)),
            }
        }

        report.delivered.push(Delivery {
            file: file_name,
            student: student.to_string(),
            dest: dest.to_string_lossy().to_string(),
            sidecars,
        });
    }
}

/// Graded submission-type files directly inside a workspace, sorted.
fn graded_files(workspace: &Path) -> Result<Vec<std::path::PathBuf>, EngineError> {
    if !workspace.is_dir() {
        return Err(EngineError::WorkspaceNotFound(workspace.to_path_buf()));
    }
    let files = fsutil::child_files(workspace).map_err(|e| EngineError::io(workspace, e))?;
    Ok(files
        .into_iter()
        .filter(|path| is_submission_file(path) && is_graded_name(&fsutil::file_name(path)))
        .collect())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;

    struct Fixture {
        _tmp: tempfile::TempDir,
        layout: GradingLayout,
    }

    impl Fixture {
        fn new() -> Self {
            let tmp = tempfile::TempDir::new().expect("tempdir should create");
            let layout = GradingLayout::new(tmp.path().join("subs"), tmp.path().join("cal"));
            Self { _tmp: tmp, layout }
        }

        fn student_task(&self, student: &str, task: &str) -> PathBuf {
            let dir = self
                .layout
                .group_dir("G")
                .join(student)
                .join(task)
                .join("Version 1");
            fs::create_dir_all(&dir).expect("mkdir");
            dir
        }

        fn graded(&self, task: &str, name: &str) {
            let workspace = self.layout.workspace("G", task);
            fs::create_dir_all(&workspace).expect("mkdir");
            fs::write(workspace.join(name), name).expect("write");
        }

        fn distributor(&self) -> FeedbackDistributor {
            FeedbackDistributor::new(self.layout.clone(), vec!["mp3".into(), "wav".into()])
        }
    }

    #[test]
    fn individual_feedback_reaches_latest_version_with_sidecars() {
        let fx = Fixture::new();
        let version = fx.student_task("Ana Ruiz", "2. Tarea");
        fx.graded("2. Tarea", "Cal_Tarea_Ana Ruiz.pdf");
        fx.graded("2. Tarea", "Cal_Tarea_Ana Ruiz.mp3");

        let report = fx
            .distributor()
            .distribute("G", "2. Tarea", GradingMode::Individual, &TeamMapping::empty("G"))
            .expect("distribute");

        assert!(version.join("Calificado").join("Cal_Tarea_Ana Ruiz.pdf").is_file());
        assert!(version.join("Calificado").join("Cal_Tarea_Ana Ruiz.mp3").is_file());
        assert_eq!(report.copies(), 2);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn unknown_student_and_bad_name_are_skipped() {
        let fx = Fixture::new();
        fx.student_task("Ana Ruiz", "2. Tarea");
        fx.graded("2. Tarea", "Cal_Tarea_Nadie.pdf");
        fx.graded("2. Tarea", "Cal_Tarea.pdf");

        let report = fx
            .distributor()
            .distribute("G", "2. Tarea", GradingMode::Individual, &TeamMapping::empty("G"))
            .expect("distribute");
        assert_eq!(report.skipped.len(), 2);
        assert!(report.delivered.is_empty());
    }

    #[test]
    fn team_feedback_reaches_every_member() {
        let fx = Fixture::new();
        let a = fx.student_task("A", "1. Lab");
        let b = fx.student_task("B", "1. Lab");
        fx.graded("1. Lab", "Cal_Lab_Equipo_1.pdf");
        fx.graded("1. Lab", "Cal_Lab_Equipo_x.pdf");
        let mut mapping = TeamMapping::empty("G");
        mapping.assign("A", 1);
        mapping.assign("B", 1);

        let report = fx
            .distributor()
            .distribute("G", "1. Lab", GradingMode::Teams, &mapping)
            .expect("distribute");

        assert!(a.join("Calificado").join("Cal_Lab_Equipo_1.pdf").is_file());
        assert!(b.join("Calificado").join("Cal_Lab_Equipo_1.pdf").is_file());
        assert_eq!(report.graded_files, 1);
        assert_eq!(report.skipped.len(), 1);
    }

    #[test]
    fn memberless_team_is_skipped_and_the_rest_delivered() {
        let fx = Fixture::new();
        let a = fx.student_task("A", "1. Lab");
        fx.graded("1. Lab", "Cal_Lab_Equipo_1.pdf");
        fx.graded("1. Lab", "Cal_Lab_Equipo_9.pdf");
        let mut mapping = TeamMapping::empty("G");
        mapping.assign("A", 1);

        let report = fx
            .distributor()
            .distribute("G", "1. Lab", GradingMode::Teams, &mapping)
            .expect("distribute");

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].reason, "team 9 has no members");
        assert!(report.skipped[0].path.ends_with("Cal_Lab_Equipo_9.pdf"));
        assert_eq!(report.delivered.len(), 1);
        assert_eq!(report.delivered[0].student, "A");
        assert!(a.join("Calificado").join("Cal_Lab_Equipo_1.pdf").is_file());
        assert!(!a.join("Calificado").join("Cal_Lab_Equipo_9.pdf").exists());
    }

    #[test]
    fn task_named_after_the_marker_still_fans_out() {
        let fx = Fixture::new();
        let a = fx.student_task("A", "3. Reto_Equipo");
        let b = fx.student_task("B", "3. Reto_Equipo");
        fx.graded("3. Reto_Equipo", "Cal_Reto_Equipo_Equipo_2.pdf");
        let mut mapping = TeamMapping::empty("G");
        mapping.assign("A", 2);
        mapping.assign("B", 2);

        let report = fx
            .distributor()
            .distribute("G", "3. Reto_Equipo", GradingMode::Teams, &mapping)
            .expect("distribute");

        assert!(report.skipped.is_empty());
        assert_eq!(report.delivered.len(), 2);
        for version in [a, b] {
            assert!(
                version
                    .join("Calificado")
                    .join("Cal_Reto_Equipo_Equipo_2.pdf")
                    .is_file()
            );
        }
    }

    #[test]
    fn bulk_requires_team_file() {
        let fx = Fixture::new();
        fx.graded("1. Lab", "Cal_Lab_Equipo_1.pdf");
        assert!(matches!(
            fx.distributor().distribute_all("G"),
            Err(EngineError::TeamFileMissing(_))
        ));
    }

    #[test]
    fn missing_workspace_is_an_error() {
        let fx = Fixture::new();
        assert!(matches!(
            fx.distributor().distribute(
                "G",
                "1. Lab",
                GradingMode::Teams,
                &TeamMapping::empty("G")
            ),
            Err(EngineError::WorkspaceNotFound(_))
        ));
    }
}
