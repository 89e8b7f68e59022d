//! Read-only discovery over the submissions tree.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use calif_core::naming::{
    OUTPUT_DIRNAME, clean_group_name, display_task_name, is_group_dir_name, is_submission_file,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::EngineError;
use crate::fsutil;
use crate::layout::GradingLayout;
use crate::version::{latest_artifact, latest_version_dir};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    /// Name without the platform suffix.
    pub name: String,
    pub dir_name: String,
    pub students: usize,
    pub ungraded: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    /// Name without the leading ordinal.
    pub name: String,
    pub dir_name: String,
    pub graded: usize,
    pub ungraded: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryEntry {
    pub student: String,
    pub task: String,
    pub version_dir: String,
    pub artifact: String,
    pub modified: DateTime<Utc>,
    pub graded: bool,
}

/// Groups under the submissions root, sorted by clean name.
///
/// # Errors
///
/// [`EngineError::RootUnreadable`] when the root cannot be listed.
pub fn list_groups(layout: &GradingLayout) -> Result<Vec<GroupSummary>, EngineError> {
    let root = &layout.submissions_root;
    let dirs = fsutil::child_dirs(root).map_err(|source| EngineError::RootUnreadable {
        path: root.clone(),
        source,
    })?;

    let mut groups = dirs
        .into_iter()
        .filter_map(|dir| {
            let dir_name = fsutil::file_name(&dir);
            if !is_group_dir_name(&dir_name) {
                return None;
            }
            let students = list_students(&dir).unwrap_or_default();
            let ungraded = students
                .iter()
                .flat_map(|student| task_dirs(&dir.join(student)))
                .filter(|task_dir| !is_task_graded(task_dir))
                .count();
            Some(GroupSummary {
                name: clean_group_name(&dir_name).to_string(),
                dir_name,
                students: students.len(),
                ungraded,
            })
        })
        .collect::<Vec<_>>();
    groups.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(groups)
}

/// Tasks seen under any student of `group`, sorted by raw folder name.
///
/// # Errors
///
/// [`EngineError::RootUnreadable`] or [`EngineError::GroupNotFound`].
pub fn list_tasks(layout: &GradingLayout, group: &str) -> Result<Vec<TaskSummary>, EngineError> {
    let group_dir = layout.require_group_dir(group)?;
    let mut counts = BTreeMap::<String, (usize, usize)>::new();

    for student in list_students(&group_dir)? {
        for task_dir in task_dirs(&group_dir.join(&student)) {
            let entry = counts.entry(fsutil::file_name(&task_dir)).or_default();
            if is_task_graded(&task_dir) {
                entry.0 += 1;
            } else {
                entry.1 += 1;
            }
        }
    }

    Ok(counts
        .into_iter()
        .map(|(dir_name, (graded, ungraded))| TaskSummary {
            name: display_task_name(&dir_name).to_string(),
            dir_name,
            graded,
            ungraded,
        })
        .collect())
}

/// Latest artifact of every student task in `group`, optionally for one task.
///
/// Student tasks without any submission-type file are left out.
///
/// # Errors
///
/// [`EngineError::RootUnreadable`] or [`EngineError::GroupNotFound`].
pub fn inventory(
    layout: &GradingLayout,
    group: &str,
    task: Option<&str>,
) -> Result<Vec<InventoryEntry>, EngineError> {
    let group_dir = layout.require_group_dir(group)?;
    let mut entries = Vec::new();

    for student in list_students(&group_dir)? {
        let student_dir = group_dir.join(&student);
        let dirs = match task {
            Some(task) => find_task_dir(&student_dir, task).into_iter().collect(),
            None => task_dirs(&student_dir),
        };
        for task_dir in dirs {
            let Some(artifact) = latest_artifact(&task_dir) else {
                continue;
            };
            entries.push(InventoryEntry {
                student: student.clone(),
                task: fsutil::file_name(&task_dir),
                version_dir: fsutil::file_name(&artifact.version_dir),
                artifact: artifact.path.to_string_lossy().to_string(),
                modified: DateTime::<Utc>::from(artifact.modified),
                graded: is_task_graded(&task_dir),
            });
        }
    }
    Ok(entries)
}

/// Student folder names of a group, sorted.
///
/// # Errors
///
/// [`EngineError::Io`] when the group folder cannot be listed.
pub fn list_students(group_dir: &Path) -> Result<Vec<String>, EngineError> {
    let dirs = fsutil::child_dirs(group_dir).map_err(|e| EngineError::io(group_dir, e))?;
    Ok(dirs.iter().map(|dir| fsutil::file_name(dir)).collect())
}

/// Task folder of a student matching `task` case-insensitively.
///
/// More than one match is ambiguous and resolves to `None`.
#[must_use]
pub fn find_task_dir(student_dir: &Path, task: &str) -> Option<PathBuf> {
    let wanted = task.to_lowercase();
    let mut matches = task_dirs(student_dir)
        .into_iter()
        .filter(|dir| fsutil::file_name(dir).to_lowercase() == wanted);
    let found = matches.next()?;
    if matches.next().is_some() {
        tracing::warn!(
            student_dir = %student_dir.display(),
            task,
            "scanner: several task folders match case-insensitively; skipping"
        );
        return None;
    }
    Some(found)
}

/// A task is graded when its latest version has an output folder holding a
/// submission-type file.
#[must_use]
pub fn is_task_graded(task_dir: &Path) -> bool {
    let output = latest_version_dir(task_dir).join(OUTPUT_DIRNAME);
    fsutil::child_files(&output)
        .is_ok_and(|files| files.iter().any(|path| is_submission_file(path)))
}

fn task_dirs(student_dir: &Path) -> Vec<PathBuf> {
    fsutil::child_dirs(student_dir).unwrap_or_else(|error| {
        tracing::debug!(path = %student_dir.display(), %error, "scanner: cannot list student folder");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    fn write(path: &Path) {
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, b"%PDF").expect("write");
    }

    fn fixture() -> (tempfile::TempDir, GradingLayout) {
        let tmp = tempfile::TempDir::new().expect("tempdir should create");
        let subs = tmp.path().join("subs");
        let group = subs.join("G - Submitted files");
        write(&group.join("A").join("1. Lab").join("Version 1").join("a.pdf"));
        write(
            &group
                .join("A")
                .join("2. Tarea")
                .join("Version 1")
                .join("Calificado")
                .join("Cal_Tarea_A.pdf"),
        );
        write(&group.join("A").join("2. Tarea").join("Version 1").join("t.pdf"));
        write(&group.join("B").join("1. Lab").join("Version 1").join("b.pdf"));
        fs::create_dir_all(subs.join("Notas")).expect("mkdir");
        let layout = GradingLayout::new(subs, tmp.path().join("cal"));
        (tmp, layout)
    }

    #[test]
    fn groups_need_the_suffix() {
        let (_tmp, layout) = fixture();
        let groups = list_groups(&layout).expect("groups");
        assert_eq!(
            groups,
            vec![GroupSummary {
                name: "G".to_string(),
                dir_name: "G - Submitted files".to_string(),
                students: 2,
                ungraded: 2,
            }]
        );
    }

    #[test]
    fn tasks_count_graded_per_student() {
        let (_tmp, layout) = fixture();
        let tasks = list_tasks(&layout, "G - Submitted files").expect("tasks");
        assert_eq!(
            tasks,
            vec![
                TaskSummary {
                    name: "Lab".to_string(),
                    dir_name: "1. Lab".to_string(),
                    graded: 0,
                    ungraded: 2,
                },
                TaskSummary {
                    name: "Tarea".to_string(),
                    dir_name: "2. Tarea".to_string(),
                    graded: 1,
                    ungraded: 0,
                },
            ]
        );
    }

    #[test]
    fn inventory_filters_by_task_case_insensitively() {
        let (_tmp, layout) = fixture();
        let entries = inventory(&layout, "G - Submitted files", Some("1. LAB")).expect("inventory");
        assert_eq!(
            entries
                .iter()
                .map(|entry| entry.student.as_str())
                .collect::<Vec<_>>(),
            vec!["A", "B"]
        );
        assert!(entries.iter().all(|entry| entry.version_dir == "Version 1"));
        assert!(entries.iter().all(|entry| !entry.graded));
    }

    #[test]
    fn unknown_group_is_an_error() {
        let (_tmp, layout) = fixture();
        assert!(matches!(
            list_tasks(&layout, "X - Submitted files"),
            Err(EngineError::GroupNotFound(_))
        ));
    }

    #[test]
    fn missing_root_is_unreadable() {
        let tmp = tempfile::TempDir::new().expect("tempdir should create");
        let layout = GradingLayout::new(tmp.path().join("missing"), tmp.path());
        assert!(matches!(
            list_groups(&layout),
            Err(EngineError::RootUnreadable { .. })
        ));
    }

    #[test]
    fn ambiguous_task_match_is_skipped() {
        let tmp = tempfile::TempDir::new().expect("tempdir should create");
        fs::create_dir_all(tmp.path().join("1. lab")).expect("mkdir");
        fs::create_dir_all(tmp.path().join("1. LAB")).expect("mkdir");
        fs::create_dir_all(tmp.path().join("2. Tarea")).expect("mkdir");
        assert!(find_task_dir(tmp.path(), "1. Lab").is_none());
        assert!(find_task_dir(tmp.path(), "1. lab").is_none());
        assert_eq!(
            find_task_dir(tmp.path(), "2. TAREA"),
            Some(tmp.path().join("2. Tarea"))
        );
    }
}
