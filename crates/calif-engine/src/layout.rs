//! Where things live on disk.

use std::fs;
use std::path::{Path, PathBuf};

use calif_core::naming::{MANIFEST_FILENAME, PROGRESS_FILENAME, TEAMS_DIRNAME};

use crate::error::EngineError;

/// The two roots every operation works between.
///
/// ```text
/// <submissions_root>/<group>/<student>/<task>/<version>/...   read-only
/// <grading_root>/<group>/<task>/                              grading workspace
/// <grading_root>/Equipos/<group>.json                         team file
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradingLayout {
    pub submissions_root: PathBuf,
    pub grading_root: PathBuf,
}

impl GradingLayout {
    pub fn new(submissions_root: impl Into<PathBuf>, grading_root: impl Into<PathBuf>) -> Self {
        Self {
            submissions_root: submissions_root.into(),
            grading_root: grading_root.into(),
        }
    }

    #[must_use]
    pub fn group_dir(&self, group: &str) -> PathBuf {
        self.submissions_root.join(group)
    }

    /// Group folder under the submissions root, checked to exist.
    ///
    /// # Errors
    ///
    /// [`EngineError::RootUnreadable`] when the submissions root cannot be
    /// listed, [`EngineError::GroupNotFound`] when the group folder is absent.
    pub fn require_group_dir(&self, group: &str) -> Result<PathBuf, EngineError> {
        ensure_readable(&self.submissions_root)?;
        let dir = self.group_dir(group);
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(EngineError::GroupNotFound(dir))
        }
    }

    #[must_use]
    pub fn teams_dir(&self) -> PathBuf {
        self.grading_root.join(TEAMS_DIRNAME)
    }

    #[must_use]
    pub fn team_file(&self, group: &str) -> PathBuf {
        self.teams_dir().join(format!("{group}.json"))
    }

    /// Parent of all task workspaces of one group.
    #[must_use]
    pub fn group_workspace(&self, group: &str) -> PathBuf {
        self.grading_root.join(group)
    }

    /// Grading workspace of one task.
    #[must_use]
    pub fn workspace(&self, group: &str, task: &str) -> PathBuf {
        self.group_workspace(group).join(task)
    }

    #[must_use]
    pub fn progress_file(&self, group: &str, task: &str) -> PathBuf {
        self.workspace(group, task).join(PROGRESS_FILENAME)
    }

    #[must_use]
    pub fn manifest_file(&self, group: &str, task: &str) -> PathBuf {
        self.workspace(group, task).join(MANIFEST_FILENAME)
    }
}

/// Fail with [`EngineError::RootUnreadable`] unless `root` can be listed.
pub(crate) fn ensure_readable(root: &Path) -> Result<(), EngineError> {
    fs::read_dir(root)
        .map(|_| ())
        .map_err(|source| EngineError::RootUnreadable {
            path: root.to_path_buf(),
            source,
        })
}
