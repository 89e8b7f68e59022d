//! Per-workspace record of reviewed items.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use calif_core::naming::{PROGRESS_FILENAME, has_team_marker, is_graded_name, is_submission_file};
use calif_core::{GradingMode, ProgressState, ProgressStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::EngineError;
use crate::fsutil::{self, atomic_write_json};

/// Snapshot of a workspace's progress against the items currently on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressSummary {
    pub workspace: String,
    pub status: ProgressStatus,
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub last_index: u32,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Reads and writes `<workspace>/.grading_progress.json`.
///
/// Every mutation is persisted before it returns, so an interrupted session
/// loses at most the item in flight.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    workspace: PathBuf,
}

impl ProgressTracker {
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self {
            workspace: workspace.into(),
        }
    }

    #[must_use]
    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.workspace.join(PROGRESS_FILENAME)
    }

    /// Persisted state; missing, unreadable, or corrupt files load as empty.
    #[must_use]
    pub fn load(&self) -> ProgressState {
        let path = self.path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return ProgressState::default(),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "progress: unreadable file, starting empty");
                return ProgressState::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|error| {
            tracing::warn!(path = %path.display(), %error, "progress: corrupt file, starting empty");
            ProgressState::default()
        })
    }

    /// Record `file_name` as completed at position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the file cannot be written.
    pub fn mark_done(&self, file_name: &str, index: u32) -> Result<ProgressState, EngineError> {
        let mut state = self.load();
        state.graded_files.insert(file_name.to_string());
        state.last_index = index;
        state.timestamp = Some(Utc::now());
        atomic_write_json(&self.path(), &state)?;
        tracing::debug!(file_name, index, "progress: item completed");
        Ok(state)
    }

    /// Forget all progress. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when an existing file cannot be removed.
    pub fn reset(&self) -> Result<(), EngineError> {
        let path = self.path();
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "progress: reset");
                Ok(())
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(EngineError::io(path, error)),
        }
    }

    /// True iff the number of recorded items equals `total_expected`.
    #[must_use]
    pub fn is_complete(&self, total_expected: usize) -> bool {
        self.load().completed() == total_expected
    }

    /// `items` minus the recorded ones, order preserved.
    #[must_use]
    pub fn pending(&self, items: &[String]) -> Vec<String> {
        let state = self.load();
        items
            .iter()
            .filter(|item| !state.is_done(item))
            .cloned()
            .collect()
    }

    /// Progress against `items`; recorded names no longer on disk are not
    /// counted.
    #[must_use]
    pub fn summary(&self, items: &[String]) -> ProgressSummary {
        let state = self.load();
        let completed = items.iter().filter(|item| state.is_done(item)).count();
        ProgressSummary {
            workspace: self.workspace.to_string_lossy().to_string(),
            status: ProgressStatus::from_counts(completed, items.len()),
            total: items.len(),
            completed,
            pending: items.len() - completed,
            last_index: state.last_index,
            timestamp: state.timestamp,
        }
    }
}

/// Reviewable items in a workspace, sorted by name.
///
/// Submission-type files without the graded prefix; in team mode only those
/// carrying the team marker.
///
/// # Errors
///
/// [`EngineError::WorkspaceNotFound`] when the folder is absent,
/// [`EngineError::Io`] when it cannot be listed.
pub fn discover_items(workspace: &Path, mode: GradingMode) -> Result<Vec<String>, EngineError> {
    if !workspace.is_dir() {
        return Err(EngineError::WorkspaceNotFound(workspace.to_path_buf()));
    }
    let files = fsutil::child_files(workspace).map_err(|e| EngineError::io(workspace, e))?;
    Ok(files
        .iter()
        .filter(|path| is_submission_file(path))
        .filter(|path| !is_graded_name(&fsutil::file_name(path)))
        .filter(|path| match mode {
            GradingMode::Individual => true,
            GradingMode::Teams => has_team_marker(&fsutil::file_stem(path)),
        })
        .map(|path| fsutil::file_name(path))
        .collect())
}
