//! Work queues for the external grader and transcriber.
//!
//! Both walk `<grading_root>/<group>/<task>/` and only read.

use std::path::{Path, PathBuf};

use calif_core::naming::{
    TEAMS_DIRNAME, TRANSCRIBABLE_AUDIO_EXTENSIONS, TRANSCRIPTION_SUFFIX, graded_name,
    has_extension, is_graded_name, is_submission_file,
};
use serde::Serialize;

use crate::error::EngineError;
use crate::fsutil;
use crate::layout::GradingLayout;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingItem {
    pub group: String,
    pub task: String,
    pub file: String,
    pub path: String,
}

/// Synced artifacts with no graded counterpart yet.
///
/// # Errors
///
/// [`EngineError::RootUnreadable`] when the grading root cannot be listed.
pub fn pending_grading(layout: &GradingLayout) -> Result<Vec<PendingItem>, EngineError> {
    collect(layout, |workspace, file| {
        let name = fsutil::file_name(file);
        is_submission_file(file)
            && !is_graded_name(&name)
            && !workspace.join(graded_name(&name)).exists()
    })
}

/// Graded audio files with no transcription next to them.
///
/// A transcription is `<stem>.json` or `<stem>_transcripcion.json`.
///
/// # Errors
///
/// [`EngineError::RootUnreadable`] when the grading root cannot be listed.
pub fn pending_transcription(layout: &GradingLayout) -> Result<Vec<PendingItem>, EngineError> {
    collect(layout, |workspace, file| {
        if !has_extension(file, &TRANSCRIBABLE_AUDIO_EXTENSIONS)
            || !is_graded_name(&fsutil::file_name(file))
        {
            return false;
        }
        let stem = fsutil::file_stem(file);
        !workspace.join(format!("{stem}.json")).exists()
            && !workspace
                .join(format!("{stem}{TRANSCRIPTION_SUFFIX}.json"))
                .exists()
    })
}

fn collect(
    layout: &GradingLayout,
    keep: impl Fn(&Path, &Path) -> bool,
) -> Result<Vec<PendingItem>, EngineError> {
    let root = &layout.grading_root;
    let groups = fsutil::child_dirs(root).map_err(|source| EngineError::RootUnreadable {
        path: root.clone(),
        source,
    })?;

    let mut items = Vec::new();
    for group_dir in groups {
        let group = fsutil::file_name(&group_dir);
        if group == TEAMS_DIRNAME {
            continue;
        }
        for workspace in list_or_empty(&group_dir, fsutil::child_dirs) {
            let task = fsutil::file_name(&workspace);
            for file in list_or_empty(&workspace, fsutil::child_files) {
                if keep(&workspace, &file) {
                    items.push(PendingItem {
                        group: group.clone(),
                        task: task.clone(),
                        file: fsutil::file_name(&file),
                        path: file.to_string_lossy().to_string(),
                    });
                }
            }
        }
    }
    Ok(items)
}

fn list_or_empty(dir: &Path, list: fn(&Path) -> std::io::Result<Vec<PathBuf>>) -> Vec<PathBuf> {
    list(dir).unwrap_or_else(|error| {
        tracing::warn!(path = %dir.display(), %error, "pending: cannot list folder");
        Vec::new()
    })
}
