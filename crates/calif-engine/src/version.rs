//! Latest version folder and latest artifact of one student task.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use calif_core::naming::{OUTPUT_DIRNAME, is_submission_file, version_number};

use crate::fsutil;

/// The artifact chosen for one student task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    pub version_dir: PathBuf,
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// Version folder with the highest number, or `task_dir` itself when it has
/// none.
///
/// Folders without trailing digits do not count as versions. Equal numbers
/// resolve to the lexicographically last name.
#[must_use]
pub fn latest_version_dir(task_dir: &Path) -> PathBuf {
    let dirs = match fsutil::child_dirs(task_dir) {
        Ok(dirs) => dirs,
        Err(error) => {
            tracing::debug!(path = %task_dir.display(), %error, "version: cannot list task folder");
            return task_dir.to_path_buf();
        }
    };

    dirs.into_iter()
        .filter_map(|dir| {
            let number = version_number(&fsutil::file_name(&dir))?;
            Some((number, dir))
        })
        .max_by_key(|(number, _)| *number)
        .map_or_else(|| task_dir.to_path_buf(), |(_, dir)| dir)
}

/// Newest submission-type file of the latest version.
///
/// Looks at direct children of the version folder first and searches
/// recursively only when there are none. The output folder is never searched.
/// Equal modification times resolve to the lexicographically last path.
#[must_use]
pub fn latest_artifact(task_dir: &Path) -> Option<ResolvedArtifact> {
    let version_dir = latest_version_dir(task_dir);

    let direct = fsutil::child_files(&version_dir)
        .map(|files| {
            files
                .into_iter()
                .filter(|path| is_submission_file(path))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let candidates = if direct.is_empty() {
        let mut nested = Vec::new();
        collect_nested(&version_dir, &mut nested);
        nested.sort();
        nested
    } else {
        direct
    };

    let (path, modified) = candidates
        .into_iter()
        .filter_map(|path| fsutil::modified(&path).map(|modified| (path, modified)))
        .max_by_key(|(_, modified)| *modified)?;

    Some(ResolvedArtifact {
        version_dir,
        path,
        modified,
    })
}

fn collect_nested(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(dirs) = fsutil::child_dirs(dir) else {
        return;
    };
    for sub in dirs {
        if fsutil::file_name(&sub).eq_ignore_ascii_case(OUTPUT_DIRNAME) {
            continue;
        }
        if let Ok(files) = fsutil::child_files(&sub) {
            out.extend(files.into_iter().filter(|path| is_submission_file(path)));
        }
        collect_nested(&sub, out);
    }
}
