use std::path::PathBuf;

use thiserror::Error;

/// Command-level failures.
///
/// Per-item problems (a missing student folder, an unparseable graded
/// filename, a failed copy) never surface here; they are collected in the
/// operation's report so the rest of the batch still runs.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("cannot read root folder '{path}': {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("group folder not found: {0}")]
    GroupNotFound(PathBuf),
    #[error("grading workspace not found: {0}")]
    WorkspaceNotFound(PathBuf),
    #[error("team file not found: {0} (sync at least one task of the group first)")]
    TeamFileMissing(PathBuf),
    #[error("io error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("json error at '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl EngineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
