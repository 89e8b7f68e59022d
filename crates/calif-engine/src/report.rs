use std::fmt::Display;
use std::path::Path;

use serde::Serialize;

/// One item a batch operation skipped or failed on, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemIssue {
    pub path: String,
    pub reason: String,
}

impl ItemIssue {
    pub fn new(path: &Path, reason: impl Display) -> Self {
        Self {
            path: path.to_string_lossy().to_string(),
            reason: reason.to_string(),
        }
    }
}
