//! Filesystem roots.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PathsConfig {
    /// Root holding the `<group> - Submitted files` folders.
    #[serde(default)]
    pub submissions_root: String,

    /// Root receiving grading workspaces and the `Equipos/` team files.
    #[serde(default)]
    pub grading_root: String,
}

impl PathsConfig {
    /// Both roots are set.
    pub fn is_configured(&self) -> bool {
        !self.submissions_root.trim().is_empty() && !self.grading_root.trim().is_empty()
    }

    /// Submissions root as a path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] when the value is empty.
    pub fn submissions_root(&self) -> Result<PathBuf, ConfigError> {
        require(
            &self.submissions_root,
            "paths.submissions_root",
            "--root or CALIF_PATHS__SUBMISSIONS_ROOT",
        )
    }

    /// Grading root as a path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] when the value is empty.
    pub fn grading_root(&self) -> Result<PathBuf, ConfigError> {
        require(
            &self.grading_root,
            "paths.grading_root",
            "--grading-root or CALIF_PATHS__GRADING_ROOT",
        )
    }
}

fn require(value: &str, field: &str, hint: &str) -> Result<PathBuf, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::NotConfigured {
            field: field.to_string(),
            hint: hint.to_string(),
        });
    }
    Ok(PathBuf::from(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_unconfigured() {
        let config = PathsConfig::default();
        assert!(!config.is_configured());
        let err = config.submissions_root().expect_err("should be missing");
        assert!(err.to_string().contains("paths.submissions_root"));
    }

    #[test]
    fn whitespace_only_counts_as_unset() {
        let config = PathsConfig {
            submissions_root: "  ".to_string(),
            grading_root: "/tmp/cal".to_string(),
        };
        assert!(!config.is_configured());
        assert_eq!(
            config.grading_root().expect("grading root set"),
            PathBuf::from("/tmp/cal")
        );
    }
}
