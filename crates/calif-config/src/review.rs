//! Review session and feedback sidecar settings.

use calif_core::naming::DEFAULT_AUDIO_EXTENSIONS;
use serde::{Deserialize, Serialize};

const fn default_open_files() -> bool {
    true
}

fn default_audio_extensions() -> Vec<String> {
    DEFAULT_AUDIO_EXTENSIONS
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReviewConfig {
    /// Open artifacts in the system viewer during review, and the workspace
    /// folder after a sync.
    #[serde(default = "default_open_files")]
    pub open_files: bool,

    /// Extensions of audio feedback copied alongside graded artifacts.
    #[serde(default = "default_audio_extensions")]
    pub audio_extensions: Vec<String>,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            open_files: default_open_files(),
            audio_extensions: default_audio_extensions(),
        }
    }
}
