//! General application configuration.

use calif_core::GradingMode;
use serde::{Deserialize, Serialize};

const fn default_mode() -> GradingMode {
    GradingMode::Teams
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Mode used by `sync` and `review` when `--mode` is omitted.
    #[serde(default = "default_mode")]
    pub default_mode: GradingMode,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_mode: default_mode(),
        }
    }
}
