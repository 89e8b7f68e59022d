use anyhow::Context;
use calif_config::CalifConfig;
use calif_core::GradingMode;
use calif_engine::{GradingLayout, TeamRegistry};

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_enum;

/// Configuration and roots shared by every command handler.
pub struct AppContext {
    pub config: CalifConfig,
    layout: GradingLayout,
}

/// Which roots a command reads or writes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Roots {
    Submissions,
    Grading,
    Both,
}

impl AppContext {
    /// Load config and apply `--root` / `--grading-root`.
    pub fn init(flags: &GlobalFlags) -> anyhow::Result<Self> {
        let mut config =
            CalifConfig::load_with_dotenv().context("failed to load calif configuration")?;
        apply_overrides(&mut config, flags);
        super::warn_unconfigured(&config);
        Ok(Self::new(config))
    }

    #[must_use]
    pub fn new(config: CalifConfig) -> Self {
        let layout = GradingLayout::new(
            config.paths.submissions_root.trim(),
            config.paths.grading_root.trim(),
        );
        Self { config, layout }
    }

    /// The layout, after checking that the roots a command needs are set.
    pub fn layout(&self, roots: Roots) -> anyhow::Result<&GradingLayout> {
        if matches!(roots, Roots::Submissions | Roots::Both) {
            self.config.paths.submissions_root()?;
        }
        if matches!(roots, Roots::Grading | Roots::Both) {
            self.config.paths.grading_root()?;
        }
        tracing::debug!(
            submissions_root = %self.layout.submissions_root.display(),
            grading_root = %self.layout.grading_root.display(),
            "context: roots resolved"
        );
        Ok(&self.layout)
    }

    #[must_use]
    pub fn registry(&self) -> TeamRegistry {
        TeamRegistry::new(self.layout.clone())
    }

    #[must_use]
    pub fn audio_extensions(&self) -> Vec<String> {
        self.config.review.audio_extensions.clone()
    }

    /// `--mode` when given, else the mode recorded in the group's team file,
    /// else the configured default.
    pub fn resolve_mode(&self, raw: Option<&str>, group: &str) -> anyhow::Result<GradingMode> {
        if let Some(raw) = raw {
            return parse_enum(raw, "mode");
        }
        let registry = self.registry();
        if registry.exists(group) {
            return Ok(registry.load(group).mode());
        }
        Ok(self.config.general.default_mode)
    }
}

fn apply_overrides(config: &mut CalifConfig, flags: &GlobalFlags) {
    if let Some(root) = &flags.root {
        config.paths.submissions_root.clone_from(root);
    }
    if let Some(root) = &flags.grading_root {
        config.paths.grading_root.clone_from(root);
    }
}
