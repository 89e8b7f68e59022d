use std::path::Path;

use anyhow::Context;
use calif_core::GradingMode;
use calif_engine::{SyncEngine, SyncReport};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SyncArgs;
use crate::commands::shared::parse::parse_enum;
use crate::commands::shared::viewer::open_path;
use crate::context::{AppContext, Roots};
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct SyncResponse {
    copied: usize,
    #[serde(flatten)]
    report: SyncReport,
}

/// Handle `calif sync`.
pub fn handle(args: &SyncArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let layout = ctx.layout(Roots::Both)?;
    let mode: GradingMode = match args.mode.as_deref() {
        Some(raw) => parse_enum(raw, "mode")?,
        None => ctx.config.general.default_mode,
    };
    let (group, task) = (&args.target.group, &args.target.task);

    let progress = Progress::spinner(&format!("syncing {task} ({mode})"));
    let result = SyncEngine::new(layout.clone()).sync(group, task, mode);
    progress.finish(&result, "sync failed");
    let report = result.with_context(|| format!("failed to sync '{task}' of '{group}'"))?;

    for issue in &report.skipped {
        tracing::warn!(path = %issue.path, reason = %issue.reason, "sync: skipped");
    }
    if ctx.config.review.open_files && !flags.quiet {
        open_path(Path::new(&report.workspace));
    }

    output(
        &SyncResponse {
            copied: report.copied(),
            report,
        },
        flags.format,
    )
}
