use calif_engine::{ProgressSummary, ProgressTracker, discover_items};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::TaskTarget;
use crate::cli::subcommands::progress::{ProgressCommands, ProgressStatusArgs};
use crate::context::{AppContext, Roots};
use crate::output::output;

pub fn handle(
    action: &ProgressCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ProgressCommands::Status(args) => status(args, ctx, flags),
        ProgressCommands::Reset(target) => reset(target, ctx, flags),
    }
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    mode: calif_core::GradingMode,
    #[serde(flatten)]
    summary: ProgressSummary,
}

fn status(args: &ProgressStatusArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let layout = ctx.layout(Roots::Grading)?;
    let mode = ctx.resolve_mode(args.mode.as_deref(), &args.target.group)?;
    let workspace = layout.workspace(&args.target.group, &args.target.task);
    let items = discover_items(&workspace, mode)?;
    let summary = ProgressTracker::new(workspace).summary(&items);
    output(&StatusResponse { mode, summary }, flags.format)
}

#[derive(Debug, Serialize)]
struct ResetResponse {
    workspace: String,
    reset: bool,
}

fn reset(target: &TaskTarget, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let layout = ctx.layout(Roots::Grading)?;
    let workspace = layout.workspace(&target.group, &target.task);
    let tracker = ProgressTracker::new(&workspace);
    let existed = tracker.path().is_file();
    tracker.reset()?;
    output(
        &ResetResponse {
            workspace: workspace.to_string_lossy().to_string(),
            reset: existed,
        },
        flags.format,
    )
}
