use calif_core::GradingMode;
use calif_engine::{DistributionReport, FeedbackDistributor, ItemIssue};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{DistributeArgs, GroupArgs};
use crate::context::{AppContext, Roots};
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct DistributeResponse {
    copies: usize,
    #[serde(flatten)]
    report: DistributionReport,
}

/// Handle `calif distribute`.
pub fn handle(args: &DistributeArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let layout = ctx.layout(Roots::Both)?;
    let (group, task) = (&args.target.group, &args.target.task);
    let mode = ctx.resolve_mode(args.mode.as_deref(), group)?;
    let mapping = ctx.registry().load(group);
    if mode == GradingMode::Teams && mapping.students.is_empty() {
        tracing::warn!(group = %group, "distribute: team file is empty; every team will be skipped");
    }

    let distributor = FeedbackDistributor::new(layout.clone(), ctx.audio_extensions());
    let report = distributor.distribute(group, task, mode, &mapping)?;
    log_issues(&report);
    output(
        &DistributeResponse {
            copies: report.copies(),
            report,
        },
        flags.format,
    )
}

#[derive(Debug, Serialize)]
struct TaskRow {
    task: String,
    graded_files: usize,
    delivered: usize,
    copies: usize,
    skipped: usize,
    failed: usize,
}

#[derive(Debug, Serialize)]
struct DistributeAllResponse {
    group: String,
    mode: GradingMode,
    total_copies: usize,
    tasks: Vec<TaskRow>,
    skipped: Vec<ItemIssue>,
    failed: Vec<ItemIssue>,
}

/// Handle `calif distribute-all`.
pub fn handle_all(args: &GroupArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let layout = ctx.layout(Roots::Both)?;
    let distributor = FeedbackDistributor::new(layout.clone(), ctx.audio_extensions());

    let total = distributor.graded_tasks(&args.group)?.len();
    let progress = Progress::tasks(total, &args.group);
    let result = distributor.distribute_all_with(&args.group, |task| progress.task_started(task));
    progress.finish(&result, "distribution failed");
    let bulk = result?;

    let total_copies = bulk.copies();
    let mut tasks = Vec::new();
    let mut skipped = Vec::new();
    let mut failed = Vec::new();
    for report in bulk.tasks {
        log_issues(&report);
        tasks.push(TaskRow {
            task: report.task.clone(),
            graded_files: report.graded_files,
            delivered: report.delivered.len(),
            copies: report.copies(),
            skipped: report.skipped.len(),
            failed: report.failed.len(),
        });
        skipped.extend(report.skipped);
        failed.extend(report.failed);
    }

    output(
        &DistributeAllResponse {
            group: bulk.group,
            mode: bulk.mode,
            total_copies,
            tasks,
            skipped,
            failed,
        },
        flags.format,
    )
}

fn log_issues(report: &DistributionReport) {
    for issue in &report.skipped {
        tracing::warn!(path = %issue.path, reason = %issue.reason, "distribute: skipped");
    }
    for issue in &report.failed {
        tracing::warn!(path = %issue.path, reason = %issue.reason, "distribute: failed");
    }
}
