use calif_core::naming::clean_group_name;
use calif_engine::TaskSummary;
use calif_engine::scanner::list_tasks;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::GroupArgs;
use crate::context::{AppContext, Roots};
use crate::output::output;

#[derive(Debug, Serialize)]
struct TasksResponse {
    group: String,
    tasks: Vec<TaskSummary>,
    count: usize,
}

/// Handle `calif tasks`.
pub fn handle(args: &GroupArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let tasks = list_tasks(ctx.layout(Roots::Submissions)?, &args.group)?;
    let count = tasks.len();
    output(
        &TasksResponse {
            group: clean_group_name(&args.group).to_string(),
            tasks,
            count,
        },
        flags.format,
    )
}
