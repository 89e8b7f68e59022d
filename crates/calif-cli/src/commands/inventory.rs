use calif_engine::InventoryEntry;
use calif_engine::scanner::inventory;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::InventoryArgs;
use crate::context::{AppContext, Roots};
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct InventoryResponse {
    group: String,
    task: Option<String>,
    entries: Vec<InventoryEntry>,
    count: usize,
}

/// Handle `calif inventory`.
pub fn handle(args: &InventoryArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let layout = ctx.layout(Roots::Submissions)?;
    let progress = Progress::spinner(&format!("scanning {}", args.group));
    let entries = inventory(layout, &args.group, args.task.as_deref());
    progress.finish(&entries, "scan failed");

    let entries = entries?;
    let count = entries.len();
    output(
        &InventoryResponse {
            group: args.group.clone(),
            task: args.task.clone(),
            entries,
            count,
        },
        flags.format,
    )
}
