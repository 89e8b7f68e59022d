use calif_engine::{PendingItem, pending_grading, pending_transcription};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::PendingCommands;
use crate::context::{AppContext, Roots};
use crate::output::output;

#[derive(Debug, Serialize)]
struct PendingResponse {
    queue: &'static str,
    items: Vec<PendingItem>,
    count: usize,
}

/// Handle `calif pending`.
pub fn handle(
    action: &PendingCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let layout = ctx.layout(Roots::Grading)?;
    let (queue, items) = match action {
        PendingCommands::Grading => ("grading", pending_grading(layout)?),
        PendingCommands::Transcription => ("transcription", pending_transcription(layout)?),
    };
    let count = items.len();
    output(
        &PendingResponse {
            queue,
            items,
            count,
        },
        flags.format,
    )
}
