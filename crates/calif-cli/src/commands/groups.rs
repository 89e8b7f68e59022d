use calif_engine::GroupSummary;
use calif_engine::scanner::list_groups;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::{AppContext, Roots};
use crate::output::output;

#[derive(Debug, Serialize)]
struct GroupsResponse {
    groups: Vec<GroupSummary>,
    count: usize,
}

/// Handle `calif groups`.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let groups = list_groups(ctx.layout(Roots::Submissions)?)?;
    let count = groups.len();
    output(&GroupsResponse { groups, count }, flags.format)
}
