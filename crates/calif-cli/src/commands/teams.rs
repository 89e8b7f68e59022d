use std::collections::BTreeMap;

use calif_core::{GradingMode, TeamMember};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::teams::{TeamsAssignArgs, TeamsCommands, TeamsShowArgs};
use crate::context::{AppContext, Roots};
use crate::output::output;

#[derive(Debug, Serialize)]
struct TeamsResponse {
    group: String,
    path: String,
    mode: GradingMode,
    default_team_id: u32,
    teams: BTreeMap<u32, Vec<String>>,
    students: Vec<TeamMember>,
    count: usize,
}

pub fn handle(action: &TeamsCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        TeamsCommands::Show(args) => show(args, ctx, flags),
        TeamsCommands::Assign(args) => assign(args, ctx, flags),
    }
}

fn show(args: &TeamsShowArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.layout(Roots::Grading)?;
    let registry = ctx.registry();
    let mapping = registry.load_existing(&args.group)?;

    let teams = mapping
        .members_by_team()
        .into_iter()
        .map(|(team_id, members)| (team_id, members.into_iter().collect()))
        .collect();
    output(
        &TeamsResponse {
            group: mapping.group.clone(),
            path: registry.file_path(&args.group).to_string_lossy().to_string(),
            mode: mapping.mode(),
            default_team_id: mapping.default_team_id,
            teams,
            count: mapping.students.len(),
            students: mapping.students,
        },
        flags.format,
    )
}

#[derive(Debug, Serialize)]
struct AssignResponse {
    group: String,
    student: String,
    team_id: u32,
    members: Vec<String>,
    path: String,
}

fn assign(args: &TeamsAssignArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let layout = ctx.layout(Roots::Grading)?;
    if ctx.config.paths.submissions_root().is_ok()
        && !layout.group_dir(&args.group).join(&args.student).is_dir()
    {
        tracing::warn!(
            group = %args.group,
            student = %args.student,
            "teams: no submission folder for this student; assigning anyway"
        );
    }

    let registry = ctx.registry();
    let mapping = registry.assign(&args.group, &args.student, args.team_id)?;
    output(
        &AssignResponse {
            group: args.group.clone(),
            student: args.student.clone(),
            team_id: args.team_id,
            members: mapping.members_of(args.team_id).into_iter().collect(),
            path: registry.file_path(&args.group).to_string_lossy().to_string(),
        },
        flags.format,
    )
}
