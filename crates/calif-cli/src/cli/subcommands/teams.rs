use clap::{Args, Subcommand};

/// Team file commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TeamsCommands {
    /// Show the team file of a group.
    Show(TeamsShowArgs),
    /// Set one student's team.
    Assign(TeamsAssignArgs),
}

#[derive(Clone, Debug, Args)]
pub struct TeamsShowArgs {
    /// Group folder name.
    pub group: String,
}

#[derive(Clone, Debug, Args)]
pub struct TeamsAssignArgs {
    /// Group folder name.
    pub group: String,
    /// Student folder name.
    pub student: String,
    /// Team id.
    pub team_id: u32,
}
