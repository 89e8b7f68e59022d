use clap::{Args, Subcommand};

use crate::cli::root_commands::TaskTarget;

/// Review progress commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ProgressCommands {
    /// Completed and pending counts of a workspace.
    Status(ProgressStatusArgs),
    /// Forget recorded progress of a workspace.
    Reset(TaskTarget),
}

#[derive(Clone, Debug, Args)]
pub struct ProgressStatusArgs {
    #[command(flatten)]
    pub target: TaskTarget,
    /// Grading mode used to discover items. Defaults to the team file.
    #[arg(long)]
    pub mode: Option<String>,
}
