use clap::{Args, Subcommand, ValueEnum};

use crate::cli::subcommands::{PendingCommands, ProgressCommands, TeamsCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// List groups with their ungraded counts.
    Groups,
    /// List the tasks of a group with graded/ungraded counts.
    Tasks(GroupArgs),
    /// Latest artifact of every student task in a group.
    Inventory(InventoryArgs),
    /// Copy the latest submissions of a task into its grading workspace.
    Sync(SyncArgs),
    /// Team file of a group.
    Teams {
        #[command(subcommand)]
        action: TeamsCommands,
    },
    /// Review progress of a grading workspace.
    Progress {
        #[command(subcommand)]
        action: ProgressCommands,
    },
    /// Walk the pending items of a grading workspace one by one.
    Review(ReviewArgs),
    /// Return graded feedback of one task to the students.
    Distribute(DistributeArgs),
    /// Return graded feedback of every task of a group.
    DistributeAll(GroupArgs),
    /// Work queues for the external grader and transcriber.
    Pending {
        #[command(subcommand)]
        action: PendingCommands,
    },
    /// Print the JSON Schema of a persisted file.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct GroupArgs {
    /// Group folder name (including " - Submitted files").
    pub group: String,
}

/// A task inside a group.
#[derive(Clone, Debug, Args)]
pub struct TaskTarget {
    /// Group folder name (including " - Submitted files").
    pub group: String,
    /// Task folder name, as it appears under each student.
    pub task: String,
}

#[derive(Clone, Debug, Args)]
pub struct InventoryArgs {
    /// Group folder name.
    pub group: String,
    /// Only this task (case-insensitive).
    #[arg(long)]
    pub task: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct SyncArgs {
    #[command(flatten)]
    pub target: TaskTarget,
    /// Grading mode: individual, equipos (alias: teams). Defaults to config.
    #[arg(long)]
    pub mode: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ReviewArgs {
    #[command(flatten)]
    pub target: TaskTarget,
    /// Grading mode: individual, equipos (alias: teams). Defaults to the
    /// team file, then config.
    #[arg(long)]
    pub mode: Option<String>,
    /// Do not open artifacts in the system viewer.
    #[arg(long)]
    pub no_open: bool,
}

#[derive(Clone, Debug, Args)]
pub struct DistributeArgs {
    #[command(flatten)]
    pub target: TaskTarget,
    /// Grading mode: individual, equipos (alias: teams). Defaults to the
    /// team file.
    #[arg(long)]
    pub mode: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaType {
    TeamMapping,
    Progress,
    Manifest,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Which persisted file.
    pub type_name: SchemaType,
}
