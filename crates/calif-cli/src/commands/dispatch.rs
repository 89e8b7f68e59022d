use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Groups => commands::groups::handle(ctx, flags),
        Commands::Tasks(args) => commands::tasks::handle(&args, ctx, flags),
        Commands::Inventory(args) => commands::inventory::handle(&args, ctx, flags),
        Commands::Sync(args) => commands::sync::handle(&args, ctx, flags),
        Commands::Teams { action } => commands::teams::handle(&action, ctx, flags),
        Commands::Progress { action } => commands::progress::handle(&action, ctx, flags),
        Commands::Review(args) => commands::review::handle(&args, ctx, flags),
        Commands::Distribute(args) => commands::distribute::handle(&args, ctx, flags),
        Commands::DistributeAll(args) => commands::distribute::handle_all(&args, ctx, flags),
        Commands::Pending { action } => commands::pending::handle(&action, ctx, flags),
        Commands::Schema(_) => unreachable!("schema is pre-dispatched in main"),
    }
}
