pub mod pending;
pub mod progress;
pub mod teams;

pub use pending::PendingCommands;
pub use progress::ProgressCommands;
pub use teams::TeamsCommands;
