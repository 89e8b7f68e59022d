use clap::Subcommand;

/// Hand-off queues.
#[derive(Clone, Debug, Subcommand)]
pub enum PendingCommands {
    /// Synced artifacts with no graded counterpart.
    Grading,
    /// Graded audio without a transcription.
    Transcription,
}
