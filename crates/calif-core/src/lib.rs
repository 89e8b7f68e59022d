//! # calif-core
//!
//! Foundational types shared across the calif crates:
//! - The naming contract between the submission tree, the grading workspace,
//!   and the returned feedback (`naming`)
//! - Records persisted as JSON next to the data they describe (`records`)
//! - Grading mode, progress status, and review decision enums (`enums`)
//! - Errors raised when a filename breaks the naming contract (`errors`)

pub mod enums;
pub mod errors;
pub mod naming;
pub mod records;

pub use enums::{GradingMode, ProgressStatus, ReviewDecision};
pub use errors::NamingError;
pub use records::{
    CopyRecord, ProgressState, StudentCopy, SyncManifest, TeamCopy, TeamMapping, TeamMember,
};
