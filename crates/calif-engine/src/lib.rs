//! # calif-engine
//!
//! Filesystem engine behind the `calif` CLI.
//!
//! - [`scanner`]: groups, tasks, and latest artifacts in the submissions tree
//! - [`sync`]: copy latest submissions into a grading workspace
//! - [`teams`]: the per-group team file
//! - [`progress`] and [`review`]: resumable review sessions
//! - [`distribute`]: return graded feedback to every recipient
//! - [`pending`]: queues for the external grader and transcriber
//!
//! The submissions tree is never modified except for the `Calificado`
//! folders that [`distribute`] writes into. Everything else is written under
//! the grading root.

pub mod distribute;
pub mod error;
pub mod fsutil;
pub mod layout;
pub mod pending;
pub mod progress;
pub mod report;
pub mod review;
pub mod scanner;
pub mod sync;
pub mod teams;
pub mod version;

pub use distribute::{BulkDistributionReport, Delivery, DistributionReport, FeedbackDistributor};
pub use error::EngineError;
pub use layout::GradingLayout;
pub use pending::{PendingItem, pending_grading, pending_transcription};
pub use progress::{ProgressSummary, ProgressTracker, discover_items};
pub use report::ItemIssue;
pub use review::{DecisionSource, ReviewItem, ReviewPlan, ReviewSession, SessionOutcome};
pub use scanner::{GroupSummary, InventoryEntry, TaskSummary};
pub use sync::{SyncEngine, SyncReport};
pub use teams::TeamRegistry;
