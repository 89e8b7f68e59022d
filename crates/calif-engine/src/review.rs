//! Resumable review session over one grading workspace.
//!
//! The driver walks the pending items in name order and asks a
//! [`DecisionSource`] what to do with each one. Completions are persisted one
//! by one through [`ProgressTracker`], so stopping at any point (a pause, an
//! error, a killed process) resumes at the first unrecorded item.

use std::path::{Path, PathBuf};

use calif_core::naming::graded_name;
use calif_core::{GradingMode, ProgressStatus, ReviewDecision};
use serde::Serialize;

use crate::error::EngineError;
use crate::progress::{ProgressTracker, discover_items};

/// One pending item as presented to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewItem {
    pub file_name: String,
    pub path: PathBuf,
    /// 1-based: items already completed plus the position among pending ones.
    pub number: u32,
    pub total: usize,
    /// Graded audio already recorded for this item (`Cal_<stem>.<ext>`).
    pub existing_feedback: Vec<String>,
}

/// Something that decides what happens to each pending item.
pub trait DecisionSource {
    /// # Errors
    ///
    /// An I/O error aborts the session; completions recorded so far stay.
    fn decide(&mut self, item: &ReviewItem) -> std::io::Result<ReviewDecision>;
}

impl<F> DecisionSource for F
where
    F: FnMut(&ReviewItem) -> std::io::Result<ReviewDecision>,
{
    fn decide(&mut self, item: &ReviewItem) -> std::io::Result<ReviewDecision> {
        self(item)
    }
}

/// What a workspace looks like before the session starts.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewPlan {
    pub workspace: String,
    pub mode: GradingMode,
    pub total: usize,
    pub completed: usize,
    pub pending: Vec<ReviewItem>,
}

impl ReviewPlan {
    #[must_use]
    pub fn status(&self) -> ProgressStatus {
        ProgressStatus::from_counts(self.completed, self.total)
    }
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionOutcome {
    pub status: ProgressStatus,
    pub total: usize,
    pub completed: usize,
    pub completed_now: Vec<String>,
    pub skipped: Vec<String>,
    pub paused_at: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReviewSession {
    tracker: ProgressTracker,
    mode: GradingMode,
    audio_extensions: Vec<String>,
}

impl ReviewSession {
    pub fn new(workspace: impl Into<PathBuf>, mode: GradingMode, audio_extensions: Vec<String>) -> Self {
        Self {
            tracker: ProgressTracker::new(workspace),
            mode,
            audio_extensions,
        }
    }

    #[must_use]
    pub const fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    /// Items and pending work as currently on disk.
    ///
    /// # Errors
    ///
    /// [`EngineError::WorkspaceNotFound`] when the workspace was never synced.
    pub fn plan(&self) -> Result<ReviewPlan, EngineError> {
        let workspace = self.tracker.workspace();
        let items = discover_items(workspace, self.mode)?;
        let state = self.tracker.load();
        let completed = items.iter().filter(|item| state.is_done(item)).count();

        let pending = items
            .iter()
            .filter(|item| !state.is_done(item))
            .zip(1_u32..)
            .map(|(file_name, offset)| ReviewItem {
                file_name: file_name.clone(),
                path: workspace.join(file_name),
                number: u32::try_from(completed).unwrap_or(u32::MAX).saturating_add(offset),
                total: items.len(),
                existing_feedback: self.existing_feedback(workspace, file_name),
            })
            .collect();

        Ok(ReviewPlan {
            workspace: workspace.to_string_lossy().to_string(),
            mode: self.mode,
            total: items.len(),
            completed,
            pending,
        })
    }

    /// Forget recorded progress and plan from scratch.
    ///
    /// # Errors
    ///
    /// Same as [`Self::plan`], plus failures removing the progress file.
    pub fn restart(&self) -> Result<ReviewPlan, EngineError> {
        self.tracker.reset()?;
        self.plan()
    }

    /// Walk pending items until they run out or the operator pauses.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the workspace is missing, progress cannot
    /// be written, or the decision source fails.
    pub fn run(&self, decisions: &mut impl DecisionSource) -> Result<SessionOutcome, EngineError> {
        let plan = self.plan()?;
        let mut completed = plan.completed;
        let mut completed_now = Vec::new();
        let mut skipped = Vec::new();
        let mut paused_at = None;

        for item in &plan.pending {
            let decision = decisions
                .decide(item)
                .map_err(|e| EngineError::io(&item.path, e))?;
            tracing::debug!(file_name = %item.file_name, %decision, "review: decision");
            match decision {
                ReviewDecision::Complete => {
                    self.tracker.mark_done(&item.file_name, item.number)?;
                    completed += 1;
                    completed_now.push(item.file_name.clone());
                }
                ReviewDecision::Skip => skipped.push(item.file_name.clone()),
                ReviewDecision::Pause => {
                    paused_at = Some(item.file_name.clone());
                    break;
                }
            }
        }

        let status = if paused_at.is_some() {
            ProgressStatus::Paused
        } else {
            ProgressStatus::from_counts(completed, plan.total)
        };
        tracing::info!(
            workspace = %plan.workspace,
            %status,
            completed,
            total = plan.total,
            "review: session ended"
        );

        Ok(SessionOutcome {
            status,
            total: plan.total,
            completed,
            completed_now,
            skipped,
            paused_at,
        })
    }

    fn existing_feedback(&self, workspace: &Path, file_name: &str) -> Vec<String> {
        let stem = Path::new(file_name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();
        self.audio_extensions
            .iter()
            .map(|ext| graded_name(&format!("{stem}.{ext}")))
            .filter(|name| workspace.join(name).is_file())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    fn workspace(names: &[&str]) -> tempfile::TempDir {
        let tmp = tempfile::TempDir::new().expect("tempdir should create");
        for name in names {
            fs::write(tmp.path().join(name), "").expect("write");
        }
        tmp
    }

    fn session(tmp: &tempfile::TempDir) -> ReviewSession {
        ReviewSession::new(
            tmp.path(),
            GradingMode::Individual,
            vec!["mp3".to_string(), "wav".to_string()],
        )
    }

    #[test]
    fn skip_leaves_item_pending() {
        let tmp = workspace(&["a.pdf", "b.pdf"]);
        let session = session(&tmp);
        let outcome = session
            .run(&mut |item: &ReviewItem| -> std::io::Result<ReviewDecision> {
                Ok(if item.file_name == "a.pdf" {
                    ReviewDecision::Skip
                } else {
                    ReviewDecision::Complete
                })
            })
            .expect("run");

        assert_eq!(outcome.skipped, vec!["a.pdf".to_string()]);
        assert_eq!(outcome.status, ProgressStatus::InProgress);
        let plan = session.plan().expect("plan");
        assert_eq!(plan.pending.len(), 1);
        assert_eq!(plan.pending[0].file_name, "a.pdf");
        assert_eq!(plan.pending[0].number, 2);
    }

    #[test]
    fn existing_audio_feedback_is_reported() {
        let tmp = workspace(&["a.pdf", "Cal_a.wav", "b.pdf"]);
        let plan = session(&tmp).plan().expect("plan");
        assert_eq!(plan.pending[0].existing_feedback, vec!["Cal_a.wav".to_string()]);
        assert!(plan.pending[1].existing_feedback.is_empty());
    }

    #[test]
    fn decision_errors_abort_but_keep_recorded_items() {
        let tmp = workspace(&["a.pdf", "b.pdf"]);
        let session = session(&tmp);
        let result = session.run(&mut |item: &ReviewItem| -> std::io::Result<ReviewDecision> {
            if item.file_name == "a.pdf" {
                Ok(ReviewDecision::Complete)
            } else {
                Err(std::io::Error::other("stdin closed"))
            }
        });
        assert!(result.is_err());
        assert!(session.tracker().load().is_done("a.pdf"));
    }

    #[test]
    fn restart_brings_everything_back() {
        let tmp = workspace(&["a.pdf"]);
        let session = session(&tmp);
        session
            .run(&mut |_: &ReviewItem| -> std::io::Result<ReviewDecision> {
                Ok(ReviewDecision::Complete)
            })
            .expect("run");
        assert_eq!(session.plan().expect("plan").status(), ProgressStatus::Completed);

        let plan = session.restart().expect("restart");
        assert_eq!(plan.pending.len(), 1);
        assert_eq!(plan.status(), ProgressStatus::NotStarted);
    }
}
