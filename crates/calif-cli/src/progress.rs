use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::ui;

const TICK: Duration = Duration::from_millis(120);

/// Spinner or per-task bar on stderr; inert when progress is disabled.
pub struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    /// Spinner for a single step whose length is unknown (a scan, a sync).
    #[must_use]
    pub fn spinner(message: &str) -> Self {
        Self::start(|| {
            let bar = ProgressBar::new_spinner();
            bar.enable_steady_tick(TICK);
            bar.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.set_message(message.to_string());
            bar
        })
    }

    /// Bar advancing once per task folder.
    #[must_use]
    pub fn tasks(total: usize, group: &str) -> Self {
        Self::start(|| {
            let bar = ProgressBar::new(u64::try_from(total).unwrap_or(u64::MAX));
            bar.set_style(
                ProgressStyle::with_template(task_template(ui::prefs().term_width))
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar.set_prefix(group.to_string());
            bar
        })
    }

    fn start(build: impl FnOnce() -> ProgressBar) -> Self {
        let bar = ui::prefs().progress.then(build);
        Self { bar }
    }

    /// Show `task` as the one being worked on and count it.
    pub fn task_started(&self, task: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(task.to_string());
            bar.inc(1);
        }
    }

    /// Clear the bar on success, leave a note behind on failure.
    pub fn finish<T, E>(&self, result: &Result<T, E>, failure: &str) {
        let Some(bar) = &self.bar else {
            return;
        };
        if result.is_ok() {
            bar.finish_and_clear();
        } else {
            bar.abandon_with_message(failure.to_string());
        }
    }
}

fn task_template(width: Option<usize>) -> &'static str {
    match width {
        Some(cols) if cols >= 100 => "{prefix:.bold} {bar:40.cyan/blue} {pos}/{len} {msg}",
        Some(cols) if cols < 60 => "{prefix:.bold} {pos}/{len}",
        _ => "{prefix:.bold} {wide_bar:.cyan/blue} {pos}/{len}",
    }
}
