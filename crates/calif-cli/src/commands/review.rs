use std::io::{self, BufRead, Write};

use calif_core::ReviewDecision;
use calif_engine::{DecisionSource, ReviewItem, ReviewSession};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ReviewArgs;
use crate::commands::shared::viewer::open_path;
use crate::context::{AppContext, Roots};
use crate::output::output;

/// Handle `calif review`.
pub fn handle(args: &ReviewArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let layout = ctx.layout(Roots::Grading)?;
    let mode = ctx.resolve_mode(args.mode.as_deref(), &args.target.group)?;
    let workspace = layout.workspace(&args.target.group, &args.target.task);
    let session = ReviewSession::new(&workspace, mode, ctx.audio_extensions());

    let stdin = io::stdin();
    let mut prompt = ConsolePrompt::new(
        stdin.lock(),
        io::stderr(),
        ctx.config.review.open_files && !args.no_open,
    );

    let plan = session.plan()?;
    writeln!(
        prompt.out,
        "{}: {} of {} items completed ({mode})",
        workspace.display(),
        plan.completed,
        plan.total
    )?;
    if plan.total > 0
        && plan.pending.is_empty()
        && prompt.confirm("Every item is completed. Start over?")?
    {
        session.restart()?;
    }

    let outcome = session.run(&mut prompt)?;
    output(&outcome, flags.format)
}

/// Line-oriented operator prompt.
///
/// Enter or `c` completes, `s` skips, `p` pauses. Closed input pauses.
pub struct ConsolePrompt<R, W> {
    input: R,
    out: W,
    open_files: bool,
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub const fn new(input: R, out: W, open_files: bool) -> Self {
        Self {
            input,
            out,
            open_files,
        }
    }

    /// Yes/no question; anything but yes is no.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        write!(self.out, "{question} [y/N] ")?;
        self.out.flush()?;
        Ok(self
            .read_line()?
            .is_some_and(|answer| matches!(answer.as_str(), "y" | "yes" | "si" | "sí")))
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_lowercase()))
    }
}

impl<R: BufRead, W: Write> DecisionSource for ConsolePrompt<R, W> {
    fn decide(&mut self, item: &ReviewItem) -> io::Result<ReviewDecision> {
        writeln!(
            self.out,
            "\n[{}/{}] {}",
            item.number, item.total, item.file_name
        )?;
        if self.open_files {
            open_path(&item.path);
        }

        if !item.existing_feedback.is_empty() {
            writeln!(
                self.out,
                "existing feedback: {}",
                item.existing_feedback.join(", ")
            )?;
            if self.confirm("Keep it and mark this item completed?")? {
                return Ok(ReviewDecision::Complete);
            }
        }

        loop {
            write!(self.out, "[Enter] completed  [s] skip  [p] pause > ")?;
            self.out.flush()?;
            let Some(answer) = self.read_line()? else {
                writeln!(self.out)?;
                return Ok(ReviewDecision::Pause);
            };
            match parse_decision(&answer) {
                Some(decision) => return Ok(decision),
                None => writeln!(self.out, "unrecognised answer '{answer}'")?,
            }
        }
    }
}

fn parse_decision(answer: &str) -> Option<ReviewDecision> {
    match answer {
        "" | "c" | "ok" => Some(ReviewDecision::Complete),
        "s" | "skip" => Some(ReviewDecision::Skip),
        "p" | "pause" | "q" => Some(ReviewDecision::Pause),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;

    fn item(existing_feedback: Vec<String>) -> ReviewItem {
        ReviewItem {
            file_name: "Lab_Equipo_1.pdf".to_string(),
            path: PathBuf::from("/cal/G/1. Lab/Lab_Equipo_1.pdf"),
            number: 4,
            total: 10,
            existing_feedback,
        }
    }

    fn decide(input: &str, item: &ReviewItem) -> (ReviewDecision, String) {
        let mut out = Vec::new();
        let decision = ConsolePrompt::new(Cursor::new(input.as_bytes()), &mut out, false)
            .decide(item)
            .expect("decision");
        (decision, String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn enter_completes_and_shows_position() {
        let (decision, out) = decide("\n", &item(Vec::new()));
        assert_eq!(decision, ReviewDecision::Complete);
        assert!(out.contains("[4/10] Lab_Equipo_1.pdf"));
    }

    #[test]
    fn unknown_answer_asks_again() {
        let (decision, out) = decide("x\nS\n", &item(Vec::new()));
        assert_eq!(decision, ReviewDecision::Skip);
        assert!(out.contains("unrecognised answer 'x'"));
    }

    #[test]
    fn closed_input_pauses() {
        let (decision, _) = decide("", &item(Vec::new()));
        assert_eq!(decision, ReviewDecision::Pause);
    }

    #[test]
    fn existing_feedback_can_be_kept() {
        let (decision, out) = decide("y\n", &item(vec!["Cal_Lab_Equipo_1.mp3".to_string()]));
        assert_eq!(decision, ReviewDecision::Complete);
        assert!(out.contains("Cal_Lab_Equipo_1.mp3"));

        let (decision, _) = decide("n\np\n", &item(vec!["Cal_Lab_Equipo_1.mp3".to_string()]));
        assert_eq!(decision, ReviewDecision::Pause);
    }
}
