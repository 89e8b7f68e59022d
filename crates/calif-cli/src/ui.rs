use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{ColorMode, GlobalFlags, OutputFormat, ProgressMode};

/// Terminal facts resolved once at startup.
#[derive(Clone, Copy, Debug, Default)]
pub struct UiPrefs {
    pub table_color: bool,
    pub progress: bool,
    pub term_width: Option<usize>,
    /// A person is at the keyboard: prompts and viewers make sense.
    pub interactive: bool,
}

#[derive(Clone, Copy, Debug)]
struct Terminal {
    stdout_tty: bool,
    stdin_tty: bool,
    stderr_tty: bool,
    no_color: bool,
    columns: Option<usize>,
}

impl Terminal {
    fn detect() -> Self {
        Self {
            stdout_tty: std::io::stdout().is_terminal(),
            stdin_tty: std::io::stdin().is_terminal(),
            stderr_tty: std::io::stderr().is_terminal(),
            no_color: std::env::var_os("NO_COLOR").is_some(),
            columns: std::env::var("COLUMNS")
                .ok()
                .and_then(|value| value.parse().ok()),
        }
    }
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let _ = UI_PREFS.set(resolve(flags, Terminal::detect()));
}

#[must_use]
pub fn prefs() -> UiPrefs {
    UI_PREFS.get().copied().unwrap_or_default()
}

fn resolve(flags: &GlobalFlags, terminal: Terminal) -> UiPrefs {
    let table = flags.format == OutputFormat::Table;
    let table_color = match flags.color {
        ColorMode::Always => table,
        ColorMode::Never => false,
        ColorMode::Auto => table && terminal.stdout_tty && !flags.quiet && !terminal.no_color,
    };

    // Bars go to stderr, but a piped stdout usually means a script is reading.
    let progress = !flags.quiet
        && match flags.progress {
            ProgressMode::On => true,
            ProgressMode::Off => false,
            ProgressMode::Auto => terminal.stdout_tty && flags.format != OutputFormat::Json,
        };

    UiPrefs {
        table_color,
        progress,
        term_width: terminal.columns.filter(|width| *width >= 40),
        interactive: terminal.stdin_tty && terminal.stderr_tty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(format: OutputFormat) -> GlobalFlags {
        GlobalFlags {
            format,
            quiet: false,
            verbose: false,
            color: ColorMode::Auto,
            progress: ProgressMode::Auto,
            root: None,
            grading_root: None,
        }
    }

    const TTY: Terminal = Terminal {
        stdout_tty: true,
        stdin_tty: true,
        stderr_tty: true,
        no_color: false,
        columns: Some(120),
    };

    #[test]
    fn table_on_a_terminal_gets_color_and_progress() {
        let prefs = resolve(&flags(OutputFormat::Table), TTY);
        assert!(prefs.table_color);
        assert!(prefs.progress);
        assert!(prefs.interactive);
        assert_eq!(prefs.term_width, Some(120));
    }

    #[test]
    fn json_output_stays_plain() {
        let prefs = resolve(&flags(OutputFormat::Json), TTY);
        assert!(!prefs.table_color);
        assert!(!prefs.progress);
    }

    #[test]
    fn quiet_and_no_color_win_over_auto() {
        let mut quiet = flags(OutputFormat::Table);
        quiet.quiet = true;
        quiet.progress = ProgressMode::On;
        assert!(!resolve(&quiet, TTY).progress);

        let no_color = Terminal {
            no_color: true,
            ..TTY
        };
        assert!(!resolve(&flags(OutputFormat::Table), no_color).table_color);
    }

    #[test]
    fn piped_stdin_is_not_interactive() {
        let piped = Terminal {
            stdin_tty: false,
            columns: Some(20),
            ..TTY
        };
        let prefs = resolve(&flags(OutputFormat::Table), piped);
        assert!(!prefs.interactive);
        assert_eq!(prefs.term_width, None);
    }
}
