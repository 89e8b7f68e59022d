use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{ColorMode, GlobalFlags, OutputFormat, ProgressMode};
pub use root_commands::Commands;

/// Top-level CLI parser for the `calif` binary.
#[derive(Debug, Parser)]
#[command(
    name = "calif",
    version,
    about = "calif - sync, review, and return graded submissions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Table colors: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorMode,

    /// Progress bars: auto, on, off
    #[arg(long, global = true, default_value = "auto")]
    pub progress: ProgressMode,

    /// Submissions root (overrides paths.submissions_root)
    #[arg(long, global = true)]
    pub root: Option<String>,

    /// Grading root (overrides paths.grading_root)
    #[arg(long, global = true)]
    pub grading_root: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            color: self.color,
            progress: self.progress,
            root: self.root.clone(),
            grading_root: self.grading_root.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::subcommands::{PendingCommands, ProgressCommands, TeamsCommands};
    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["calif", "--format", "table", "--verbose", "groups"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Groups));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["calif", "groups", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["calif", "--format", "xml", "groups"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn root_overrides_are_copied_into_flags() {
        let cli = Cli::try_parse_from([
            "calif",
            "--root",
            "/subs",
            "--grading-root",
            "/cal",
            "groups",
        ])
        .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.root.as_deref(), Some("/subs"));
        assert_eq!(flags.grading_root.as_deref(), Some("/cal"));
    }

    #[test]
    fn sync_takes_group_task_and_optional_mode() {
        let cli = Cli::try_parse_from([
            "calif",
            "sync",
            "G - Submitted files",
            "1. Lab",
            "--mode",
            "individual",
        ])
        .expect("cli should parse");
        let Commands::Sync(args) = cli.command else {
            panic!("expected sync");
        };
        assert_eq!(args.target.group, "G - Submitted files");
        assert_eq!(args.target.task, "1. Lab");
        assert_eq!(args.mode.as_deref(), Some("individual"));
    }

    #[test]
    fn nested_subcommands_parse() {
        let cli = Cli::try_parse_from(["calif", "teams", "assign", "G", "Ana Ruiz", "3"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Teams {
                action: TeamsCommands::Assign(ref args)
            } if args.team_id == 3 && args.student == "Ana Ruiz"
        ));

        let cli = Cli::try_parse_from(["calif", "progress", "reset", "G", "1. Lab"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Progress {
                action: ProgressCommands::Reset(_)
            }
        ));

        let cli = Cli::try_parse_from(["calif", "pending", "transcription"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Pending {
                action: PendingCommands::Transcription
            }
        ));
    }

    #[test]
    fn team_id_must_be_numeric() {
        let parsed = Cli::try_parse_from(["calif", "teams", "assign", "G", "Ana", "uno"]);
        assert!(parsed.is_err());
    }
}
