use calif_core::{ProgressState, SyncManifest, TeamMapping};
use schemars::schema_for;

use crate::cli::root_commands::{SchemaArgs, SchemaType};
use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::output;

/// Handle `calif schema`. Needs no configuration.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = match args.type_name {
        SchemaType::TeamMapping => schema_for!(TeamMapping),
        SchemaType::Progress => schema_for!(ProgressState),
        SchemaType::Manifest => schema_for!(SyncManifest),
    };
    let format = match flags.format {
        OutputFormat::Raw => OutputFormat::Raw,
        OutputFormat::Json | OutputFormat::Table => OutputFormat::Json,
    };
    output(&schema, format)
}
