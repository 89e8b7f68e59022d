//! Errors for filenames that do not follow the naming contract.
//!
//! These are always recoverable: callers report the offending file and keep
//! processing the rest of the batch.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    /// An individual artifact stem has no `<task>_<student>` separator.
    #[error("'{name}' does not split into <task>_<student>")]
    MissingSeparator { name: String },

    /// A team artifact stem does not carry the team marker.
    #[error("'{name}' has no team marker")]
    MissingTeamMarker { name: String },

    /// The team marker is the last token, with nothing after it.
    #[error("'{name}' has a team marker but no team id")]
    MissingTeamId { name: String },

    /// The token after the team marker is not a number.
    #[error("'{name}' has a non-numeric team id '{raw}'")]
    InvalidTeamId { name: String, raw: String },
}
