//! The naming contract.
//!
//! Group folders, version folders, synced artifacts, graded artifacts, and the
//! output folder are all recognised by name alone. The literals below must
//! stay bit-exact: the submission tree is produced by an external platform and
//! the graded files are renamed by hand or by the external grader.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::NamingError;

/// Suffix that marks a direct child of the submissions root as a group.
pub const GROUP_SUFFIX: &str = " - Submitted files";
/// Prefix a graded artifact carries in front of the synced filename.
pub const GRADED_PREFIX: &str = "Cal_";
/// Per-task-version folder receiving returned feedback.
pub const OUTPUT_DIRNAME: &str = "Calificado";
/// Folder under the grading root holding one team file per group.
pub const TEAMS_DIRNAME: &str = "Equipos";
/// Token separating the task from the team id in team artifact names.
pub const TEAM_MARKER: &str = "Equipo";
/// Team assigned to students the first time they are seen.
pub const DEFAULT_TEAM_ID: u32 = 1;
/// Extension of submission-type files.
pub const SUBMISSION_EXTENSION: &str = "pdf";
/// Audio sidecars fanned out together with a graded artifact.
pub const DEFAULT_AUDIO_EXTENSIONS: [&str; 2] = ["mp3", "wav"];
/// Audio formats the external transcriber accepts.
pub const TRANSCRIBABLE_AUDIO_EXTENSIONS: [&str; 3] = ["mp3", "wav", "m4a"];
/// Case-insensitive prefixes of version folders, accented and plain.
pub const VERSION_PREFIXES: [&str; 2] = ["versión", "version"];
/// Progress file kept inside each grading workspace.
pub const PROGRESS_FILENAME: &str = ".grading_progress.json";
/// Sync manifest kept inside each grading workspace.
pub const MANIFEST_FILENAME: &str = "metadata.json";
/// Suffix of the transcription written next to a graded audio file.
pub const TRANSCRIPTION_SUFFIX: &str = "_transcripcion";

static ORDINAL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s*").expect("ordinal prefix pattern is valid"));

/// Whether a directory name marks a group.
#[must_use]
pub fn is_group_dir_name(name: &str) -> bool {
    name.ends_with(GROUP_SUFFIX)
}

/// Group name without the platform suffix.
#[must_use]
pub fn clean_group_name(name: &str) -> &str {
    name.strip_suffix(GROUP_SUFFIX).unwrap_or(name)
}

/// Task name with a leading `"<number>. "` ordinal removed.
///
/// ```
/// assert_eq!(calif_core::naming::display_task_name("12. Lab final"), "Lab final");
/// assert_eq!(calif_core::naming::display_task_name("Lab"), "Lab");
/// ```
#[must_use]
pub fn display_task_name(raw: &str) -> &str {
    ORDINAL_PREFIX
        .find(raw)
        .map_or(raw, |found| &raw[found.end()..])
}

/// Version number of a folder named like `Version 3` or `versión 12`.
///
/// Returns `None` when the name lacks a version prefix or a trailing run of
/// digits. A run too long for `u64` saturates to `u64::MAX`.
#[must_use]
pub fn version_number(name: &str) -> Option<u64> {
    let lower = name.to_lowercase();
    if !VERSION_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(prefix))
    {
        return None;
    }

    let digits_start = name
        .char_indices()
        .rev()
        .take_while(|(_, ch)| ch.is_ascii_digit())
        .last()
        .map(|(index, _)| index)?;
    Some(name[digits_start..].parse().unwrap_or(u64::MAX))
}

/// Whether the path has the submission extension (case-insensitive).
#[must_use]
pub fn is_submission_file(path: &Path) -> bool {
    has_extension(path, &[SUBMISSION_EXTENSION])
}

/// Whether the path has one of the given extensions (case-insensitive).
#[must_use]
pub fn has_extension(path: &Path, extensions: &[impl AsRef<str>]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate.as_ref()))
        })
}

/// Synced filename for one student: `<task>_<student>.<ext>`.
#[must_use]
pub fn individual_artifact_name(task: &str, student: &str, extension: &str) -> String {
    format!("{}_{student}.{extension}", display_task_name(task))
}

/// Synced filename for one team: `<task>_Equipo_<id>.<ext>`.
#[must_use]
pub fn team_artifact_name(task: &str, team_id: u32, extension: &str) -> String {
    format!(
        "{}_{TEAM_MARKER}_{team_id}.{extension}",
        display_task_name(task)
    )
}

/// Filename a graded copy of `file_name` is expected to carry.
#[must_use]
pub fn graded_name(file_name: &str) -> String {
    format!("{GRADED_PREFIX}{file_name}")
}

/// Whether a filename carries the graded prefix.
#[must_use]
pub fn is_graded_name(file_name: &str) -> bool {
    file_name.starts_with(GRADED_PREFIX)
}

/// Whether a file stem carries the team marker after its first token.
#[must_use]
pub fn has_team_marker(stem: &str) -> bool {
    team_marker_positions(&stem.split('_').collect::<Vec<_>>())
        .next()
        .is_some()
}

/// Indices of marker tokens; the first token is never a marker.
fn team_marker_positions(parts: &[&str]) -> impl Iterator<Item = usize> {
    parts
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, part)| part.eq_ignore_ascii_case(TEAM_MARKER))
        .map(|(index, _)| index)
}

/// Stem with the graded prefix removed, compared case-insensitively.
#[must_use]
pub fn strip_graded_prefix(stem: &str) -> &str {
    let prefix_len = GRADED_PREFIX.len();
    match stem.get(..prefix_len) {
        Some(head) if head.eq_ignore_ascii_case(GRADED_PREFIX) => &stem[prefix_len..],
        _ => stem,
    }
}

/// Recover `(task_token, student)` from a graded individual artifact stem.
///
/// # Errors
///
/// Returns [`NamingError::MissingSeparator`] when the stem does not split into
/// exactly a task token and a non-empty student name.
pub fn parse_individual_stem(stem: &str) -> Result<(&str, &str), NamingError> {
    let name = strip_graded_prefix(stem);
    match name.split_once('_') {
        Some((task, student)) if !task.is_empty() && !student.is_empty() => Ok((task, student)),
        _ => Err(NamingError::MissingSeparator {
            name: stem.to_string(),
        }),
    }
}

/// Recover the team id from a graded team artifact stem.
///
/// The id is the numeric token after the last marker that has one, so a task
/// name ending in the marker (`Reto_Equipo_Equipo_2`) still parses.
///
/// # Errors
///
/// Returns a [`NamingError`] when no marker follows the first token, when the
/// last marker is the final token, or when no marker is followed by a number.
pub fn parse_team_id(stem: &str) -> Result<u32, NamingError> {
    let parts = stem.split('_').collect::<Vec<_>>();
    let markers = team_marker_positions(&parts).collect::<Vec<_>>();
    let Some(&last) = markers.last() else {
        return Err(NamingError::MissingTeamMarker {
            name: stem.to_string(),
        });
    };
    if let Some(team_id) = markers
        .iter()
        .rev()
        .find_map(|&marker| parts.get(marker + 1)?.parse::<u32>().ok())
    {
        return Ok(team_id);
    }
    match parts.get(last + 1) {
        None => Err(NamingError::MissingTeamId {
            name: stem.to_string(),
        }),
        Some(raw) => Err(NamingError::InvalidTeamId {
            name: stem.to_string(),
            raw: (*raw).to_string(),
        }),
    }
}
