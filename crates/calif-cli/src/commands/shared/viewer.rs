use std::path::Path;

use crate::ui;

/// Open a file or folder with the system viewer when someone is there to
/// see it. Failures are logged, never fatal.
pub fn open_path(path: &Path) {
    if !ui::prefs().interactive {
        tracing::debug!(path = %path.display(), "viewer: not interactive, not opening");
        return;
    }
    if let Err(error) = open::that(path) {
        tracing::warn!(path = %path.display(), %error, "viewer: could not open");
    }
}
