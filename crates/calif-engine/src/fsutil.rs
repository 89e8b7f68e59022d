//! Filesystem helpers shared by the engine.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::EngineError;

/// Serialize `value` as pretty JSON and replace `path` atomically.
///
/// The bytes go to a temp file in the destination directory, which is then
/// renamed over `path`. Readers see either the old file or the new one.
pub fn atomic_write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), EngineError> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|e| EngineError::io(parent, e))?;

    let bytes = serde_json::to_vec_pretty(value).map_err(|source| EngineError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| EngineError::io(parent, e))?;
    tmp.write_all(&bytes)
        .map_err(|e| EngineError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| EngineError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| EngineError::io(path, e.error))?;
    Ok(())
}

/// Copy `source` to `dest`, carrying over the modification time.
pub fn copy_preserving_mtime(source: &Path, dest: &Path) -> io::Result<()> {
    fs::copy(source, dest)?;
    let modified = fs::metadata(source)?.modified()?;
    let file = fs::OpenOptions::new().write(true).open(dest)?;
    file.set_modified(modified)
}

/// Direct child directories of `dir`, sorted by name.
pub fn child_dirs(dir: &Path) -> io::Result<Vec<PathBuf>> {
    children(dir, |path| path.is_dir())
}

/// Direct child files of `dir`, sorted by name.
pub fn child_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    children(dir, |path| path.is_file())
}

fn children(dir: &Path, keep: impl Fn(&Path) -> bool) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if keep(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Modification time, or `None` when the file vanished or is unreadable.
pub fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

/// Final path component as UTF-8 (lossy).
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// File stem as UTF-8 (lossy).
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn atomic_write_replaces_existing_file() {
        let tmp = tempfile::TempDir::new().expect("tempdir should create");
        let path = tmp.path().join("nested").join("state.json");

        atomic_write_json(&path, &serde_json::json!({"n": 1})).expect("first write");
        atomic_write_json(&path, &serde_json::json!({"n": 2})).expect("second write");

        let raw = fs::read_to_string(&path).expect("read back");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
        assert_eq!(value["n"], 2);

        let leftovers = child_files(path.parent().expect("parent")).expect("list");
        assert_eq!(leftovers, vec![path]);
    }

    #[test]
    fn copy_keeps_modification_time() {
        let tmp = tempfile::TempDir::new().expect("tempdir should create");
        let source = tmp.path().join("a.pdf");
        let dest = tmp.path().join("b.pdf");
        fs::write(&source, b"%PDF").expect("write source");

        let old = SystemTime::now() - Duration::from_secs(3600);
        fs::File::options()
            .write(true)
            .open(&source)
            .and_then(|file| file.set_modified(old))
            .expect("set mtime");

        copy_preserving_mtime(&source, &dest).expect("copy");
        assert_eq!(modified(&dest), modified(&source));
        assert_eq!(fs::read(&dest).expect("read dest"), b"%PDF");
    }

    #[test]
    fn children_are_split_and_sorted() {
        let tmp = tempfile::TempDir::new().expect("tempdir should create");
        fs::create_dir(tmp.path().join("b")).expect("mkdir");
        fs::create_dir(tmp.path().join("a")).expect("mkdir");
        fs::write(tmp.path().join("z.txt"), "").expect("write");

        let dirs = child_dirs(tmp.path()).expect("dirs");
        assert_eq!(
            dirs.iter().map(|path| file_name(path)).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
        assert_eq!(child_files(tmp.path()).expect("files").len(), 1);
    }
}
