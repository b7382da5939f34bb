//! Flat, sorted directory listing shared by the image and XML pipelines.

use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::error::Voc2CocoError;

/// List the regular files directly inside `dir` that satisfy `keep`.
///
/// Hidden files (leading `.`) are ignored. The result is sorted by file name
/// so that ids assigned downstream do not depend on file system order.
/// Sub-directories are never entered; their presence is logged once.
/// Entries that cannot be read (dangling or looping links, permission
/// errors) are logged and skipped. Only a failure on `dir` itself is an error.
pub fn list_files<F>(dir: &Path, keep: F) -> Result<Vec<PathBuf>, Voc2CocoError>
where
    F: Fn(&Path) -> bool,
{
    if !dir.is_dir() {
        return Err(Voc2CocoError::DirectoryWalk {
            path: dir.to_path_buf(),
            message: "not a directory".to_string(),
        });
    }

    let mut files = Vec::new();
    let mut subdirs = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() > 0 => {
                let path = err.path().unwrap_or(dir);
                warn!(
                    dir = %dir.display(),
                    entry = %rel_string(dir, path),
                    error = %err,
                    "skipping unreadable entry"
                );
                continue;
            }
            Err(err) => {
                return Err(Voc2CocoError::DirectoryWalk {
                    path: dir.to_path_buf(),
                    message: err.to_string(),
                })
            }
        };

        if is_hidden(entry.path()) {
            continue;
        }
        if entry.file_type().is_dir() {
            subdirs.push(entry.into_path());
        } else if entry.file_type().is_file() && keep(entry.path()) {
            files.push(entry.into_path());
        }
    }

    if let Some(sample) = subdirs.first() {
        warn!(
            dir = %dir.display(),
            count = subdirs.len(),
            sample = %rel_string(dir, sample),
            "not descending into sub-directories; only the top level is read"
        );
    }

    Ok(files)
}

/// The final path component as a `String`, or an empty string.
pub fn file_name_string(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Returns true if `path` has extension `ext`, compared case-insensitively.
pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|found| found.to_str())
        .map(|found| found.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn rel_string(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}
