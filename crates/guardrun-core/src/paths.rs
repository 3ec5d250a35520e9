//! Workspace-relative path rendering.
//!
//! The analysis tool reports absolute paths from the runner's filesystem.
//! Check-run annotations and comment rows need repository-relative paths with
//! forward slashes, whatever OS produced them.

use std::path::Path;

/// Rewrites `path` relative to `root`, using `/` as the only separator.
///
/// Best effort, never fails:
/// - a relative `path` is returned slash-normalized as-is
/// - a `path` outside `root` yields a `..`-prefixed result
/// - a `path` equal to `root` yields its final component
pub fn normalize_path(path: &str, root: &Path) -> String {
    let path = to_slashes(path);
    let root = to_slashes(&root.to_string_lossy());
    let root = root.trim_end_matches('/');

    if !looks_absolute(&path) {
        return path;
    }

    if path.trim_end_matches('/') == root {
        return path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
    }

    match pathdiff::diff_paths(Path::new(&path), Path::new(root)) {
        Some(rel) if !rel.as_os_str().is_empty() => to_slashes(&rel.to_string_lossy()),
        _ => path,
    }
}

fn to_slashes(s: &str) -> String {
    s.replace('\\', "/")
}

/// Unix-rooted or drive-letter paths, independent of the host OS.
fn looks_absolute(path: &str) -> bool {
    let bytes = path.as_bytes();
    path.starts_with('/')
        || (bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/')
}
