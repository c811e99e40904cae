//! Request path to filesystem path resolution.

use std::path::{Path, PathBuf};

/// Join `request_path` onto `root` after lexical normalization.
///
/// `.` and empty segments are dropped and `..` pops the previous segment.
/// Returns `None` when `..` would climb above `root`, or when a segment
/// contains a backslash or NUL.
pub fn resolve(root: &Path, request_path: &str) -> Option<PathBuf> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in request_path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            s if s.contains(['\\', '\0']) => return None,
            s => segments.push(s),
        }
    }

    let mut resolved = root.to_path_buf();
    resolved.extend(segments);
    Some(resolved)
}
