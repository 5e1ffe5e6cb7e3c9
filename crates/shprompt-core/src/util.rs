//! Path helpers shared by the VCS adapters.

use std::path::Path;

/// Makes `path` relative to `prefix`, or returns it unchanged if `prefix`
/// does not lead it.
///
/// The repository root itself is shown as `/`.
pub fn relative_path(path: &str, prefix: &str) -> String {
    let Some(rest) = path.strip_prefix(prefix) else {
        return path.to_string();
    };
    if rest.is_empty() || rest == "/" {
        return "/".to_string();
    }
    rest.strip_prefix('/').unwrap_or(rest).to_string()
}

/// Returns the shortest ancestor of `path` (including `path` itself) that
/// satisfies `test`.
pub fn search_parents<F>(path: &Path, mut test: F) -> Option<&Path>
where
    F: FnMut(&Path) -> bool,
{
    let ancestors: Vec<&Path> = path.ancestors().collect();
    ancestors.into_iter().rev().find(|candidate| test(candidate))
}
