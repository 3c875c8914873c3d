// src/watch/path_utils.rs

use std::path::{Component, Path};

/// `path` relative to `root` as a `/`-separated string; `root` itself is "".
///
/// Event paths normally share the root's prefix verbatim. When they don't
/// (macOS reports `/private/var/...` for a `/var/...` root) both sides are
/// canonicalized and compared again, which only works while the path still
/// exists. Returns `None` for paths outside `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(join_components(rel));
    }

    let root = root.canonicalize().ok()?;
    let path = path.canonicalize().ok()?;
    path.strip_prefix(&root).ok().map(join_components)
}

fn join_components(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
