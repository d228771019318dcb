//! path utils

use std::path::{Component, Path, PathBuf};

/// Maps a requested filename to a file directly inside `root`.
///
/// Returns `None` for names that are empty or would leave `root`.
pub fn resolve_request(root: &Path, name: &str) -> Option<PathBuf> {
    let mut components = Path::new(name).components();

    match (components.next()?, components.next()) {
        (Component::Normal(file), None) if !name.contains(['/', '\\']) => Some(root.join(file)),
        _ => None,
    }
}
