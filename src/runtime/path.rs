//! Path helpers for target resolution and tool discovery.

use std::path::{Component, Path, PathBuf};

use super::Runtime;

/// Normalize a path by processing `.` and `..` components lexically.
/// This does not access the filesystem and does not follow symlinks, which
/// keeps the path in the form the package database recorded it.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match result.components().next_back() {
                Some(Component::Normal(_)) => {
                    result.pop();
                }
                // `..` at the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => result.push(component),
            },
            _ => result.push(component),
        }
    }
    result
}

/// Make `path` absolute against `cwd` and normalize it.
pub fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&cwd.join(path))
    }
}

/// Locate an executable named `name` in the directories listed in `PATH`.
pub fn find_program<R: Runtime + ?Sized>(runtime: &R, name: &str) -> Option<PathBuf> {
    let paths = runtime.env_var("PATH").ok()?;
    std::env::split_paths(&paths)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(name))
        .find(|candidate| runtime.is_executable(candidate))
}
