//! Path utility functions for normalization and containment checks.

use std::path::{Component, Path, PathBuf};

/// Normalize a path by processing `.` and `..` components lexically.
/// This does not access the filesystem and does not follow symlinks.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !result.pop() {
                    result.push(component);
                }
            }
            _ => result.push(component),
        }
    }
    result
}

/// Check if `path` is under `dir` by comparing normalized path components.
///
/// `packages/foo/1.0.0/../../../etc` is NOT under `packages/foo/1.0.0`.
pub fn is_path_under(path: &Path, dir: &Path) -> bool {
    let normalized_path = normalize_path(path);
    let normalized_dir = normalize_path(dir);

    let path_components: Vec<_> = normalized_path.components().collect();
    let dir_components: Vec<_> = normalized_dir.components().collect();

    if path_components.len() < dir_components.len() {
        return false;
    }

    dir_components
        .iter()
        .zip(path_components.iter())
        .all(|(d, p)| d == p)
}

/// Calculate the relative path from a symlink location to a target.
///
/// A link at `<root>/foo/1.0.0/lib/foo` pointing at `<root>/foo/1.0.0/src/foo`
/// gets the target `../src/foo`.
///
/// Returns `None` if a relative path cannot be computed (e.g., different drive letters on Windows).
pub fn relative_symlink_path(from_link: &Path, to_target: &Path) -> Option<PathBuf> {
    let from_dir = from_link.parent()?;
    let result = pathdiff::diff_paths(to_target, from_dir)?;

    if result.is_absolute() {
        return None;
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_with_dot_and_parent() {
        assert_eq!(
            normalize_path(Path::new("/pkgs/./foo/../bar/./1.0.0")),
            PathBuf::from("/pkgs/bar/1.0.0")
        );
    }

    #[test]
    fn test_normalize_path_relative_keeps_leading_parent() {
        assert_eq!(normalize_path(Path::new("../src")), PathBuf::from("../src"));
        assert_eq!(normalize_path(Path::new("a/b/../../c")), PathBuf::from("c"));
    }

    #[test]
    fn test_normalize_path_only_dots() {
        assert_eq!(normalize_path(Path::new("./././.")), PathBuf::from(""));
    }

    #[test]
    fn test_is_path_under_simple() {
        assert!(is_path_under(
            Path::new("/pkgs/foo/1.0.0/src"),
            Path::new("/pkgs/foo/1.0.0")
        ));
        assert!(is_path_under(
            Path::new("/pkgs/foo/1.0.0"),
            Path::new("/pkgs/foo/1.0.0")
        ));
    }

    #[test]
    fn test_is_path_under_partial_component_match() {
        // "1.0.0-beta" starts with "1.0.0" as a string but is a different component
        assert!(!is_path_under(
            Path::new("/pkgs/foo/1.0.0-beta/src"),
            Path::new("/pkgs/foo/1.0.0")
        ));
    }

    #[test]
    fn test_is_path_under_directory_traversal() {
        assert!(!is_path_under(
            Path::new("/pkgs/foo/1.0.0/../../../etc/passwd"),
            Path::new("/pkgs/foo/1.0.0")
        ));
        assert!(!is_path_under(
            Path::new("/pkgs/foo/1.0.0/../2.0.0"),
            Path::new("/pkgs/foo/1.0.0")
        ));
    }

    #[test]
    fn test_is_path_under_path_shorter_than_dir() {
        assert!(!is_path_under(Path::new("/pkgs"), Path::new("/pkgs/foo")));
    }

    #[test]
    fn test_relative_symlink_path_same_parent() {
        let result = relative_symlink_path(
            Path::new("/pkgs/foo/1.0.0/lib"),
            Path::new("/pkgs/foo/1.0.0/src/lib"),
        );
        assert_eq!(result, Some(PathBuf::from("src/lib")));
    }

    #[test]
    fn test_relative_symlink_path_nested_link() {
        let result = relative_symlink_path(
            Path::new("/pkgs/foo/1.0.0/out/foo"),
            Path::new("/pkgs/foo/1.0.0/src/foo"),
        );
        assert_eq!(result, Some(PathBuf::from("../src/foo")));
    }
}
