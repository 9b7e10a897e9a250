use serde::Serialize;
use std::path::{is_separator, MAIN_SEPARATOR_STR};

/// A source file path split into its source root and its package-relative part.
///
/// `src/main/java/com/example/Foo.java` with package path `com/example` splits into
/// `src/main/java` + `com/example/Foo.java`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SourcePath {
    /// The source root directory (everything before the package path).
    pub directory: String,
    /// The package path followed by the file name.
    pub file: String,
}

impl SourcePath {
    /// The package directories of [`SourcePath::file`], empty for the default package.
    pub fn namespace_path(&self) -> &str {
        match self.file.rfind(is_separator) {
            Some(idx) => &self.file[..idx],
            None => "",
        }
    }

    /// The bare file name.
    pub fn file_name(&self) -> &str {
        match self.file.rfind(is_separator) {
            Some(idx) => &self.file[idx + 1..],
            None => &self.file,
        }
    }
}

/// Split `file_path` into a source root and a package-relative file path, given the package
/// path the file is known to declare (e.g. from its `package` statement).
///
/// Returns `None` when the file does not live where its package says it should: the package
/// path is not immediately followed by the file name, the path has no directory in front of
/// the package, or the path names a directory (trailing separator). An empty `file_path` is
/// treated as absent. An empty `namespace` denotes the default package.
///
/// Both inputs are compared segment by segment using the host's path separators. When the
/// package path occurs more than once, the occurrence closest to the file name wins, so a
/// source root that happens to repeat the package directories is preserved intact.
pub fn split_namespaced_path(file_path: &str, namespace: &str) -> Option<SourcePath> {
    if file_path.is_empty() || file_path.ends_with(is_separator) {
        return None;
    }

    let segments: Vec<&str> = file_path.split(is_separator).collect();
    let namespace: Vec<&str> = path_segments(namespace).collect();

    // At least one directory segment, the package segments, and the file name.
    if segments.len() < namespace.len() + 2 {
        return None;
    }
    let file_idx = segments.len() - 1;

    let start = (0..=file_idx - namespace.len())
        .rev()
        .find(|&idx| segments[idx..idx + namespace.len()] == namespace[..])?;

    // A match further up the tree means the file sits in a sub-package (or elsewhere).
    if start + namespace.len() != file_idx {
        return None;
    }

    let directory = segments[..start].join(MAIN_SEPARATOR_STR);
    if directory.is_empty() {
        return None;
    }

    Some(SourcePath {
        directory,
        file: segments[start..].join(MAIN_SEPARATOR_STR),
    })
}

/// Iterate the non-empty segments of `path`, splitting on the host's path separators.
pub fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(is_separator).filter(|segment| !segment.is_empty())
}

/// Normalize a directory path into the `/`-separated form used for index keys.
///
/// Empty segments (leading, trailing or doubled separators) are dropped, so `a/b/`, `a//b` and
/// `/a/b` all normalize to `a/b`.
pub fn normalize_dir_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for segment in path_segments(path) {
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(segment);
    }
    out
}

/// Whether `ancestor` equals `path` or is one of its parent directories.
///
/// Matching is on whole segments only: `a/b` is an ancestor of `a/b/c` but not of `a/bc`.
pub fn is_ancestor_or_self(ancestor: &str, path: &str) -> bool {
    let mut path = path_segments(path);
    path_segments(ancestor).all(|segment| path.next() == Some(segment))
}
