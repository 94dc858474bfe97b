//! Class-path entry identity.

use serde::Serialize;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use url::Url;

/// One physical location on the class path: a directory or an archive file.
///
/// The stored path is textually normalized (no `.` or `..` segments) so that two
/// references to the same location compare equal without touching the
/// filesystem. Existence and kind (directory vs. archive) are only decided by
/// the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PathEntry(PathBuf);

impl PathEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(normalize(&path.into()))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Directory containing this entry. Empty for a bare file name, which joins
    /// as the current directory.
    pub fn parent_dir(&self) -> PathBuf {
        self.0.parent().map(Path::to_path_buf).unwrap_or_default()
    }

    /// Convert a `file:` URL into an entry. Returns `None` for other schemes or
    /// URLs that do not map onto a local path.
    pub fn from_url(url: &Url) -> Option<Self> {
        if url.scheme() != "file" {
            return None;
        }
        url.to_file_path().ok().map(Self::new)
    }

    /// Render this entry as a `file:` URL, absolutizing relative entries
    /// against the current directory.
    pub fn to_url(&self) -> Option<Url> {
        let absolute = if self.0.is_absolute() {
            self.0.clone()
        } else {
            std::env::current_dir().ok()?.join(&self.0)
        };
        Url::from_file_path(absolute).ok()
    }
}

impl fmt::Display for PathEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.display().fmt(f)
    }
}

impl From<&Path> for PathEntry {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<PathBuf> for PathEntry {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

/// Collapse `.` and `..` segments without consulting the filesystem.
/// A `..` that cannot be collapsed (at the start of a relative path) is kept.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // "/.." stays at the root
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(Component::ParentDir),
            },
            other => out.push(other),
        }
    }
    out
}
