//! Filesystem access used by the wizard steps and background tasks
//!
//! Steps only need two primitives: list a directory and read a file's
//! modification time. Keeping them behind a trait lets the steps run against
//! an in-memory tree in tests.

use std::io;
use std::path::Path;

use chrono::{DateTime, Local};

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub is_dir: bool,
}

pub trait FileSystem: Send + Sync {
    /// List the immediate entries of `dir`
    fn list_entries(&self, dir: &Path) -> io::Result<Vec<DirEntryInfo>>;

    /// Modification time of `path`
    fn stat(&self, path: &Path) -> io::Result<DateTime<Local>>;

    /// Anything other than "not found" counts as existing.
    fn exists(&self, path: &Path) -> bool {
        match self.stat(path) {
            Ok(_) => true,
            Err(e) => e.kind() != io::ErrorKind::NotFound,
        }
    }
}

/// Real filesystem backed by `std::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn list_entries(&self, dir: &Path) -> io::Result<Vec<DirEntryInfo>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            entries.push(DirEntryInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: entry.file_type()?.is_dir(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn stat(&self, path: &Path) -> io::Result<DateTime<Local>> {
        let modified = std::fs::metadata(path)?.modified()?;
        Ok(DateTime::<Local>::from(modified))
    }
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory tree for step and task tests

    use super::*;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    #[derive(Debug, Clone)]
    enum Node {
        Dir,
        File(DateTime<Local>),
        Unreadable,
    }

    #[derive(Debug, Default, Clone)]
    pub struct MemoryFs {
        nodes: BTreeMap<PathBuf, Node>,
    }

    impl MemoryFs {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn dir(mut self, path: impl Into<PathBuf>) -> Self {
            self.nodes.insert(path.into(), Node::Dir);
            self
        }

        pub fn file(mut self, path: impl Into<PathBuf>, modified: DateTime<Local>) -> Self {
            self.nodes.insert(path.into(), Node::File(modified));
            self
        }

        /// A directory whose listing and stat both fail with PermissionDenied
        pub fn unreadable(mut self, path: impl Into<PathBuf>) -> Self {
            self.nodes.insert(path.into(), Node::Unreadable);
            self
        }

        fn denied() -> io::Error {
            io::Error::new(io::ErrorKind::PermissionDenied, "permission denied")
        }
    }

    impl FileSystem for MemoryFs {
        fn list_entries(&self, dir: &Path) -> io::Result<Vec<DirEntryInfo>> {
            match self.nodes.get(dir) {
                Some(Node::Dir) => {}
                Some(Node::Unreadable) => return Err(Self::denied()),
                _ => return Err(io::Error::new(io::ErrorKind::NotFound, "no such directory")),
            }
            Ok(self
                .nodes
                .iter()
                .filter(|(path, _)| path.parent() == Some(dir))
                .filter_map(|(path, node)| {
                    let name = path.file_name()?.to_string_lossy().into_owned();
                    Some(DirEntryInfo {
                        name,
                        is_dir: !matches!(node, Node::File(_)),
                    })
                })
                .collect())
        }

        fn stat(&self, path: &Path) -> io::Result<DateTime<Local>> {
            match self.nodes.get(path) {
                Some(Node::File(t)) => Ok(*t),
                Some(Node::Dir) => Ok(DateTime::<Local>::from(std::time::UNIX_EPOCH)),
                Some(Node::Unreadable) => Err(Self::denied()),
                None => Err(io::Error::new(io::ErrorKind::NotFound, "no such file")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_os_list_entries_sorted_with_kinds() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("b_dir")).unwrap();
        fs::write(tmp.path().join("c.jpg"), b"x").unwrap();
        fs::write(tmp.path().join("a.jpg"), b"x").unwrap();

        let entries = OsFileSystem.list_entries(tmp.path()).unwrap();
        let names: Vec<_> = entries.iter().map(|e| (e.name.as_str(), e.is_dir)).collect();
        assert_eq!(names, vec![("a.jpg", false), ("b_dir", true), ("c.jpg", false)]);
    }

    #[test]
    fn test_os_stat_and_exists() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("frame.jpg");
        fs::write(&file, b"x").unwrap();

        assert!(OsFileSystem.stat(&file).is_ok());
        assert!(OsFileSystem.exists(&file));
        assert!(!OsFileSystem.exists(&tmp.path().join("missing.jpg")));
    }

    #[test]
    fn test_os_list_missing_dir_fails() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(OsFileSystem.list_entries(&tmp.path().join("nope")).is_err());
    }
}
