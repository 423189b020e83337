//! Read-only virtual file system with a current-directory cursor.
//!
//! The tree is built once and never mutated. The cursor is a list of directory names from the
//! root and always names an existing directory; failed navigation leaves it untouched.

use std::{cell::RefCell, rc::Rc};

use thiserror::Error;

use super::path::{join_segments, resolve_segments};
use super::types::{FsDirectory, FsFile, FsNode};

/// Home directory of the single desktop user.
pub const HOME_PATH: &str = "/home/user";

/// Virtual file system shared by every app of one desktop session.
pub type SharedFileSystem = Rc<RefCell<VirtualFileSystem>>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Navigation and lookup failures.
pub enum FsError {
    /// The target does not resolve to an existing directory.
    #[error("{0}: No such file or directory")]
    NoSuchDirectory(String),
    /// The target does not resolve to an existing file.
    #[error("{0}: No such file or directory")]
    NoSuchFile(String),
    /// A file operation targeted a directory.
    #[error("{0}: Is a directory")]
    IsADirectory(String),
}

#[derive(Debug, Clone)]
/// In-memory directory tree plus the navigation cursor.
pub struct VirtualFileSystem {
    root: FsDirectory,
    cursor: Vec<String>,
}

impl Default for VirtualFileSystem {
    fn default() -> Self {
        Self::new(default_tree())
    }
}

impl VirtualFileSystem {
    /// Creates a file system over `root` with the cursor at `/`.
    pub fn new(root: FsDirectory) -> Self {
        Self {
            root,
            cursor: Vec::new(),
        }
    }

    /// Wraps the file system for sharing between apps.
    pub fn shared(self) -> SharedFileSystem {
        Rc::new(RefCell::new(self))
    }

    /// Moves the cursor.
    ///
    /// `..` pops one segment and succeeds even at the root. Absolute paths are validated from
    /// the root, relative paths from the cursor. On failure the cursor does not move.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NoSuchDirectory`] when the target is blank, missing, or a file.
    pub fn change_directory(&mut self, path: &str) -> Result<(), FsError> {
        if path.trim().is_empty() {
            return Err(FsError::NoSuchDirectory(path.to_string()));
        }
        if path == ".." {
            self.cursor.pop();
            return Ok(());
        }

        let target = resolve_segments(&self.cursor, path);
        if self.directory_at(&target).is_none() {
            return Err(FsError::NoSuchDirectory(path.to_string()));
        }
        self.cursor = target;
        Ok(())
    }

    /// Returns the cursor in display form, `/` at the root.
    pub fn current_path(&self) -> String {
        join_segments(&self.cursor)
    }

    /// Returns the directory under the cursor.
    pub fn current_directory(&self) -> &FsDirectory {
        self.directory_at(&self.cursor).unwrap_or(&self.root)
    }

    /// Returns the children of the current directory in authored order.
    pub fn list_directory(&self) -> &[FsNode] {
        &self.current_directory().children
    }

    /// Looks up a file child of the current directory by exact name.
    pub fn get_file(&self, name: &str) -> Option<&FsFile> {
        self.current_directory().file(name)
    }

    /// Lists the directory at `path`, resolved against the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NoSuchDirectory`] when `path` is not a directory.
    pub fn list_path(&self, path: &str) -> Result<&[FsNode], FsError> {
        let target = resolve_segments(&self.cursor, path);
        self.directory_at(&target)
            .map(|dir| dir.children.as_slice())
            .ok_or_else(|| FsError::NoSuchDirectory(path.to_string()))
    }

    /// Reads the file at `path`, resolved against the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::IsADirectory`] for directories and [`FsError::NoSuchFile`] when
    /// nothing exists at `path`.
    pub fn read_file(&self, path: &str) -> Result<&FsFile, FsError> {
        let mut target = resolve_segments(&self.cursor, path);
        let Some(name) = target.pop() else {
            return Err(FsError::IsADirectory(path.to_string()));
        };
        let parent = self
            .directory_at(&target)
            .ok_or_else(|| FsError::NoSuchFile(path.to_string()))?;
        if let Some(file) = parent.file(&name) {
            return Ok(file);
        }
        if parent.directory(&name).is_some() {
            return Err(FsError::IsADirectory(path.to_string()));
        }
        Err(FsError::NoSuchFile(path.to_string()))
    }

    fn directory_at(&self, segments: &[String]) -> Option<&FsDirectory> {
        segments
            .iter()
            .try_fold(&self.root, |dir, segment| dir.directory(segment))
    }
}

/// Builds the stock directory tree of a fresh desktop session.
pub fn default_tree() -> FsDirectory {
    FsDirectory::new(
        "root",
        vec![
            FsNode::directory(
                "home",
                vec![FsNode::directory(
                    "user",
                    vec![
                        FsNode::directory("Documents", Vec::new()),
                        FsNode::directory("Pictures", Vec::new()),
                        FsNode::directory("Downloads", Vec::new()),
                        FsNode::file(
                            "readme.txt",
                            "Welcome to Linux 95!\n\nThis is a retro desktop environment that \
                             brings back the nostalgic computing experience of 1995.",
                        ),
                        FsNode::file(
                            "todo.txt",
                            "- Check out the terminal\n- Play minesweeper\n- Write something in \
                             the text editor",
                        ),
                    ],
                )],
            ),
            FsNode::directory(
                "usr",
                vec![
                    FsNode::directory("bin", Vec::new()),
                    FsNode::directory("lib", Vec::new()),
                ],
            ),
            FsNode::directory(
                "etc",
                vec![FsNode::file("passwd", "root:x:0:0:root:/root:/bin/bash")],
            ),
        ],
    )
}
