//! Node model for the in-memory virtual file system.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// File leaf with inline text content.
pub struct FsFile {
    /// File name within its parent directory.
    pub name: String,
    /// Content length in bytes.
    pub size: u64,
    /// Text content.
    pub content: String,
}

impl FsFile {
    /// Creates a file whose size is derived from its content.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            name: name.into(),
            size: content.len() as u64,
            content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Directory with children kept in authored order.
pub struct FsDirectory {
    /// Directory name within its parent directory.
    pub name: String,
    /// Child nodes, files and directories interleaved.
    pub children: Vec<FsNode>,
}

impl FsDirectory {
    /// Creates a directory node.
    pub fn new(name: impl Into<String>, children: Vec<FsNode>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    /// Returns the child directory named `name`.
    pub fn directory(&self, name: &str) -> Option<&FsDirectory> {
        self.children.iter().find_map(|child| match child {
            FsNode::Directory(dir) if dir.name == name => Some(dir),
            _ => None,
        })
    }

    /// Returns the child file named `name`.
    pub fn file(&self, name: &str) -> Option<&FsFile> {
        self.children.iter().find_map(|child| match child {
            FsNode::File(file) if file.name == name => Some(file),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Discriminant of an [`FsNode`].
pub enum FsNodeKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
/// A node in the virtual file system tree.
pub enum FsNode {
    /// File leaf.
    File(FsFile),
    /// Directory branch.
    Directory(FsDirectory),
}

impl FsNode {
    /// Shorthand for a file node.
    pub fn file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::File(FsFile::new(name, content))
    }

    /// Shorthand for a directory node.
    pub fn directory(name: impl Into<String>, children: Vec<FsNode>) -> Self {
        Self::Directory(FsDirectory::new(name, children))
    }

    /// Returns the node name.
    pub fn name(&self) -> &str {
        match self {
            Self::File(file) => &file.name,
            Self::Directory(dir) => &dir.name,
        }
    }

    /// Returns the node kind.
    pub fn kind(&self) -> FsNodeKind {
        match self {
            Self::File(_) => FsNodeKind::File,
            Self::Directory(_) => FsNodeKind::Directory,
        }
    }

    /// Returns the file size, or `None` for directories.
    pub fn size(&self) -> Option<u64> {
        match self {
            Self::File(file) => Some(file.size),
            Self::Directory(_) => None,
        }
    }
}

/// Formats a byte count the way directory listings show it (`B`, `KB`, `MB`).
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{} KB", (bytes + KB / 2) / KB)
    } else {
        format!("{} MB", (bytes + MB / 2) / MB)
    }
}
