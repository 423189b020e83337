//! Virtual file system: node model, path resolution, and the navigable tree.

pub mod path;
pub mod types;
pub mod vfs;
