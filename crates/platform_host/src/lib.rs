//! Host-side services shared by the desktop runtime and its apps.
//!
//! This crate owns the read-only virtual file system, the document storage contract used by
//! the text editor, and clock helpers. Browser-backed adapters live in `platform_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod fs;
pub mod storage;
pub mod time;

pub use fs::path::{join_segments, resolve_segments};
pub use fs::types::{format_file_size, FsDirectory, FsFile, FsNode, FsNodeKind};
pub use fs::vfs::{default_tree, FsError, SharedFileSystem, VirtualFileSystem, HOME_PATH};
pub use storage::documents::{
    document_key, DocumentStore, DocumentStoreFuture, MemoryDocumentStore, NoopDocumentStore,
    StorageError,
};
pub use time::{next_monotonic_timestamp_ms, session_started_ms, unix_time_ms_now};
