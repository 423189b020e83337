//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! Native builds compile the same types with inert fallbacks so headless tests can link them.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod storage;
pub mod viewport;

pub use storage::local_documents::WebDocumentStore;
pub use viewport::{viewport_size, DEFAULT_VIEWPORT};
