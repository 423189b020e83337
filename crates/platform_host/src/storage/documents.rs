//! Document storage contracts used by the text editor's Save action.

use std::{cell::RefCell, collections::BTreeMap, future::Future, pin::Pin, rc::Rc};

use thiserror::Error;

/// Object-safe boxed future used by [`DocumentStore`] async methods.
pub type DocumentStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Key prefix shared by every saved document.
const DOCUMENT_KEY_PREFIX: &str = "linux95_document_";

/// Returns the storage key for a document saved at `timestamp_ms`.
pub fn document_key(timestamp_ms: u64) -> String {
    format!("{DOCUMENT_KEY_PREFIX}{timestamp_ms}.txt")
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Document storage failures.
pub enum StorageError {
    /// The backing store is not reachable on this host.
    #[error("document storage unavailable")]
    Unavailable,
    /// The backing store rejected the write.
    #[error("document write failed: {0}")]
    WriteFailed(String),
}

/// Host service for named text documents.
pub trait DocumentStore {
    /// Stores `content` under `key`, replacing any previous value.
    fn save_document<'a>(
        &'a self,
        key: &'a str,
        content: &'a str,
    ) -> DocumentStoreFuture<'a, Result<(), StorageError>>;

    /// Loads the document stored under `key`.
    fn load_document<'a>(
        &'a self,
        key: &'a str,
    ) -> DocumentStoreFuture<'a, Result<Option<String>, StorageError>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Document store that accepts writes and remembers nothing.
pub struct NoopDocumentStore;

impl DocumentStore for NoopDocumentStore {
    fn save_document<'a>(
        &'a self,
        _key: &'a str,
        _content: &'a str,
    ) -> DocumentStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(async { Ok(()) })
    }

    fn load_document<'a>(
        &'a self,
        _key: &'a str,
    ) -> DocumentStoreFuture<'a, Result<Option<String>, StorageError>> {
        Box::pin(async { Ok(None) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory document store; clones share the same map.
pub struct MemoryDocumentStore {
    inner: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryDocumentStore {
    /// Returns every stored key in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().keys().cloned().collect()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn save_document<'a>(
        &'a self,
        key: &'a str,
        content: &'a str,
    ) -> DocumentStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            self.inner
                .borrow_mut()
                .insert(key.to_string(), content.to_string());
            Ok(())
        })
    }

    fn load_document<'a>(
        &'a self,
        key: &'a str,
    ) -> DocumentStoreFuture<'a, Result<Option<String>, StorageError>> {
        Box::pin(async move { Ok(self.inner.borrow().get(key).cloned()) })
    }
}
