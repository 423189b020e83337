//! `localStorage`-backed document store used by the text editor.
//!
//! Writes are synchronous at the browser API boundary; the async [`DocumentStore`] surface
//! simply wraps them. Off-wasm every call reports [`StorageError::Unavailable`].

use platform_host::{DocumentStore, DocumentStoreFuture, StorageError};

#[derive(Debug, Clone, Copy, Default)]
/// Browser document store backed by `window.localStorage`.
pub struct WebDocumentStore;

impl WebDocumentStore {
    /// Reads a raw document string.
    ///
    /// # Errors
    ///
    /// Returns an error when localStorage is unavailable.
    pub fn load_text(self, key: &str) -> Result<Option<String>, StorageError> {
        #[cfg(target_arch = "wasm32")]
        {
            Ok(local_storage()?.get_item(key).ok().flatten())
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Err(StorageError::Unavailable)
        }
    }

    /// Writes a raw document string.
    ///
    /// # Errors
    ///
    /// Returns an error when localStorage is unavailable or the write fails (for example when
    /// the quota is exhausted).
    pub fn save_text(self, key: &str, content: &str) -> Result<(), StorageError> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .set_item(key, content)
                .map_err(|e| StorageError::WriteFailed(format!("{e:?}")))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (key, content);
            Err(StorageError::Unavailable)
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, StorageError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or(StorageError::Unavailable)
}

impl DocumentStore for WebDocumentStore {
    fn save_document<'a>(
        &'a self,
        key: &'a str,
        content: &'a str,
    ) -> DocumentStoreFuture<'a, Result<(), StorageError>> {
        let store = *self;
        Box::pin(async move { store.save_text(key, content) })
    }

    fn load_document<'a>(
        &'a self,
        key: &'a str,
    ) -> DocumentStoreFuture<'a, Result<Option<String>, StorageError>> {
        let store = *self;
        Box::pin(async move { store.load_text(key) })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn native_builds_report_storage_unavailable() {
        let store = WebDocumentStore;
        assert_eq!(
            block_on(store.save_document("k", "v")),
            Err(StorageError::Unavailable)
        );
        assert_eq!(block_on(store.load_document("k")), Err(StorageError::Unavailable));
    }
}
