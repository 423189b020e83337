//! Headless text buffer and save workflow for the text editor.

use platform_host::{document_key, DocumentStore};

/// Text shown in a freshly opened editor.
pub const WELCOME_TEXT: &str =
    "Welcome to the Linux 95 Text Editor!\n\nStart typing, then press Save to keep a copy.";

/// Status message shown when Save is pressed on a blank buffer.
pub const NOTHING_TO_SAVE: &str = "Nothing to save!";

#[derive(Debug, Clone, PartialEq, Eq)]
/// An editable text buffer.
pub struct EditorBuffer {
    text: String,
}

impl Default for EditorBuffer {
    fn default() -> Self {
        Self::new(WELCOME_TEXT)
    }
}

impl EditorBuffer {
    /// Creates a buffer holding `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Returns the current contents.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the contents with edited text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Empties the buffer.
    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Number of lines, counting an empty buffer as one line.
    pub fn line_count(&self) -> usize {
        self.text.lines().count().max(1)
    }

    /// Number of characters.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the buffer has nothing worth saving.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Writes the buffer to `store` under a key derived from `timestamp_ms`.
    ///
    /// Returns the status message to show: the saved file name, the blank-buffer notice, or
    /// the storage failure.
    pub async fn save(&self, store: &dyn DocumentStore, timestamp_ms: u64) -> String {
        if self.is_blank() {
            return NOTHING_TO_SAVE.to_string();
        }
        let key = document_key(timestamp_ms);
        match store.save_document(&key, &self.text).await {
            Ok(()) => format!("Saved as {}", display_name(&key)),
            Err(err) => format!("Save failed: {err}"),
        }
    }
}

/// Strips the storage namespace from a document key.
pub fn display_name(key: &str) -> &str {
    key.strip_prefix("linux95_").unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::{MemoryDocumentStore, NoopDocumentStore, StorageError};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn save_writes_timestamped_document() {
        let store = MemoryDocumentStore::default();
        let buffer = EditorBuffer::new("draft");

        let message = block_on(buffer.save(&store, 1_000));

        assert_eq!(message, "Saved as document_1000.txt");
        assert_eq!(store.keys(), vec!["linux95_document_1000.txt".to_string()]);
        let saved = block_on(store.load_document("linux95_document_1000.txt"));
        assert_eq!(saved, Ok(Some("draft".to_string())));
    }

    #[test]
    fn blank_buffer_is_not_saved() {
        let store = MemoryDocumentStore::default();
        let mut buffer = EditorBuffer::default();
        buffer.set_text("   \n\t");
        assert_eq!(block_on(buffer.save(&store, 1)), NOTHING_TO_SAVE);

        buffer.clear();
        assert_eq!(block_on(buffer.save(&store, 2)), NOTHING_TO_SAVE);
        assert!(store.keys().is_empty());
    }

    #[test]
    fn storage_failures_surface_in_the_message() {
        struct Rejecting;
        impl DocumentStore for Rejecting {
            fn save_document<'a>(
                &'a self,
                _key: &'a str,
                _content: &'a str,
            ) -> platform_host::DocumentStoreFuture<'a, Result<(), StorageError>> {
                Box::pin(async { Err(StorageError::WriteFailed("quota".to_string())) })
            }

            fn load_document<'a>(
                &'a self,
                _key: &'a str,
            ) -> platform_host::DocumentStoreFuture<'a, Result<Option<String>, StorageError>>
            {
                Box::pin(async { Ok(None) })
            }
        }

        let buffer = EditorBuffer::new("x");
        assert_eq!(
            block_on(buffer.save(&Rejecting, 5)),
            "Save failed: document write failed: quota"
        );
        assert_eq!(
            block_on(buffer.save(&NoopDocumentStore, 5)),
            "Saved as document_5.txt"
        );
    }

    #[test]
    fn counts_lines_and_chars() {
        let mut buffer = EditorBuffer::new("a\nbé");
        assert_eq!((buffer.line_count(), buffer.char_count()), (2, 4));
        buffer.clear();
        assert_eq!((buffer.line_count(), buffer.char_count()), (1, 0));
    }
}
