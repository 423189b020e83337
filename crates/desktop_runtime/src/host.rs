//! Browser-facing services the desktop needs from its host page.
//!
//! The default context uses `localStorage` for editor documents and measures the browser
//! window. Tests and native builds inject in-memory services instead.

use std::rc::Rc;

use platform_host::DocumentStore;
use platform_host_web::{viewport_size, WebDocumentStore};

use crate::model::Size;

#[derive(Clone)]
/// Host service bundle for the desktop runtime.
pub struct DesktopHostContext {
    documents: Rc<dyn DocumentStore>,
    measure_viewport: fn() -> (i32, i32),
}

impl Default for DesktopHostContext {
    fn default() -> Self {
        Self {
            documents: Rc::new(WebDocumentStore),
            measure_viewport: viewport_size,
        }
    }
}

impl DesktopHostContext {
    /// Builds a context from explicit services.
    pub fn new(documents: Rc<dyn DocumentStore>, measure_viewport: fn() -> (i32, i32)) -> Self {
        Self {
            documents,
            measure_viewport,
        }
    }

    /// Returns the document store handed to the text editor.
    pub fn documents(&self) -> Rc<dyn DocumentStore> {
        Rc::clone(&self.documents)
    }

    /// Current viewport in CSS pixels; negative measurements read as zero.
    pub fn viewport(&self) -> Size {
        let (width, height) = (self.measure_viewport)();
        Size::new(width.max(0) as u32, height.max(0) as u32)
    }
}

#[cfg(test)]
mod tests {
    use platform_host::MemoryDocumentStore;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_context_reports_fallback_viewport_off_wasm() {
        assert_eq!(DesktopHostContext::default().viewport(), Size::new(1024, 768));
    }

    #[test]
    fn injected_measurement_is_clamped() {
        let host = DesktopHostContext::new(Rc::new(MemoryDocumentStore::default()), || (-5, 600));
        assert_eq!(host.viewport(), Size::new(0, 600));
    }
}
