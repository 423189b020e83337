//! Browser viewport measurement.

/// Viewport used when no browser window is available.
pub const DEFAULT_VIEWPORT: (i32, i32) = (1024, 768);

/// Returns the inner `(width, height)` of the browser window in CSS pixels.
pub fn viewport_size() -> (i32, i32) {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(window) = web_sys::window() else {
            return DEFAULT_VIEWPORT;
        };
        let width = window.inner_width().ok().and_then(|v| v.as_f64());
        let height = window.inner_height().ok().and_then(|v| v.as_f64());
        match (width, height) {
            (Some(w), Some(h)) => (w as i32, h as i32),
            _ => DEFAULT_VIEWPORT,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        DEFAULT_VIEWPORT
    }
}
