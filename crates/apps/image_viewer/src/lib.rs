//! XV image viewer desktop app: a carousel over the bundled sample images.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod gallery;

use desktop_app_contract::{AppConfig, AppView, DesktopApp};
use gallery::{Gallery, Zoom};
use leptos::*;

const OPEN_NOTICE: [&str; 2] = [
    "In a real implementation, this would open a file dialog.",
    "For now, use the navigation buttons to view sample images.",
];

/// Image viewer app. The gallery position lives in the window's reactive scope.
pub struct ImageViewerApp {
    config: AppConfig,
}

impl ImageViewerApp {
    /// Creates the viewer.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

impl DesktopApp for ImageViewerApp {
    fn config(&self) -> &AppConfig {
        &self.config
    }

    fn init(&mut self) {}

    fn render(&mut self) -> AppView {
        AppView::new(|| view! { <ImageViewerWindow /> }.into_view())
    }

    fn cleanup(&mut self) {}
}

#[component]
fn ImageViewerWindow() -> impl IntoView {
    let gallery = create_rw_signal(Gallery::default());
    let open_notice = create_rw_signal(false);

    let image_style = move || {
        gallery.with(|g| match g.image_width() {
            Some(width) => format!("width:{width}px;height:auto;"),
            None => "max-width:100%;max-height:100%;width:auto;height:auto;".to_string(),
        })
    };

    view! {
        <div class="image-viewer-app">
            <div class="image-toolbar" role="toolbar" aria-label="Image tools">
                <button
                    type="button"
                    class="image-btn"
                    on:click=move |_| open_notice.set(true)
                >
                    "📁 Open"
                </button>
                <button
                    type="button"
                    class="image-btn"
                    on:click=move |_| gallery.update(Gallery::zoom_in)
                >
                    "🔍+"
                </button>
                <button
                    type="button"
                    class="image-btn"
                    on:click=move |_| gallery.update(Gallery::zoom_out)
                >
                    "🔍-"
                </button>
                <button
                    type="button"
                    class="image-btn"
                    class:active=move || gallery.with(|g| g.zoom() == Zoom::Fit)
                    on:click=move |_| gallery.update(Gallery::fit)
                >
                    "📐 Fit"
                </button>
            </div>
            <div class="image-container">
                <img
                    class="viewed-image"
                    src=move || gallery.with(|g| g.current().data_url())
                    alt=move || gallery.with(|g| g.current().name)
                    style=image_style
                />
            </div>
            <div class="image-navigation">
                <button
                    type="button"
                    class="nav-btn"
                    on:click=move |_| gallery.update(Gallery::previous)
                >
                    "◀ Previous"
                </button>
                <span class="image-info">{move || gallery.with(Gallery::info_text)}</span>
                <button
                    type="button"
                    class="nav-btn"
                    on:click=move |_| gallery.update(Gallery::next)
                >
                    "Next ▶"
                </button>
            </div>
            <Show when=move || open_notice.get() fallback=|| ()>
                <div class="open-image-modal" role="dialog" aria-label="Open Image">
                    <div class="modal-header">
                        <span>"Open Image"</span>
                        <button
                            type="button"
                            class="modal-close"
                            on:click=move |_| open_notice.set(false)
                        >
                            "×"
                        </button>
                    </div>
                    <div class="modal-body">
                        {OPEN_NOTICE.iter().map(|line| view! { <p>{*line}</p> }).collect_view()}
                        <button
                            type="button"
                            class="ok-btn"
                            on:click=move |_| open_notice.set(false)
                        >
                            "OK"
                        </button>
                    </div>
                </div>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::AppId;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn viewer_starts_on_the_first_sample_fitted() {
        let app = ImageViewerApp::new(AppConfig::fallback(AppId::ImageViewer));
        assert_eq!(app.config().id, AppId::ImageViewer);

        let gallery = Gallery::default();
        assert_eq!(gallery.current().name, "linux_penguin.jpg");
        assert_eq!(gallery.image_width(), None);
    }
}
