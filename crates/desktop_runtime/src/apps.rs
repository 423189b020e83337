use std::rc::Rc;

use desktop_app_calculator::CalculatorApp;
use desktop_app_contract::{loader_fn, AppConfig, AppId, AppLoader};
use desktop_app_explorer::FileManagerApp;
use desktop_app_image_viewer::ImageViewerApp;
use desktop_app_minesweeper::MinesweeperApp;
use desktop_app_notepad::TextEditorApp;
use desktop_app_terminal::TerminalApp;
use desktop_app_xeyes::XeyesApp;
use leptos::logging::error;
use platform_host::{DocumentStore, SharedFileSystem, VirtualFileSystem};

use crate::app_registry::AppRegistry;

include!(concat!(env!("OUT_DIR"), "/app_catalog_generated.rs"));

thread_local! {
    static CATALOG: Vec<AppConfig> = parse_catalog(APP_MANIFEST_CATALOG_JSON);
}

fn parse_catalog(raw: &str) -> Vec<AppConfig> {
    serde_json::from_str(raw).unwrap_or_else(|err| {
        error!("[apps] app manifest catalog is unreadable: {err}");
        Vec::new()
    })
}

/// Every app manifest, in desktop layout order.
pub fn app_catalog() -> Vec<AppConfig> {
    CATALOG.with(|catalog| catalog.clone())
}

/// Returns the manifest for `app_id`, or a minimal fallback when it is missing.
pub fn app_config(app_id: AppId) -> AppConfig {
    CATALOG.with(|catalog| {
        catalog
            .iter()
            .find(|entry| entry.id == app_id)
            .cloned()
            .unwrap_or_else(|| AppConfig::fallback(app_id))
    })
}

pub fn desktop_icon_apps() -> Vec<AppConfig> {
    app_catalog()
        .into_iter()
        .filter(|entry| entry.show_on_desktop)
        .collect()
}

pub fn menu_apps() -> Vec<AppConfig> {
    app_catalog()
        .into_iter()
        .filter(|entry| entry.show_in_menu)
        .collect()
}

/// Services injected into apps at load time.
#[derive(Clone)]
pub struct AppServices {
    pub fs: SharedFileSystem,
    pub documents: Rc<dyn DocumentStore>,
}

impl AppServices {
    pub fn new(documents: Rc<dyn DocumentStore>) -> Self {
        Self {
            fs: VirtualFileSystem::default().shared(),
            documents,
        }
    }
}

/// Builds the lazy loader for a built-in app.
pub fn builtin_loader(app_id: AppId, services: &AppServices) -> AppLoader {
    let config = app_config(app_id);
    match app_id {
        AppId::Terminal => {
            let fs = Rc::clone(&services.fs);
            loader_fn(move || TerminalApp::new(config.clone(), Rc::clone(&fs)))
        }
        AppId::FileManager => {
            let fs = Rc::clone(&services.fs);
            loader_fn(move || FileManagerApp::new(config.clone(), Rc::clone(&fs)))
        }
        AppId::TextEditor => {
            let documents = Rc::clone(&services.documents);
            loader_fn(move || TextEditorApp::new(config.clone(), Rc::clone(&documents)))
        }
        AppId::Xcalc => loader_fn(move || CalculatorApp::new(config.clone())),
        AppId::Minesweeper => loader_fn(move || MinesweeperApp::new(config.clone())),
        AppId::ImageViewer => loader_fn(move || ImageViewerApp::new(config.clone())),
        AppId::Xeyes => loader_fn(move || XeyesApp::new(config.clone())),
    }
}

/// Registers a loader for every built-in app.
pub fn install_builtin_apps(registry: &AppRegistry, services: &AppServices) {
    for app_id in AppId::ALL {
        registry.register(app_id, builtin_loader(app_id, services));
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::MemoryDocumentStore;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::event_bus::EventBus;
    use crate::window_manager::{NoopWindowSurface, WindowSystem};

    #[test]
    fn catalog_covers_every_app_with_declared_titles() {
        let catalog = app_catalog();
        assert_eq!(
            catalog.iter().map(|c| c.id).collect::<Vec<_>>(),
            AppId::ALL.to_vec()
        );
        assert_eq!(app_config(AppId::Terminal).title, "XTerm");
        assert_eq!(app_config(AppId::Minesweeper).title, "XMines");
        assert_eq!(app_config(AppId::Xcalc).window.resizable, Some(false));
        assert_eq!(app_config(AppId::Xeyes).window.resizable, Some(false));
        assert_eq!(app_config(AppId::ImageViewer).title, "XV Image Viewer");
        assert_eq!(app_config(AppId::FileManager).window.width, Some(680));
    }

    #[test]
    fn malformed_catalog_falls_back_to_empty() {
        assert!(parse_catalog("{not json").is_empty());
    }

    #[test]
    fn builtin_apps_open_with_manifest_window_sizes() {
        let bus = Rc::new(EventBus::new());
        let windows = Rc::new(WindowSystem::new(
            Rc::clone(&bus),
            Rc::new(NoopWindowSurface),
        ));
        let registry = Rc::new(AppRegistry::new(bus, Rc::clone(&windows)));
        let services = AppServices::new(Rc::new(MemoryDocumentStore::default()));
        install_builtin_apps(&registry, &services);

        for app_id in AppId::ALL {
            block_on(registry.open_app(app_id)).expect("open builtin");
        }

        let sizes: Vec<(String, u32, u32)> = windows
            .get_all_windows()
            .into_iter()
            .map(|w| (w.config.title, w.config.width, w.config.height))
            .collect();
        assert_eq!(
            sizes,
            vec![
                ("XTerm".to_string(), 500, 350),
                ("File Manager".to_string(), 680, 480),
                ("Text Editor".to_string(), 500, 400),
                ("Calculator".to_string(), 200, 280),
                ("XMines".to_string(), 400, 450),
                ("XV Image Viewer".to_string(), 500, 400),
                ("XEyes".to_string(), 280, 200),
            ]
        );
        assert_eq!(services.fs.borrow().current_path(), "/home/user");
    }
}
