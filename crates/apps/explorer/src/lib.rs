//! File manager desktop app: browses the shared virtual file system.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod browser;

use std::{cell::RefCell, rc::Rc};

use desktop_app_contract::{AppConfig, AppView, DesktopApp};
use leptos::logging::warn;
use leptos::*;
use platform_host::{SharedFileSystem, HOME_PATH};

pub use browser::{EntryRow, FileBrowser, FileViewer};

/// File manager app. Unlike the terminal it moves the desktop-wide directory cursor.
pub struct FileManagerApp {
    config: AppConfig,
    fs: SharedFileSystem,
    browser: Option<Rc<RefCell<FileBrowser>>>,
}

impl FileManagerApp {
    /// Creates the app over the desktop's shared file system.
    pub fn new(config: AppConfig, fs: SharedFileSystem) -> Self {
        Self {
            config,
            fs,
            browser: None,
        }
    }

    fn browser(&mut self) -> Rc<RefCell<FileBrowser>> {
        let fs = Rc::clone(&self.fs);
        Rc::clone(
            self.browser
                .get_or_insert_with(|| Rc::new(RefCell::new(FileBrowser::new(fs)))),
        )
    }
}

impl DesktopApp for FileManagerApp {
    fn config(&self) -> &AppConfig {
        &self.config
    }

    fn init(&mut self) {
        if let Err(err) = self.fs.borrow_mut().change_directory(HOME_PATH) {
            warn!("[fileManager] cannot open home directory: {err}");
        }
        self.browser();
    }

    fn render(&mut self) -> AppView {
        let browser = self.browser();
        AppView::new(move || {
            view! { <FileManagerWindow browser=Rc::clone(&browser) /> }.into_view()
        })
    }

    fn cleanup(&mut self) {
        self.browser = None;
    }
}

#[derive(Clone)]
struct BrowserSnapshot {
    location: String,
    rows: Vec<EntryRow>,
    selected: Option<String>,
    viewer: Option<FileViewer>,
    message: Option<String>,
}

impl BrowserSnapshot {
    fn capture(browser: &FileBrowser) -> Self {
        Self {
            location: browser.location(),
            rows: browser.entries(),
            selected: browser.selected().map(str::to_string),
            viewer: browser.viewer().cloned(),
            message: browser.message().map(str::to_string),
        }
    }
}

#[component]
fn FileManagerWindow(browser: Rc<RefCell<FileBrowser>>) -> impl IntoView {
    let snapshot = create_rw_signal(BrowserSnapshot::capture(&browser.borrow()));

    let act: Rc<dyn Fn(&dyn Fn(&mut FileBrowser))> = {
        let browser = Rc::clone(&browser);
        Rc::new(move |action: &dyn Fn(&mut FileBrowser)| {
            let mut browser = browser.borrow_mut();
            action(&mut *browser);
            snapshot.set(BrowserSnapshot::capture(&browser));
        })
    };

    let toolbar_button = {
        let act = Rc::clone(&act);
        move |label: &'static str, action: fn(&mut FileBrowser)| {
            let act = Rc::clone(&act);
            view! {
                <button type="button" on:click=move |_| act(&action)>{label}</button>
            }
        }
    };

    let rows = move || snapshot.with(|s| s.rows.clone());
    let row_act = Rc::clone(&act);
    let viewer_act = Rc::clone(&act);

    view! {
        <div class="app-shell file-manager-app">
            <div class="app-toolbar">
                {toolbar_button("Up", FileBrowser::go_up)}
                {toolbar_button("Home", FileBrowser::go_home)}
                {toolbar_button("Refresh", FileBrowser::refresh)}
                {toolbar_button("New Folder", FileBrowser::new_folder)}
            </div>
            <div class="file-location">{move || snapshot.with(|s| s.location.clone())}</div>
            <div class="file-list" role="grid" aria-label="Directory contents">
                <For each=rows key=|row| row.name.clone() let:row>
                    <FileRow row=row snapshot=snapshot act=Rc::clone(&row_act) />
                </For>
                <Show when=move || snapshot.with(|s| s.rows.is_empty())>
                    <div class="file-empty">"This folder is empty"</div>
                </Show>
            </div>
            <div class="app-statusbar">
                <span>{move || snapshot.with(|s| format!("{} item(s)", s.rows.len()))}</span>
                <span>{move || snapshot.with(|s| s.message.clone().unwrap_or_default())}</span>
            </div>
            {move || {
                let viewer_act = Rc::clone(&viewer_act);
                snapshot.with(|s| s.viewer.clone()).map(|viewer| view! {
                    <div class="file-viewer" role="dialog" aria-label=viewer.title.clone()>
                        <div class="file-viewer-header">
                            <span>{viewer.title}</span>
                            <button
                                type="button"
                                on:click=move |_| viewer_act(&FileBrowser::close_viewer)
                            >
                                "Close"
                            </button>
                        </div>
                        <pre class="file-viewer-content">{viewer.content}</pre>
                    </div>
                })
            }}
        </div>
    }
}

#[component]
fn FileRow(
    row: EntryRow,
    snapshot: RwSignal<BrowserSnapshot>,
    act: Rc<dyn Fn(&dyn Fn(&mut FileBrowser))>,
) -> impl IntoView {
    let name = row.name.clone();
    let is_selected = {
        let name = name.clone();
        Signal::derive(move || snapshot.with(|s| s.selected.as_deref() == Some(name.as_str())))
    };
    let select = {
        let (act, name) = (Rc::clone(&act), name.clone());
        move |_| act(&|browser: &mut FileBrowser| browser.select(&name))
    };
    let activate = move |_| act(&|browser: &mut FileBrowser| browser.activate(&name));

    view! {
        <div
            class=move || if is_selected.get() { "file-item selected" } else { "file-item" }
            on:click=select
            on:dblclick=activate
        >
            <span class="file-icon">{row.icon}</span>
            <span class="file-name">{row.name}</span>
            <span class="file-size">{row.size_label}</span>
            <span class="file-date">{row.modified}</span>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::AppId;
    use platform_host::VirtualFileSystem;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn init_moves_the_shared_cursor_home() {
        let fs = VirtualFileSystem::default().shared();
        let mut app = FileManagerApp::new(AppConfig::fallback(AppId::FileManager), Rc::clone(&fs));
        app.init();
        assert_eq!(fs.borrow().current_path(), "/home/user");

        let browser = app.browser();
        browser.borrow_mut().activate("Pictures");
        assert_eq!(fs.borrow().current_path(), "/home/user/Pictures");

        app.cleanup();
        assert!(app.browser.is_none());
    }
}
