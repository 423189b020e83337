//! Shared contract types between the desktop runtime and the built-in apps.
//!
//! The runtime only knows apps through the [`DesktopApp`] capability set (`init`, `render`,
//! `cleanup`) and the closed [`AppId`] enumeration. Apps are produced lazily by an
//! [`AppLoader`], an async zero-argument factory registered with the runtime app registry.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::{fmt, rc::Rc, str::FromStr};

use futures::future::LocalBoxFuture;
use leptos::View;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Closed set of applications the desktop knows how to launch.
pub enum AppId {
    /// XTerm-style terminal emulator.
    Terminal,
    /// Read-only virtual file system browser.
    FileManager,
    /// Plain text editor with local save.
    TextEditor,
    /// Four-function calculator.
    Xcalc,
    /// XMines minesweeper game.
    Minesweeper,
    /// XV sample image viewer.
    ImageViewer,
    /// Eyes that follow the pointer.
    Xeyes,
}

impl AppId {
    /// Every launchable app, in desktop layout order.
    pub const ALL: [AppId; 7] = [
        Self::Terminal,
        Self::FileManager,
        Self::TextEditor,
        Self::Xcalc,
        Self::Minesweeper,
        Self::ImageViewer,
        Self::Xeyes,
    ];

    /// Returns the stable string token used in manifests, window ids, and log lines.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Terminal => "terminal",
            Self::FileManager => "fileManager",
            Self::TextEditor => "textEditor",
            Self::Xcalc => "xcalc",
            Self::Minesweeper => "minesweeper",
            Self::ImageViewer => "imageViewer",
            Self::Xeyes => "xeyes",
        }
    }

    /// Returns the id of the single window an app instance owns.
    pub fn window_id(self) -> String {
        format!("{}-window", self.as_str())
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppId {
    type Err = AppLoadError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == raw)
            .ok_or_else(|| AppLoadError::UnknownApp(raw.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Window sizing and chrome flags declared by an app manifest.
///
/// Every field is optional; the runtime merges these over its own defaults.
pub struct WindowDefaults {
    /// Requested content width in pixels.
    #[serde(default)]
    pub width: Option<u32>,
    /// Requested content height in pixels.
    #[serde(default)]
    pub height: Option<u32>,
    /// Initial left offset.
    #[serde(default)]
    pub x: Option<i32>,
    /// Initial top offset.
    #[serde(default)]
    pub y: Option<i32>,
    /// Whether the window may be resized.
    #[serde(default)]
    pub resizable: Option<bool>,
    /// Whether the chrome shows a minimize control.
    #[serde(default)]
    pub minimizable: Option<bool>,
    /// Whether the chrome shows a close control.
    #[serde(default)]
    pub closable: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Static metadata for one app, loaded from its `app.manifest.toml`.
pub struct AppConfig {
    /// App identifier.
    pub id: AppId,
    /// Window title and display name.
    pub title: String,
    /// Short glyph shown on desktop icons and menus.
    pub icon: String,
    /// One-line description used for tooltips.
    pub description: String,
    /// Compact label rendered on panel buttons.
    pub panel_label: String,
    /// Label rendered in the desktop menu.
    pub menu_label: String,
    /// Whether a desktop icon is laid out for the app.
    pub show_on_desktop: bool,
    /// Whether the desktop menu offers a launch entry.
    pub show_in_menu: bool,
    /// Window defaults merged over the runtime defaults.
    #[serde(default)]
    pub window: WindowDefaults,
}

impl AppConfig {
    /// Builds a minimal config used when no manifest entry exists for `id`.
    pub fn fallback(id: AppId) -> Self {
        Self {
            id,
            title: id.as_str().to_string(),
            icon: "?".to_string(),
            description: String::new(),
            panel_label: id.as_str().to_string(),
            menu_label: id.as_str().to_string(),
            show_on_desktop: false,
            show_in_menu: false,
            window: WindowDefaults::default(),
        }
    }
}

#[derive(Clone)]
/// Deferred app content, rendered once into the window's content area.
pub struct AppView {
    render: Rc<dyn Fn() -> View>,
}

impl AppView {
    /// Wraps a render closure.
    pub fn new(render: impl Fn() -> View + 'static) -> Self {
        Self {
            render: Rc::new(render),
        }
    }

    /// Builds the view tree.
    pub fn render(&self) -> View {
        (self.render)()
    }
}

impl fmt::Debug for AppView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AppView(..)")
    }
}

/// Capability set every launchable app implements.
pub trait DesktopApp {
    /// Returns the app's static metadata.
    fn config(&self) -> &AppConfig;

    /// Prepares app state before the first render of a new instance.
    fn init(&mut self);

    /// Produces the content embedded in the app's window.
    fn render(&mut self) -> AppView;

    /// Releases resources held by the running instance.
    fn cleanup(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Failures raised while loading an app.
pub enum AppLoadError {
    /// No loader is registered for the requested id.
    #[error("no loader registered for app `{0}`")]
    NotRegistered(AppId),
    /// A string did not name a known app.
    #[error("unknown app id `{0}`")]
    UnknownApp(String),
    /// The loader ran but could not construct the app.
    #[error("failed to load app `{app_id}`: {reason}")]
    Failed {
        /// App that failed to load.
        app_id: AppId,
        /// Loader-provided reason.
        reason: String,
    },
}

/// Boxed future returned by an [`AppLoader`].
pub type AppLoadFuture = LocalBoxFuture<'static, Result<Box<dyn DesktopApp>, AppLoadError>>;

/// Lazy async factory for an app.
pub type AppLoader = Rc<dyn Fn() -> AppLoadFuture>;

/// Wraps a synchronous constructor into an [`AppLoader`].
pub fn loader_fn<F, A>(factory: F) -> AppLoader
where
    F: Fn() -> A + 'static,
    A: DesktopApp + 'static,
{
    let factory = Rc::new(factory);
    Rc::new(move || -> AppLoadFuture {
        let factory = Rc::clone(&factory);
        Box::pin(async move { Ok(Box::new(factory()) as Box<dyn DesktopApp>) })
    })
}
