use std::fmt;

use desktop_app_contract::{AppConfig, AppView};
use serde::{Deserialize, Serialize};

pub const DEFAULT_WINDOW_WIDTH: u32 = 400;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 300;
pub const DEFAULT_WINDOW_X: i32 = 100;
pub const DEFAULT_WINDOW_Y: i32 = 100;
/// Z-index floor; the first window created is stacked at `BASE_Z_INDEX + 1`.
pub const BASE_Z_INDEX: u32 = 100;

/// Height of the panel docked along the bottom edge of the screen.
pub const PANEL_HEIGHT: i32 = 40;
pub const ICON_WIDTH: u32 = 72;
pub const ICON_HEIGHT: u32 = 80;
/// Top-left corner of the first desktop icon.
pub const ICON_GRID_ORIGIN: Point = Point::new(16, 16);
/// Vertical distance between icon slots in a column.
pub const ICON_ROW_STEP: i32 = 88;
/// Horizontal distance between icon columns.
pub const ICON_COLUMN_STEP: i32 = 96;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub String);

impl WindowId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WindowId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for WindowId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset_from(self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Rectangle that dragged windows and desktop icons are kept inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Screen area above the panel for a `viewport`-sized screen.
    pub const fn desktop(viewport: Size) -> Self {
        Self::new(
            0,
            0,
            viewport.width as i32,
            viewport.height as i32 - PANEL_HEIGHT,
        )
    }

    /// Clamps the top-left corner of a `size` box so the box stays inside the bounds.
    ///
    /// A box larger than the bounds is pinned to the bounds origin.
    pub fn clamp(self, origin: Point, size: Size) -> Point {
        let max_x = (self.x + self.width - size.width as i32).max(self.x);
        let max_y = (self.y + self.height - size.height as i32).max(self.y);
        Point::new(origin.x.clamp(self.x, max_x), origin.y.clamp(self.y, max_y))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub id: WindowId,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub resizable: bool,
    pub minimizable: bool,
    pub closable: bool,
    pub class_name: Option<String>,
}

impl WindowConfig {
    pub fn new(id: impl Into<WindowId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
            x: None,
            y: None,
            resizable: true,
            minimizable: true,
            closable: true,
            class_name: None,
        }
    }

    /// Builds the window for an app, merging its declared defaults over the runtime defaults.
    pub fn for_app(config: &AppConfig) -> Self {
        let declared = config.window;
        let base = Self::new(WindowId::new(config.id.window_id()), config.title.clone());
        Self {
            width: declared.width.unwrap_or(base.width),
            height: declared.height.unwrap_or(base.height),
            x: declared.x,
            y: declared.y,
            resizable: declared.resizable.unwrap_or(base.resizable),
            minimizable: declared.minimizable.unwrap_or(base.minimizable),
            closable: declared.closable.unwrap_or(base.closable),
            class_name: Some(format!("{}-app", config.id.as_str())),
            ..base
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn initial_position(&self) -> Point {
        Point::new(
            self.x.unwrap_or(DEFAULT_WINDOW_X),
            self.y.unwrap_or(DEFAULT_WINDOW_Y),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowState {
    pub is_minimized: bool,
    pub is_focused: bool,
    pub is_maximized: bool,
    pub position: Point,
    pub size: Size,
    pub z_index: u32,
}

#[derive(Debug, Clone)]
pub struct WindowInstance {
    pub config: WindowConfig,
    pub state: WindowState,
    pub content: Option<AppView>,
}

impl WindowInstance {
    pub fn id(&self) -> &WindowId {
        &self.config.id
    }

    pub fn is_visible(&self) -> bool {
        !self.state.is_minimized
    }
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::{AppId, WindowDefaults};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn app_window_config_merges_declared_values_over_defaults() {
        let mut app = AppConfig::fallback(AppId::Xcalc);
        app.title = "Calculator".to_string();
        app.window = WindowDefaults {
            width: Some(200),
            resizable: Some(false),
            ..WindowDefaults::default()
        };

        let config = WindowConfig::for_app(&app);
        assert_eq!(config.id, WindowId::from("xcalc-window"));
        assert_eq!(config.title, "Calculator");
        assert_eq!((config.width, config.height), (200, DEFAULT_WINDOW_HEIGHT));
        assert!(!config.resizable);
        assert!(config.closable);
        assert_eq!(config.initial_position(), Point::new(100, 100));
    }

    #[test]
    fn bounds_clamp_keeps_box_inside_and_pins_oversized_boxes() {
        let bounds = Bounds::new(0, 0, 800, 600);
        let size = Size::new(200, 100);
        assert_eq!(bounds.clamp(Point::new(-20, 30), size), Point::new(0, 30));
        assert_eq!(bounds.clamp(Point::new(700, 550), size), Point::new(600, 500));
        assert_eq!(
            bounds.clamp(Point::new(50, 50), Size::new(1000, 1000)),
            Point::new(0, 0)
        );
    }

    #[test]
    fn desktop_bounds_stop_at_the_panel() {
        assert_eq!(
            Bounds::desktop(Size::new(1024, 768)),
            Bounds::new(0, 0, 1024, 768 - PANEL_HEIGHT)
        );
    }
}
