//! Desktop root menu, opened by right-clicking the desktop or from the panel's menu button.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use desktop_app_contract::AppId;

use crate::apps::menu_apps;
use crate::event_bus::{DesktopEvent, EventBus, EventKind, SubscriptionId};
use crate::model::{Point, Size, PANEL_HEIGHT};

pub const MENU_WIDTH: i32 = 200;
pub const MENU_ITEM_HEIGHT: i32 = 24;
pub const MENU_SEPARATOR_HEIGHT: i32 = 8;

/// Launch groups, separated from each other in the menu.
const LAUNCH_GROUPS: [&[AppId]; 3] = [
    &[AppId::Terminal, AppId::FileManager],
    &[AppId::Xcalc, AppId::Xeyes],
    &[AppId::TextEditor, AppId::ImageViewer, AppId::Minesweeper],
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Launch {
        app_id: AppId,
        label: String,
        icon: String,
    },
    Separator,
    Properties,
    Refresh,
}

impl MenuEntry {
    pub fn label(&self) -> &str {
        match self {
            Self::Launch { label, .. } => label,
            Self::Separator => "",
            Self::Properties => "Desktop Properties...",
            Self::Refresh => "Refresh Desktop",
        }
    }

    pub fn icon(&self) -> &str {
        match self {
            Self::Launch { icon, .. } => icon,
            Self::Separator => "",
            Self::Properties => "⚙️",
            Self::Refresh => "🔄",
        }
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, Self::Separator)
    }

    fn height(&self) -> i32 {
        if self.is_separator() {
            MENU_SEPARATOR_HEIGHT
        } else {
            MENU_ITEM_HEIGHT
        }
    }

    fn command(&self) -> Option<MenuCommand> {
        match self {
            Self::Launch { app_id, .. } => Some(MenuCommand::Launch(*app_id)),
            Self::Separator => None,
            Self::Properties => Some(MenuCommand::Properties),
            Self::Refresh => Some(MenuCommand::Refresh),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// What the desktop should do after a menu entry is chosen.
pub enum MenuCommand {
    Launch(AppId),
    Properties,
    Refresh,
}

/// Builds the menu from the app catalog, skipping apps hidden from the menu and empty groups.
pub fn menu_entries() -> Vec<MenuEntry> {
    let apps = menu_apps();
    let mut entries = Vec::new();
    for group in LAUNCH_GROUPS {
        let launchers: Vec<MenuEntry> = group
            .iter()
            .filter_map(|app_id| apps.iter().find(|config| config.id == *app_id))
            .map(|config| MenuEntry::Launch {
                app_id: config.id,
                label: config.menu_label.clone(),
                icon: config.icon.clone(),
            })
            .collect();
        if launchers.is_empty() {
            continue;
        }
        entries.extend(launchers);
        entries.push(MenuEntry::Separator);
    }
    entries.push(MenuEntry::Properties);
    entries.push(MenuEntry::Refresh);
    entries
}

/// Places a `size` menu at `anchor`, flipping left or up when it would leave the viewport.
pub fn place_menu(anchor: Point, size: Size, viewport: Size) -> Point {
    let (width, height) = (size.width as i32, size.height as i32);
    let x = if anchor.x + width > viewport.width as i32 {
        anchor.x - width
    } else {
        anchor.x
    };
    let y = if anchor.y + height > viewport.height as i32 {
        anchor.y - height
    } else {
        anchor.y
    };
    Point::new(x.max(0), y.max(0))
}

#[derive(Debug)]
struct MenuState {
    entries: Vec<MenuEntry>,
    position: Option<Point>,
    viewport: Size,
}

pub struct DesktopMenu {
    bus: Rc<EventBus>,
    state: RefCell<MenuState>,
    start_toggle: RefCell<Option<SubscriptionId>>,
}

impl DesktopMenu {
    /// Creates the hidden menu and listens for the panel's menu button.
    pub fn new(bus: Rc<EventBus>, viewport: Size) -> Rc<Self> {
        let menu = Rc::new(Self {
            bus: Rc::clone(&bus),
            state: RefCell::new(MenuState {
                entries: menu_entries(),
                position: None,
                viewport,
            }),
            start_toggle: RefCell::new(None),
        });

        let weak: Weak<Self> = Rc::downgrade(&menu);
        let id = bus.on(EventKind::StartMenuToggle, move |_| {
            if let Some(menu) = weak.upgrade() {
                menu.toggle_from_panel();
            }
            Ok(())
        });
        *menu.start_toggle.borrow_mut() = Some(id);
        menu
    }

    pub fn entries(&self) -> Vec<MenuEntry> {
        self.state.borrow().entries.clone()
    }

    pub fn is_visible(&self) -> bool {
        self.state.borrow().position.is_some()
    }

    /// Top-left corner of the visible menu.
    pub fn position(&self) -> Option<Point> {
        self.state.borrow().position
    }

    pub fn size(&self) -> Size {
        let height: i32 = self.state.borrow().entries.iter().map(MenuEntry::height).sum();
        Size::new(MENU_WIDTH as u32, height as u32)
    }

    pub fn set_viewport(&self, viewport: Size) {
        self.state.borrow_mut().viewport = viewport;
    }

    /// Opens the menu at a pointer position, kept inside the viewport.
    pub fn show(&self, x: i32, y: i32) {
        let size = self.size();
        {
            let mut state = self.state.borrow_mut();
            state.position = Some(place_menu(Point::new(x, y), size, state.viewport));
        }
        self.bus.emit(DesktopEvent::ContextMenuShown);
    }

    pub fn hide(&self) {
        self.state.borrow_mut().position = None;
        self.bus.emit(DesktopEvent::ContextMenuHidden);
    }

    /// Chooses the entry at `index` and closes the menu. Separators and stale indexes do
    /// nothing.
    pub fn activate(&self, index: usize) -> Option<MenuCommand> {
        let command = self
            .state
            .borrow()
            .entries
            .get(index)
            .and_then(MenuEntry::command)?;
        self.hide();
        Some(command)
    }

    /// Drops the panel subscription.
    pub fn cleanup(&self) {
        if let Some(id) = self.start_toggle.borrow_mut().take() {
            self.bus.off(EventKind::StartMenuToggle, id);
        }
        self.state.borrow_mut().position = None;
    }

    fn toggle_from_panel(&self) {
        if self.is_visible() {
            self.hide();
            return;
        }
        let bottom = self.state.borrow().viewport.height as i32 - PANEL_HEIGHT;
        self.show(0, bottom);
    }
}
