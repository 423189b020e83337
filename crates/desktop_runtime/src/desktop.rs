//! Desktop manager: owns the core services and wires the shell components to them.
//!
//! `init` installs the built-in apps, builds the panel, root menu and icons, and routes panel
//! requests to the window system. `cleanup` tears everything down in reverse dependency order:
//! shells, app registry, window system, event bus.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use desktop_app_contract::AppId;
use leptos::logging::{error, log};
use platform_host::{session_started_ms, DocumentStore};

use crate::app_registry::AppRegistry;
use crate::apps::{app_config, install_builtin_apps, AppServices};
use crate::event_bus::{DesktopEvent, EventBus, EventKind, SubscriptionId};
use crate::icons::{DesktopIcon, DesktopIcons, LaunchTarget};
use crate::menus::{DesktopMenu, MenuCommand};
use crate::model::{Bounds, Point, Size};
use crate::panel::{Panel, VIRTUAL_DESKTOPS};
use crate::window_manager::{WindowSurface, WindowSystem};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Modal message box drawn over the desktop.
pub enum DesktopDialog {
    Trash,
    Properties,
    LaunchFailed { app_id: AppId, reason: String },
}

impl DesktopDialog {
    pub fn title(&self) -> String {
        match self {
            Self::Trash => "Trash".to_string(),
            Self::Properties => "Desktop Properties".to_string(),
            Self::LaunchFailed { .. } => "Application Error".to_string(),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Trash => vec![
                "The trash is empty.".to_string(),
                "Drag files here to delete them.".to_string(),
            ],
            Self::Properties => vec![
                "Desktop Environment: FVWM 2.2".to_string(),
                "X11 Server: XFree86 3.1.2".to_string(),
                "Window Manager: FVWM".to_string(),
                "Display: :0.0 (1024x768x8)".to_string(),
                format!("Virtual Desktops: {VIRTUAL_DESKTOPS}"),
                "Memory: 16MB RAM".to_string(),
                "Kernel: Linux 1.2.13".to_string(),
            ],
            Self::LaunchFailed { app_id, reason } => vec![
                format!("Could not start {}.", app_config(*app_id).title),
                reason.clone(),
            ],
        }
    }
}

struct Shells {
    panel: Rc<Panel>,
    menu: Rc<DesktopMenu>,
    icons: DesktopIcons,
    routes: Vec<(EventKind, SubscriptionId)>,
}

pub struct DesktopManager {
    bus: Rc<EventBus>,
    windows: Rc<WindowSystem>,
    registry: Rc<AppRegistry>,
    services: AppServices,
    viewport: Cell<Size>,
    shells: RefCell<Option<Shells>>,
    dialog: RefCell<Option<DesktopDialog>>,
}

impl DesktopManager {
    pub fn new(
        surface: Rc<dyn WindowSurface>,
        documents: Rc<dyn DocumentStore>,
        viewport: Size,
    ) -> Self {
        let bus = Rc::new(EventBus::new());
        let windows = Rc::new(WindowSystem::new(Rc::clone(&bus), surface));
        let registry = Rc::new(AppRegistry::new(Rc::clone(&bus), Rc::clone(&windows)));
        Self {
            bus,
            windows,
            registry,
            services: AppServices::new(documents),
            viewport: Cell::new(viewport),
            shells: RefCell::new(None),
            dialog: RefCell::new(None),
        }
    }

    pub fn bus(&self) -> Rc<EventBus> {
        Rc::clone(&self.bus)
    }

    pub fn windows(&self) -> Rc<WindowSystem> {
        Rc::clone(&self.windows)
    }

    pub fn registry(&self) -> Rc<AppRegistry> {
        Rc::clone(&self.registry)
    }

    pub fn is_initialized(&self) -> bool {
        self.shells.borrow().is_some()
    }

    /// Brings the desktop up. Calling it again is a no-op.
    pub fn init(&self) {
        if self.is_initialized() {
            return;
        }
        // Terminal `uptime` counts from here.
        session_started_ms();
        let viewport = self.viewport.get();
        install_builtin_apps(&self.registry, &self.services);
        self.windows.set_bounds(Some(Bounds::desktop(viewport)));

        let shells = Shells {
            panel: Rc::new(Panel::new(Rc::clone(&self.bus))),
            menu: DesktopMenu::new(Rc::clone(&self.bus), viewport),
            icons: DesktopIcons::new(viewport),
            routes: self.route_panel_requests(),
        };
        *self.shells.borrow_mut() = Some(shells);

        self.bus.emit(DesktopEvent::DesktopReady);
        log!("[desktop] initialized");
    }

    /// Tears the desktop down. Safe to call before `init` or twice.
    pub fn cleanup(&self) {
        let Some(shells) = self.shells.borrow_mut().take() else {
            return;
        };
        shells.panel.cleanup();
        shells.menu.cleanup();
        for (kind, id) in shells.routes {
            self.bus.off(kind, id);
        }
        self.dialog.borrow_mut().take();
        self.registry.cleanup();
        self.windows.cleanup();
        self.bus.cleanup();
        log!("[desktop] cleaned up");
    }

    pub fn panel(&self) -> Option<Rc<Panel>> {
        self.shells.borrow().as_ref().map(|s| Rc::clone(&s.panel))
    }

    pub fn menu(&self) -> Option<Rc<DesktopMenu>> {
        self.shells.borrow().as_ref().map(|s| Rc::clone(&s.menu))
    }

    pub fn viewport(&self) -> Size {
        self.viewport.get()
    }

    /// Records a new viewport size for window dragging, icon dragging and menu placement.
    pub fn set_viewport(&self, viewport: Size) {
        self.viewport.set(viewport);
        self.windows.set_bounds(Some(Bounds::desktop(viewport)));
        if let Some(shells) = self.shells.borrow_mut().as_mut() {
            shells.icons.set_viewport(viewport);
            shells.menu.set_viewport(viewport);
        }
    }

    pub fn icons(&self) -> Vec<DesktopIcon> {
        self.shells
            .borrow()
            .as_ref()
            .map(|s| s.icons.icons().to_vec())
            .unwrap_or_default()
    }

    pub fn selected_icon(&self) -> Option<LaunchTarget> {
        self.shells.borrow().as_ref().and_then(|s| s.icons.selected())
    }

    pub fn select_icon(&self, target: Option<LaunchTarget>) {
        if let Some(shells) = self.shells.borrow_mut().as_mut() {
            shells.icons.select(target);
        }
    }

    pub fn begin_icon_drag(&self, target: LaunchTarget, pointer: Point) {
        if let Some(shells) = self.shells.borrow_mut().as_mut() {
            shells.icons.begin_drag(target, pointer);
        }
    }

    pub fn update_icon_drag(&self, pointer: Point) -> Option<Point> {
        self.shells
            .borrow_mut()
            .as_mut()
            .and_then(|s| s.icons.update_drag(pointer))
    }

    pub fn end_icon_drag(&self) {
        if let Some(shells) = self.shells.borrow_mut().as_mut() {
            shells.icons.end_drag();
        }
    }

    /// Double-click on an icon.
    pub async fn activate_icon(&self, target: LaunchTarget) {
        self.select_icon(Some(target));
        self.open_target(target).await;
    }

    /// Desktop keyboard shortcuts: Enter opens the selected icon, Delete opens the trash while
    /// it is selected.
    pub async fn handle_key(&self, key: &str) {
        let Some(selected) = self.selected_icon() else {
            return;
        };
        match key {
            "Enter" => self.open_target(selected).await,
            "Delete" if selected == LaunchTarget::Trash => self.open_target(selected).await,
            _ => {}
        }
    }

    /// Opens an app or the trash; a failed launch is reported in a dialog.
    pub async fn open_target(&self, target: LaunchTarget) {
        let app_id = match target {
            LaunchTarget::Trash => {
                self.show_dialog(DesktopDialog::Trash);
                return;
            }
            LaunchTarget::App(app_id) => app_id,
        };
        let registry = Rc::clone(&self.registry);
        if let Err(err) = registry.open_app(app_id).await {
            error!("[desktop] failed to open {app_id}: {err}");
            self.show_dialog(DesktopDialog::LaunchFailed {
                app_id,
                reason: err.to_string(),
            });
        }
    }

    /// Runs a command chosen from the root menu.
    pub async fn run_menu_command(&self, command: MenuCommand) {
        match command {
            MenuCommand::Launch(app_id) => self.open_target(LaunchTarget::App(app_id)).await,
            MenuCommand::Properties => self.show_properties(),
            MenuCommand::Refresh => self.refresh(),
        }
    }

    pub fn show_properties(&self) {
        self.show_dialog(DesktopDialog::Properties);
    }

    /// Clears transient desktop state: icon selection and the root menu.
    pub fn refresh(&self) {
        self.select_icon(None);
        if let Some(menu) = self.menu().filter(|menu| menu.is_visible()) {
            menu.hide();
        }
        log!("[desktop] refreshed");
    }

    pub fn dialog(&self) -> Option<DesktopDialog> {
        self.dialog.borrow().clone()
    }

    pub fn dismiss_dialog(&self) {
        self.dialog.borrow_mut().take();
    }

    fn show_dialog(&self, dialog: DesktopDialog) {
        *self.dialog.borrow_mut() = Some(dialog);
    }

    fn route_panel_requests(&self) -> Vec<(EventKind, SubscriptionId)> {
        let toggle_windows = Rc::downgrade(&self.windows);
        let toggle = self.bus.on(EventKind::WindowToggle, move |event| {
            let (Some(windows), Some(window_id)) = (toggle_windows.upgrade(), event.window_id())
            else {
                return Ok(());
            };
            let Some(window) = windows.get_window(window_id) else {
                return Ok(());
            };
            if window.state.is_focused && !window.state.is_minimized {
                windows.minimize_window(window_id);
            } else {
                windows.restore_window(window_id);
            }
            Ok(())
        });

        let close_windows = Rc::downgrade(&self.windows);
        let close = self.bus.on(EventKind::WindowCloseRequest, move |event| {
            if let (Some(windows), Some(window_id)) = (close_windows.upgrade(), event.window_id()) {
                windows.close_window(window_id);
            }
            Ok(())
        });

        let switched = self.bus.on(EventKind::DesktopSwitched, |event| {
            if let DesktopEvent::DesktopSwitched { desktop } = event {
                log!("[desktop] switched to virtual desktop {}", desktop + 1);
            }
            Ok(())
        });

        vec![
            (EventKind::WindowToggle, toggle),
            (EventKind::WindowCloseRequest, close),
            (EventKind::DesktopSwitched, switched),
        ]
    }
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::{AppLoadError, AppLoadFuture, AppLoader};
    use futures::executor::block_on;
    use platform_host::MemoryDocumentStore;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{WindowId, PANEL_HEIGHT};
    use crate::window_manager::MemoryWindowSurface;

    const VIEWPORT: Size = Size::new(1024, 768);

    fn desktop() -> (Rc<MemoryWindowSurface>, DesktopManager) {
        let surface = Rc::new(MemoryWindowSurface::default());
        let manager = DesktopManager::new(
            surface.clone(),
            Rc::new(MemoryDocumentStore::default()),
            VIEWPORT,
        );
        (surface, manager)
    }

    #[test]
    fn init_twice_builds_shells_once() {
        let (_, manager) = desktop();
        let bus = manager.bus();
        let ready = Rc::new(Cell::new(0));
        let seen = Rc::clone(&ready);
        bus.on(EventKind::DesktopReady, move |_| {
            seen.set(seen.get() + 1);
            Ok(())
        });

        manager.init();
        manager.init();

        assert!(manager.is_initialized());
        assert_eq!(ready.get(), 1);
        assert_eq!(bus.listener_count(EventKind::AppOpened), 1);
        assert_eq!(bus.listener_count(EventKind::WindowToggle), 1);
        assert_eq!(bus.listener_count(EventKind::StartMenuToggle), 1);
        assert_eq!(manager.icons().len(), AppId::ALL.len() + 1);
        assert!(AppId::ALL
            .iter()
            .all(|app_id| manager.registry().is_registered(*app_id)));
    }

    #[test]
    fn cleanup_before_init_is_harmless() {
        let (_, manager) = desktop();
        manager.cleanup();
        manager.cleanup();
        assert!(!manager.is_initialized());
        assert!(manager.panel().is_none());
        assert!(manager.icons().is_empty());
    }

    #[test]
    fn panel_clicks_minimize_restore_and_close() {
        let (surface, manager) = desktop();
        manager.init();
        block_on(manager.open_target(LaunchTarget::App(AppId::Terminal)));

        let panel = manager.panel().expect("panel after init");
        let id = WindowId::new(AppId::Terminal.window_id());
        assert_eq!(panel.buttons().len(), 1);

        panel.click(&id);
        assert!(manager.windows().get_window(&id).is_some_and(|w| w.state.is_minimized));
        assert!(panel.buttons()[0].is_minimized);

        panel.click(&id);
        let window = manager.windows().get_window(&id).expect("window still open");
        assert!(!window.state.is_minimized);
        assert!(window.state.is_focused);

        panel.middle_click(&id);
        assert!(manager.windows().get_window(&id).is_none());
        assert!(!surface.is_mounted(&id));
        assert!(!manager.registry().is_app_running(AppId::Terminal));
        assert!(panel.buttons().is_empty());
    }

    #[test]
    fn trash_and_properties_dialogs() {
        let (_, manager) = desktop();
        manager.init();

        manager.select_icon(Some(LaunchTarget::Trash));
        block_on(manager.handle_key("Delete"));
        assert_eq!(manager.dialog(), Some(DesktopDialog::Trash));
        assert_eq!(
            DesktopDialog::Trash.lines(),
            vec!["The trash is empty.", "Drag files here to delete them."]
        );

        manager.dismiss_dialog();
        assert_eq!(manager.dialog(), None);

        block_on(manager.run_menu_command(MenuCommand::Properties));
        let dialog = manager.dialog().expect("properties dialog");
        assert_eq!(dialog.title(), "Desktop Properties");
        assert!(dialog.lines().contains(&"Virtual Desktops: 4".to_string()));
    }

    #[test]
    fn delete_only_opens_trash() {
        let (_, manager) = desktop();
        manager.init();
        manager.select_icon(Some(LaunchTarget::App(AppId::Xcalc)));
        block_on(manager.handle_key("Delete"));
        assert_eq!(manager.dialog(), None);
        assert!(!manager.registry().is_app_running(AppId::Xcalc));

        block_on(manager.handle_key("Enter"));
        assert!(manager.registry().is_app_running(AppId::Xcalc));
    }

    #[test]
    fn failed_launch_shows_error_dialog() {
        let (_, manager) = desktop();
        manager.init();
        let failing: AppLoader = Rc::new(|| -> AppLoadFuture {
            Box::pin(async {
                Err(AppLoadError::Failed {
                    app_id: AppId::Minesweeper,
                    reason: "chunk missing".to_string(),
                })
            })
        });
        manager.registry().register(AppId::Minesweeper, failing);

        block_on(manager.activate_icon(LaunchTarget::App(AppId::Minesweeper)));

        let dialog = manager.dialog().expect("error dialog");
        assert!(matches!(
            dialog,
            DesktopDialog::LaunchFailed {
                app_id: AppId::Minesweeper,
                ..
            }
        ));
        assert_eq!(
            dialog.lines(),
            vec![
                "Could not start XMines.".to_string(),
                "failed to load app `minesweeper`: chunk missing".to_string(),
            ]
        );
        assert!(manager.windows().get_all_windows().is_empty());
    }

    #[test]
    fn cleanup_closes_apps_and_empties_the_bus() {
        let (surface, manager) = desktop();
        manager.init();
        block_on(manager.open_target(LaunchTarget::App(AppId::TextEditor)));
        let bus = manager.bus();

        manager.cleanup();

        assert!(!manager.is_initialized());
        assert!(surface.mounted_ids().is_empty());
        assert!(manager.registry().running_apps().is_empty());
        for kind in EventKind::ALL {
            assert_eq!(bus.listener_count(kind), 0, "{}", kind.token());
        }
        bus.emit(DesktopEvent::StartMenuToggle);

        manager.init();
        assert!(manager.is_initialized());
    }

    #[test]
    fn window_drag_stays_above_the_panel() {
        let (_, manager) = desktop();
        manager.init();
        block_on(manager.open_target(LaunchTarget::App(AppId::Xcalc)));
        let windows = manager.windows();
        let id = WindowId::new(AppId::Xcalc.window_id());

        windows.begin_drag(&id, Point::new(110, 110));
        let landed = windows.update_drag(Point::new(2000, 2000));
        windows.end_drag();

        let size = windows.get_window(&id).map(|w| w.state.size).expect("window");
        assert_eq!(
            landed,
            Some(Point::new(
                1024 - size.width as i32,
                768 - PANEL_HEIGHT - size.height as i32
            ))
        );
    }
}
