//! Window system: owns every open window, its stacking order, focus, and drag session.
//!
//! Every mutation is pushed to a [`WindowSurface`] (the render target) and announced on the
//! [`EventBus`]. Operations that name an unknown window are silent no-ops; callers may race
//! with teardown and a stale id is not an error.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use desktop_app_contract::AppView;
use thiserror::Error;

use crate::event_bus::{DesktopEvent, EventBus};
use crate::model::{
    Bounds, Point, Size, WindowConfig, WindowId, WindowInstance, WindowState, BASE_Z_INDEX,
};

/// Render target the window system re-applies window state to after every mutation.
pub trait WindowSurface {
    /// Mounts a newly created window.
    fn attach(&self, window: &WindowInstance);
    /// Re-renders a window whose state changed.
    fn apply_state(&self, window: &WindowInstance);
    /// Unmounts a closed window.
    fn detach(&self, window_id: &WindowId);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopWindowSurface;

impl WindowSurface for NoopWindowSurface {
    fn attach(&self, _window: &WindowInstance) {}

    fn apply_state(&self, _window: &WindowInstance) {}

    fn detach(&self, _window_id: &WindowId) {}
}

#[derive(Debug, Default)]
/// Surface that records which windows are mounted and their last applied state.
pub struct MemoryWindowSurface {
    mounted: RefCell<Vec<(WindowId, WindowState)>>,
}

impl MemoryWindowSurface {
    pub fn mounted_ids(&self) -> Vec<WindowId> {
        self.mounted.borrow().iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn is_mounted(&self, window_id: &WindowId) -> bool {
        self.mounted.borrow().iter().any(|(id, _)| id == window_id)
    }

    pub fn last_state(&self, window_id: &WindowId) -> Option<WindowState> {
        self.mounted
            .borrow()
            .iter()
            .find(|(id, _)| id == window_id)
            .map(|(_, state)| *state)
    }
}

impl WindowSurface for MemoryWindowSurface {
    fn attach(&self, window: &WindowInstance) {
        self.mounted
            .borrow_mut()
            .push((window.id().clone(), window.state));
    }

    fn apply_state(&self, window: &WindowInstance) {
        if let Some(entry) = self
            .mounted
            .borrow_mut()
            .iter_mut()
            .find(|(id, _)| id == window.id())
        {
            entry.1 = window.state;
        }
    }

    fn detach(&self, window_id: &WindowId) {
        self.mounted.borrow_mut().retain(|(id, _)| id != window_id);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// A window with this id is already open.
    #[error("window `{0}` already exists")]
    DuplicateWindow(WindowId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DragSession {
    window_id: WindowId,
    grab_offset: Point,
}

pub struct WindowSystem {
    bus: Rc<EventBus>,
    surface: Rc<dyn WindowSurface>,
    windows: RefCell<Vec<WindowInstance>>,
    highest_z: Cell<u32>,
    bounds: Cell<Option<Bounds>>,
    drag: RefCell<Option<DragSession>>,
}

impl WindowSystem {
    pub fn new(bus: Rc<EventBus>, surface: Rc<dyn WindowSurface>) -> Self {
        Self {
            bus,
            surface,
            windows: RefCell::new(Vec::new()),
            highest_z: Cell::new(BASE_Z_INDEX),
            bounds: Cell::new(None),
            drag: RefCell::new(None),
        }
    }

    /// Opens a focused window on top of the stack.
    ///
    /// # Errors
    ///
    /// Returns [`WindowError::DuplicateWindow`] when `config.id` is already open.
    pub fn create_window(
        &self,
        config: WindowConfig,
        content: Option<AppView>,
    ) -> Result<WindowInstance, WindowError> {
        if self.contains(&config.id) {
            return Err(WindowError::DuplicateWindow(config.id));
        }

        let window = WindowInstance {
            state: WindowState {
                is_minimized: false,
                is_focused: true,
                is_maximized: false,
                position: config.initial_position(),
                size: Size::new(config.width, config.height),
                z_index: self.next_z_index(),
            },
            config,
            content,
        };

        let blurred = {
            let mut windows = self.windows.borrow_mut();
            let blurred = blur_all(&mut windows);
            windows.push(window.clone());
            blurred
        };
        for other in &blurred {
            self.surface.apply_state(other);
        }
        self.surface.attach(&window);
        self.bus.emit(DesktopEvent::WindowCreated {
            window_id: window.id().clone(),
        });
        Ok(window)
    }

    pub fn close_window(&self, window_id: &WindowId) {
        if !self.contains(window_id) {
            return;
        }
        self.bus.emit(DesktopEvent::WindowClosing {
            window_id: window_id.clone(),
        });

        let removed = {
            let mut windows = self.windows.borrow_mut();
            let index = windows.iter().position(|w| w.id() == window_id);
            index.map(|index| windows.remove(index))
        };
        if removed.is_none() {
            return;
        }

        {
            let mut drag = self.drag.borrow_mut();
            if drag.as_ref().is_some_and(|d| &d.window_id == window_id) {
                *drag = None;
            }
        }
        self.surface.detach(window_id);
        self.bus.emit(DesktopEvent::WindowClosed {
            window_id: window_id.clone(),
        });
    }

    /// Toggles the minimized flag.
    pub fn minimize_window(&self, window_id: &WindowId) {
        let Some(window) = self.update(window_id, |w| {
            w.state.is_minimized = !w.state.is_minimized;
        }) else {
            return;
        };
        self.bus.emit(DesktopEvent::WindowMinimized {
            window_id: window_id.clone(),
            minimized: window.state.is_minimized,
        });
    }

    /// Un-minimizes a window and focuses it.
    pub fn restore_window(&self, window_id: &WindowId) {
        let was_minimized = self
            .windows
            .borrow()
            .iter()
            .find(|w| w.id() == window_id)
            .map(|w| w.state.is_minimized);
        match was_minimized {
            None => return,
            Some(true) => self.minimize_window(window_id),
            Some(false) => {}
        }
        self.focus_window(window_id);
    }

    /// Focuses a window and raises it above every z-index handed out so far.
    pub fn focus_window(&self, window_id: &WindowId) {
        if !self.contains(window_id) {
            return;
        }
        let z_index = self.next_z_index();
        let changed = {
            let mut windows = self.windows.borrow_mut();
            let mut changed = blur_all(&mut windows);
            changed.retain(|w| w.id() != window_id);
            if let Some(target) = windows.iter_mut().find(|w| w.id() == window_id) {
                target.state.is_focused = true;
                target.state.z_index = z_index;
                changed.push(target.clone());
            }
            changed
        };
        for window in &changed {
            self.surface.apply_state(window);
        }
        self.bus.emit(DesktopEvent::WindowFocused {
            window_id: window_id.clone(),
        });
    }

    pub fn move_window(&self, window_id: &WindowId, x: i32, y: i32) {
        self.update(window_id, |w| w.state.position = Point::new(x, y));
    }

    pub fn resize_window(&self, window_id: &WindowId, width: u32, height: u32) {
        self.update(window_id, |w| w.state.size = Size::new(width, height));
    }

    /// Sets the area drags are clamped to; `None` leaves drags unconstrained.
    pub fn set_bounds(&self, bounds: Option<Bounds>) {
        self.bounds.set(bounds);
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds.get()
    }

    /// Starts dragging `window_id` from a title-bar press at `pointer` and focuses it.
    pub fn begin_drag(&self, window_id: &WindowId, pointer: Point) {
        let Some(position) = self
            .windows
            .borrow()
            .iter()
            .find(|w| w.id() == window_id)
            .map(|w| w.state.position)
        else {
            return;
        };
        *self.drag.borrow_mut() = Some(DragSession {
            window_id: window_id.clone(),
            grab_offset: pointer.offset_from(position),
        });
        self.focus_window(window_id);
    }

    /// Moves the dragged window under `pointer`; returns the applied position.
    pub fn update_drag(&self, pointer: Point) -> Option<Point> {
        let session = self.drag.borrow().clone()?;
        let size = self.get_window(&session.window_id)?.state.size;
        let mut position = pointer.offset_from(session.grab_offset);
        if let Some(bounds) = self.bounds.get() {
            position = bounds.clamp(position, size);
        }
        self.move_window(&session.window_id, position.x, position.y);
        Some(position)
    }

    pub fn end_drag(&self) {
        *self.drag.borrow_mut() = None;
    }

    pub fn dragging_window(&self) -> Option<WindowId> {
        self.drag.borrow().as_ref().map(|d| d.window_id.clone())
    }

    pub fn get_window(&self, window_id: &WindowId) -> Option<WindowInstance> {
        self.windows
            .borrow()
            .iter()
            .find(|w| w.id() == window_id)
            .cloned()
    }

    /// Returns every open window in creation order.
    pub fn get_all_windows(&self) -> Vec<WindowInstance> {
        self.windows.borrow().clone()
    }

    pub fn focused_window_id(&self) -> Option<WindowId> {
        self.windows
            .borrow()
            .iter()
            .find(|w| w.state.is_focused)
            .map(|w| w.id().clone())
    }

    /// Unmounts and forgets every window without emitting close events.
    pub fn cleanup(&self) {
        let drained: Vec<WindowInstance> = self.windows.borrow_mut().drain(..).collect();
        for window in &drained {
            self.surface.detach(window.id());
        }
        *self.drag.borrow_mut() = None;
    }

    fn contains(&self, window_id: &WindowId) -> bool {
        self.windows.borrow().iter().any(|w| w.id() == window_id)
    }

    fn next_z_index(&self) -> u32 {
        let next = self.highest_z.get() + 1;
        self.highest_z.set(next);
        next
    }

    fn update(
        &self,
        window_id: &WindowId,
        apply: impl FnOnce(&mut WindowInstance),
    ) -> Option<WindowInstance> {
        let updated = {
            let mut windows = self.windows.borrow_mut();
            let window = windows.iter_mut().find(|w| w.id() == window_id)?;
            apply(window);
            window.clone()
        };
        self.surface.apply_state(&updated);
        Some(updated)
    }
}

fn blur_all(windows: &mut [WindowInstance]) -> Vec<WindowInstance> {
    windows
        .iter_mut()
        .filter(|w| w.state.is_focused)
        .map(|w| {
            w.state.is_focused = false;
            w.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::event_bus::EventKind;

    fn system() -> (Rc<EventBus>, Rc<MemoryWindowSurface>, WindowSystem) {
        let bus = Rc::new(EventBus::new());
        let surface = Rc::new(MemoryWindowSurface::default());
        let windows = WindowSystem::new(Rc::clone(&bus), surface.clone());
        (bus, surface, windows)
    }

    fn record(bus: &EventBus, kinds: &[EventKind]) -> Rc<RefCell<Vec<DesktopEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for kind in kinds {
            let sink = Rc::clone(&log);
            bus.on(*kind, move |event| {
                sink.borrow_mut().push(event.clone());
                Ok(())
            });
        }
        log
    }

    fn id(raw: &str) -> WindowId {
        WindowId::from(raw)
    }

    #[test]
    fn create_window_focuses_new_window_and_emits_created() {
        let (bus, surface, windows) = system();
        let log = record(&bus, &[EventKind::WindowCreated]);

        let first = windows
            .create_window(WindowConfig::new("a", "A"), None)
            .expect("create a");
        let second = windows
            .create_window(WindowConfig::new("b", "B"), None)
            .expect("create b");

        assert_eq!(first.state.z_index, BASE_Z_INDEX + 1);
        assert_eq!(second.state.z_index, BASE_Z_INDEX + 2);
        assert_eq!(second.state.position, Point::new(100, 100));
        assert_eq!(windows.focused_window_id(), Some(id("b")));
        assert_eq!(
            surface.last_state(&id("a")).map(|s| s.is_focused),
            Some(false)
        );
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn duplicate_window_id_is_rejected() {
        let (_bus, _surface, windows) = system();
        windows
            .create_window(WindowConfig::new("a", "A"), None)
            .expect("create");
        assert_eq!(
            windows
                .create_window(WindowConfig::new("a", "Again"), None)
                .map(|w| w.config.title),
            Err(WindowError::DuplicateWindow(id("a")))
        );
        assert_eq!(windows.get_all_windows().len(), 1);
    }

    #[test]
    fn focus_always_assigns_a_strictly_higher_z_index() {
        let (_bus, _surface, windows) = system();
        for raw in ["a", "b", "c"] {
            windows
                .create_window(WindowConfig::new(raw, raw), None)
                .expect("create");
        }

        let mut last = 0;
        for raw in ["a", "a", "c", "b", "b", "a"] {
            windows.focus_window(&id(raw));
            let all = windows.get_all_windows();
            let target = all.iter().find(|w| w.id() == &id(raw)).expect("window");
            let max_other = all
                .iter()
                .filter(|w| w.id() != &id(raw))
                .map(|w| w.state.z_index)
                .max()
                .unwrap_or(0);
            assert!(target.state.z_index > last);
            assert!(target.state.z_index > max_other);
            last = target.state.z_index;

            let focused: Vec<_> = all.iter().filter(|w| w.state.is_focused).collect();
            assert_eq!(focused.len(), 1);
            assert_eq!(focused[0].id(), &id(raw));
        }
    }

    #[test]
    fn close_window_detaches_and_emits_closing_then_closed() {
        let (bus, surface, windows) = system();
        let log = record(&bus, &[EventKind::WindowClosing, EventKind::WindowClosed]);
        windows
            .create_window(WindowConfig::new("a", "A"), None)
            .expect("create");
        assert!(surface.is_mounted(&id("a")));

        windows.close_window(&id("a"));
        windows.close_window(&id("a"));

        assert!(windows.get_window(&id("a")).is_none());
        assert!(!surface.is_mounted(&id("a")));
        assert_eq!(
            *log.borrow(),
            vec![
                DesktopEvent::WindowClosing { window_id: id("a") },
                DesktopEvent::WindowClosed { window_id: id("a") },
            ]
        );
    }

    #[test]
    fn minimize_toggles_and_reports_new_flag() {
        let (bus, surface, windows) = system();
        let log = record(&bus, &[EventKind::WindowMinimized]);
        windows
            .create_window(WindowConfig::new("a", "A"), None)
            .expect("create");

        windows.minimize_window(&id("a"));
        assert_eq!(
            surface.last_state(&id("a")).map(|s| s.is_minimized),
            Some(true)
        );
        windows.minimize_window(&id("a"));

        assert_eq!(
            *log.borrow(),
            vec![
                DesktopEvent::WindowMinimized {
                    window_id: id("a"),
                    minimized: true
                },
                DesktopEvent::WindowMinimized {
                    window_id: id("a"),
                    minimized: false
                },
            ]
        );
    }

    #[test]
    fn restore_unminimizes_and_focuses() {
        let (_bus, _surface, windows) = system();
        windows
            .create_window(WindowConfig::new("a", "A"), None)
            .expect("create");
        windows
            .create_window(WindowConfig::new("b", "B"), None)
            .expect("create");
        windows.minimize_window(&id("a"));

        windows.restore_window(&id("a"));

        let a = windows.get_window(&id("a")).expect("a");
        assert!(!a.state.is_minimized);
        assert!(a.state.is_focused);
    }

    #[test]
    fn unknown_ids_are_silent_no_ops() {
        let (bus, _surface, windows) = system();
        let log = record(
            &bus,
            &[
                EventKind::WindowClosing,
                EventKind::WindowClosed,
                EventKind::WindowMinimized,
                EventKind::WindowFocused,
            ],
        );
        let ghost = id("ghost");
        windows.close_window(&ghost);
        windows.minimize_window(&ghost);
        windows.restore_window(&ghost);
        windows.focus_window(&ghost);
        windows.move_window(&ghost, 1, 1);
        windows.resize_window(&ghost, 1, 1);
        windows.begin_drag(&ghost, Point::new(0, 0));
        assert_eq!(windows.update_drag(Point::new(5, 5)), None);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn move_and_resize_change_state_without_events() {
        let (bus, _surface, windows) = system();
        let log = record(&bus, &[EventKind::WindowFocused, EventKind::WindowMinimized]);
        windows
            .create_window(WindowConfig::new("a", "A"), None)
            .expect("create");
        windows.move_window(&id("a"), 10, 20);
        windows.resize_window(&id("a"), 640, 480);

        let a = windows.get_window(&id("a")).expect("a");
        assert_eq!(a.state.position, Point::new(10, 20));
        assert_eq!(a.state.size, Size::new(640, 480));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn drag_follows_pointer_and_clamps_to_bounds() {
        let (_bus, _surface, windows) = system();
        windows
            .create_window(WindowConfig::new("a", "A").with_size(200, 100), None)
            .expect("create");
        windows
            .create_window(WindowConfig::new("b", "B"), None)
            .expect("create");

        windows.begin_drag(&id("a"), Point::new(110, 105));
        assert_eq!(windows.focused_window_id(), Some(id("a")));
        assert_eq!(windows.update_drag(Point::new(160, 205)), Some(Point::new(150, 200)));

        windows.set_bounds(Some(Bounds::new(0, 0, 800, 600)));
        assert_eq!(windows.update_drag(Point::new(5, 2)), Some(Point::new(0, 0)));
        assert_eq!(
            windows.update_drag(Point::new(2000, 2000)),
            Some(Point::new(600, 500))
        );

        windows.end_drag();
        assert_eq!(windows.update_drag(Point::new(50, 50)), None);
        assert_eq!(
            windows.get_window(&id("a")).map(|w| w.state.position),
            Some(Point::new(600, 500))
        );
    }

    #[test]
    fn cleanup_unmounts_everything() {
        let (_bus, surface, windows) = system();
        windows
            .create_window(WindowConfig::new("a", "A"), None)
            .expect("create");
        windows.cleanup();
        assert!(windows.get_all_windows().is_empty());
        assert!(surface.mounted_ids().is_empty());
    }
}
