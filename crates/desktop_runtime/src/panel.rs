//! FVWM-style panel: running-app buttons, the virtual desktop pager, and the clock.
//!
//! The panel only listens to the bus and emits requests back onto it; it never touches the
//! window system directly.

use std::{cell::RefCell, rc::Rc};

use chrono::{DateTime, Utc};
use desktop_app_contract::AppId;
use leptos::logging::log;

use crate::apps::app_config;
use crate::event_bus::{DesktopEvent, EventBus, EventKind, SubscriptionId};
use crate::model::WindowId;

pub const VIRTUAL_DESKTOPS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelButton {
    pub app_id: AppId,
    pub window_id: WindowId,
    pub label: String,
    pub is_minimized: bool,
    pub is_active: bool,
}

#[derive(Debug, Default)]
struct PanelState {
    buttons: Vec<PanelButton>,
    current_desktop: usize,
}

impl PanelState {
    fn apply(&mut self, event: &DesktopEvent) {
        match event {
            DesktopEvent::AppOpened { app_id, window_id } => {
                self.buttons.retain(|b| b.app_id != *app_id);
                for button in &mut self.buttons {
                    button.is_active = false;
                }
                self.buttons.push(PanelButton {
                    app_id: *app_id,
                    window_id: window_id.clone(),
                    label: app_config(*app_id).panel_label,
                    is_minimized: false,
                    is_active: true,
                });
            }
            DesktopEvent::AppClosed { app_id } => {
                self.buttons.retain(|b| b.app_id != *app_id);
            }
            DesktopEvent::WindowMinimized {
                window_id,
                minimized,
            } => {
                if let Some(button) = self.buttons.iter_mut().find(|b| &b.window_id == window_id) {
                    button.is_minimized = *minimized;
                }
            }
            DesktopEvent::WindowFocused { window_id } => {
                for button in &mut self.buttons {
                    button.is_active = &button.window_id == window_id;
                }
            }
            _ => {}
        }
    }
}

pub struct Panel {
    bus: Rc<EventBus>,
    state: Rc<RefCell<PanelState>>,
    subscriptions: RefCell<Vec<(EventKind, SubscriptionId)>>,
}

impl Panel {
    /// Creates the panel and starts mirroring app and window events.
    pub fn new(bus: Rc<EventBus>) -> Self {
        let state = Rc::new(RefCell::new(PanelState::default()));
        let subscriptions = [
            EventKind::AppOpened,
            EventKind::AppClosed,
            EventKind::WindowMinimized,
            EventKind::WindowFocused,
        ]
        .into_iter()
        .map(|kind| {
            let state = Rc::clone(&state);
            let id = bus.on(kind, move |event| {
                state.borrow_mut().apply(event);
                Ok(())
            });
            (kind, id)
        })
        .collect();

        Self {
            bus,
            state,
            subscriptions: RefCell::new(subscriptions),
        }
    }

    /// Buttons in the order their apps were opened.
    pub fn buttons(&self) -> Vec<PanelButton> {
        self.state.borrow().buttons.clone()
    }

    /// Left click: ask the desktop to minimize or raise the window.
    pub fn click(&self, window_id: &WindowId) {
        self.bus.emit(DesktopEvent::WindowToggle {
            window_id: window_id.clone(),
        });
    }

    /// Middle click: ask the desktop to close the window.
    pub fn middle_click(&self, window_id: &WindowId) {
        self.bus.emit(DesktopEvent::WindowCloseRequest {
            window_id: window_id.clone(),
        });
    }

    pub fn current_desktop(&self) -> usize {
        self.state.borrow().current_desktop
    }

    /// Switches the pager; out-of-range and already-current desktops are ignored.
    pub fn switch_desktop(&self, desktop: usize) {
        {
            let mut state = self.state.borrow_mut();
            if desktop >= VIRTUAL_DESKTOPS || desktop == state.current_desktop {
                return;
            }
            state.current_desktop = desktop;
        }
        self.bus.emit(DesktopEvent::DesktopSwitched { desktop });
    }

    pub fn toggle_start_menu(&self) {
        self.bus.emit(DesktopEvent::StartMenuToggle);
    }

    /// Drops every bus subscription and forgets the buttons.
    pub fn cleanup(&self) {
        for (kind, id) in self.subscriptions.borrow_mut().drain(..) {
            self.bus.off(kind, id);
        }
        self.state.borrow_mut().buttons.clear();
        log!("[panel] cleaned up");
    }
}

/// Two-line Unix panel clock, e.g. `("Fri, Oct 16", "09:30")`.
pub fn clock_label(unix_ms: u64) -> (String, String) {
    let now: DateTime<Utc> = DateTime::from_timestamp_millis(unix_ms as i64).unwrap_or_default();
    (
        now.format("%a, %b %-d").to_string(),
        now.format("%H:%M").to_string(),
    )
}
