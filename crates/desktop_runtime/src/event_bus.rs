//! Synchronous typed publish/subscribe hub shared by every desktop component.
//!
//! Components never hold references to each other's internals; they talk through
//! [`DesktopEvent`]s. Delivery is synchronous and in registration order. A handler that returns
//! an error is logged and counted, and delivery continues with the next handler.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

use desktop_app_contract::AppId;
use leptos::logging::error;
use thiserror::Error;

use crate::model::WindowId;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Every notification that crosses component boundaries.
pub enum DesktopEvent {
    WindowCreated { window_id: WindowId },
    WindowClosing { window_id: WindowId },
    WindowClosed { window_id: WindowId },
    WindowMinimized { window_id: WindowId, minimized: bool },
    WindowFocused { window_id: WindowId },
    /// Panel button click: minimize a focused window, otherwise restore and focus it.
    WindowToggle { window_id: WindowId },
    /// Shell request to close a window through the window system.
    WindowCloseRequest { window_id: WindowId },
    AppOpened { app_id: AppId, window_id: WindowId },
    AppClosed { app_id: AppId },
    DesktopReady,
    DesktopSwitched { desktop: usize },
    ContextMenuShown,
    ContextMenuHidden,
    StartMenuToggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Payload-free discriminant of [`DesktopEvent`], used as the subscription key.
pub enum EventKind {
    WindowCreated,
    WindowClosing,
    WindowClosed,
    WindowMinimized,
    WindowFocused,
    WindowToggle,
    WindowCloseRequest,
    AppOpened,
    AppClosed,
    DesktopReady,
    DesktopSwitched,
    ContextMenuShown,
    ContextMenuHidden,
    StartMenuToggle,
}

impl EventKind {
    pub const ALL: [EventKind; 14] = [
        Self::WindowCreated,
        Self::WindowClosing,
        Self::WindowClosed,
        Self::WindowMinimized,
        Self::WindowFocused,
        Self::WindowToggle,
        Self::WindowCloseRequest,
        Self::AppOpened,
        Self::AppClosed,
        Self::DesktopReady,
        Self::DesktopSwitched,
        Self::ContextMenuShown,
        Self::ContextMenuHidden,
        Self::StartMenuToggle,
    ];

    /// Returns a stable string token for log lines.
    pub const fn token(self) -> &'static str {
        match self {
            Self::WindowCreated => "window:created",
            Self::WindowClosing => "window:closing",
            Self::WindowClosed => "window:closed",
            Self::WindowMinimized => "window:minimized",
            Self::WindowFocused => "window:focused",
            Self::WindowToggle => "window:toggle",
            Self::WindowCloseRequest => "window:close-request",
            Self::AppOpened => "app:opened",
            Self::AppClosed => "app:closed",
            Self::DesktopReady => "desktop:ready",
            Self::DesktopSwitched => "desktop:switched",
            Self::ContextMenuShown => "contextmenu:shown",
            Self::ContextMenuHidden => "contextmenu:hidden",
            Self::StartMenuToggle => "startmenu:toggle",
        }
    }
}

impl DesktopEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::WindowCreated { .. } => EventKind::WindowCreated,
            Self::WindowClosing { .. } => EventKind::WindowClosing,
            Self::WindowClosed { .. } => EventKind::WindowClosed,
            Self::WindowMinimized { .. } => EventKind::WindowMinimized,
            Self::WindowFocused { .. } => EventKind::WindowFocused,
            Self::WindowToggle { .. } => EventKind::WindowToggle,
            Self::WindowCloseRequest { .. } => EventKind::WindowCloseRequest,
            Self::AppOpened { .. } => EventKind::AppOpened,
            Self::AppClosed { .. } => EventKind::AppClosed,
            Self::DesktopReady => EventKind::DesktopReady,
            Self::DesktopSwitched { .. } => EventKind::DesktopSwitched,
            Self::ContextMenuShown => EventKind::ContextMenuShown,
            Self::ContextMenuHidden => EventKind::ContextMenuHidden,
            Self::StartMenuToggle => EventKind::StartMenuToggle,
        }
    }

    /// Returns the window the event refers to, if any.
    pub fn window_id(&self) -> Option<&WindowId> {
        match self {
            Self::WindowCreated { window_id }
            | Self::WindowClosing { window_id }
            | Self::WindowClosed { window_id }
            | Self::WindowMinimized { window_id, .. }
            | Self::WindowFocused { window_id }
            | Self::WindowToggle { window_id }
            | Self::WindowCloseRequest { window_id }
            | Self::AppOpened { window_id, .. } => Some(window_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
/// Failure reported by a subscriber; logged by the bus and never propagated to the emitter.
pub struct HandlerError(pub String);

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type HandlerResult = Result<(), HandlerError>;

/// Shared subscriber callback.
pub type EventHandler = Rc<dyn Fn(&DesktopEvent) -> HandlerResult>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Registration {
    id: SubscriptionId,
    handler: EventHandler,
    once: bool,
}

#[derive(Default)]
pub struct EventBus {
    registrations: RefCell<HashMap<EventKind, Vec<Registration>>>,
    next_id: Cell<u64>,
    failed: Cell<u64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for repeated delivery of `kind`.
    pub fn on<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&DesktopEvent) -> HandlerResult + 'static,
    {
        self.register(kind, Rc::new(handler), false)
    }

    /// Registers a shared handler; registering the same `Rc` twice for one kind returns the
    /// existing subscription instead of adding a second one.
    pub fn on_handler(&self, kind: EventKind, handler: EventHandler) -> SubscriptionId {
        let existing = self.registrations.borrow().get(&kind).and_then(|list| {
            list.iter()
                .find(|r| !r.once && same_handler(&r.handler, &handler))
                .map(|r| r.id)
        });
        existing.unwrap_or_else(|| self.register(kind, handler, false))
    }

    /// Registers `handler` for a single delivery of `kind`.
    ///
    /// The registration is removed before the handler runs, so a re-entrant emit of the same
    /// kind from inside the handler does not reach it again.
    pub fn once<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&DesktopEvent) -> HandlerResult + 'static,
    {
        self.register(kind, Rc::new(handler), true)
    }

    /// Removes a subscription. Unknown ids are ignored.
    pub fn off(&self, kind: EventKind, id: SubscriptionId) {
        self.remove(kind, id);
    }

    /// Delivers `event` to every handler registered for its kind when the call starts.
    ///
    /// Handlers removed by an earlier handler during the same emit are skipped.
    pub fn emit(&self, event: DesktopEvent) {
        let kind = event.kind();
        let snapshot: Vec<(SubscriptionId, EventHandler, bool)> = match self
            .registrations
            .borrow()
            .get(&kind)
        {
            Some(list) => list
                .iter()
                .map(|r| (r.id, Rc::clone(&r.handler), r.once))
                .collect(),
            None => return,
        };

        for (id, handler, once) in snapshot {
            let still_registered = if once {
                self.remove(kind, id)
            } else {
                self.is_registered(kind, id)
            };
            if !still_registered {
                continue;
            }
            if let Err(err) = handler(&event) {
                self.failed.set(self.failed.get() + 1);
                error!("[event-bus] handler for {} failed: {err}", kind.token());
            }
        }
    }

    /// Drops every registration.
    pub fn cleanup(&self) {
        self.registrations.borrow_mut().clear();
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.registrations
            .borrow()
            .get(&kind)
            .map_or(0, |list| list.len())
    }

    /// Total handler failures observed since construction.
    pub fn failed_deliveries(&self) -> u64 {
        self.failed.get()
    }

    fn register(&self, kind: EventKind, handler: EventHandler, once: bool) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.registrations
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push(Registration { id, handler, once });
        id
    }

    fn remove(&self, kind: EventKind, id: SubscriptionId) -> bool {
        let mut registrations = self.registrations.borrow_mut();
        let Some(list) = registrations.get_mut(&kind) else {
            return false;
        };
        let Some(index) = list.iter().position(|r| r.id == id) else {
            return false;
        };
        list.remove(index);
        if list.is_empty() {
            registrations.remove(&kind);
        }
        true
    }

    fn is_registered(&self, kind: EventKind, id: SubscriptionId) -> bool {
        self.registrations
            .borrow()
            .get(&kind)
            .is_some_and(|list| list.iter().any(|r| r.id == id))
    }
}

fn same_handler(a: &EventHandler, b: &EventHandler) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const u8, Rc::as_ptr(b) as *const u8)
}
