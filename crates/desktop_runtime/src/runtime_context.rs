//! Runtime provider and context wiring for the desktop shell.
//!
//! The provider owns the [`DesktopManager`] for the lifetime of the page, mirrors the window
//! system into a signal through [`SignalWindowSurface`], and bumps a revision counter on every
//! bus event so shell views re-read headless state. UI composition stays in
//! [`crate::components`].

use std::rc::Rc;
use std::time::Duration;

use leptos::*;

use crate::{
    desktop::DesktopManager,
    event_bus::EventKind,
    host::DesktopHostContext,
    icons::LaunchTarget,
    menus::MenuCommand,
    model::{WindowId, WindowInstance},
    window_manager::WindowSurface,
};

/// Window surface that mirrors mounted windows into a reactive list.
pub struct SignalWindowSurface {
    windows: RwSignal<Vec<WindowInstance>>,
}

impl SignalWindowSurface {
    pub fn new(windows: RwSignal<Vec<WindowInstance>>) -> Self {
        Self { windows }
    }
}

impl WindowSurface for SignalWindowSurface {
    fn attach(&self, window: &WindowInstance) {
        let window = window.clone();
        self.windows.update(|windows| windows.push(window));
    }

    fn apply_state(&self, window: &WindowInstance) {
        let state = window.state;
        self.windows.update(|windows| {
            if let Some(mounted) = windows.iter_mut().find(|w| w.id() == window.id()) {
                mounted.state = state;
            }
        });
    }

    fn detach(&self, window_id: &WindowId) {
        self.windows
            .update(|windows| windows.retain(|w| w.id() != window_id));
    }
}

#[derive(Clone, Copy)]
/// Leptos context for reaching the desktop manager from shell components.
pub struct DesktopRuntimeContext {
    /// Host services the desktop was built with.
    pub host: StoredValue<DesktopHostContext>,
    desktop: StoredValue<Rc<DesktopManager>>,
    /// Mounted windows, in creation order.
    pub windows: RwSignal<Vec<WindowInstance>>,
    /// Bumped after every bus event and every direct shell mutation.
    pub revision: RwSignal<u64>,
}

impl DesktopRuntimeContext {
    pub fn manager(&self) -> Rc<DesktopManager> {
        self.desktop.get_value()
    }

    /// Marks headless shell state as changed.
    pub fn touch(&self) {
        self.revision.update(|revision| *revision += 1);
    }

    /// Runs a synchronous shell mutation and re-renders.
    pub fn with_desktop<R>(&self, action: impl FnOnce(&DesktopManager) -> R) -> R {
        let manager = self.manager();
        let out = action(&manager);
        self.touch();
        out
    }

    /// Opens an app or the trash in the background.
    pub fn open(&self, target: LaunchTarget) {
        let runtime = *self;
        spawn_local(async move {
            runtime.manager().open_target(target).await;
            runtime.touch();
        });
    }

    /// Runs a root menu command in the background.
    pub fn run_menu_command(&self, command: MenuCommand) {
        let runtime = *self;
        spawn_local(async move {
            runtime.manager().run_menu_command(command).await;
            runtime.touch();
        });
    }

    /// Forwards a desktop key press.
    pub fn handle_key(&self, key: String) {
        let runtime = *self;
        spawn_local(async move {
            runtime.manager().handle_key(&key).await;
            runtime.touch();
        });
    }
}

#[component]
/// Builds the desktop, provides [`DesktopRuntimeContext`] to descendants, and tears the
/// desktop down when unmounted.
pub fn DesktopProvider(
    /// Injected host services; defaults to the browser host.
    #[prop(optional)]
    host: Option<DesktopHostContext>,
    children: Children,
) -> impl IntoView {
    let host = host.unwrap_or_default();
    let windows = create_rw_signal(Vec::<WindowInstance>::new());
    let revision = create_rw_signal(0_u64);

    let manager = Rc::new(DesktopManager::new(
        Rc::new(SignalWindowSurface::new(windows)),
        host.documents(),
        host.viewport(),
    ));
    manager.init();
    let bus = manager.bus();
    for kind in EventKind::ALL {
        bus.on(kind, move |_| {
            revision.update(|revision| *revision += 1);
            Ok(())
        });
    }

    let runtime = DesktopRuntimeContext {
        host: store_value(host),
        desktop: store_value(manager),
        windows,
        revision,
    };
    provide_context(runtime);

    let resize_listener = window_event_listener(ev::resize, move |_| {
        let viewport = runtime.host.with_value(DesktopHostContext::viewport);
        runtime.with_desktop(|desktop| desktop.set_viewport(viewport));
    });
    on_cleanup(move || {
        resize_listener.remove();
        runtime.manager().cleanup();
    });

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}

/// Current wall clock, refreshed every second while the calling component is mounted.
pub fn use_wall_clock() -> ReadSignal<u64> {
    let (now, set_now) = create_signal(platform_host::unix_time_ms_now());
    match set_interval_with_handle(
        move || set_now.set(platform_host::unix_time_ms_now()),
        Duration::from_secs(1),
    ) {
        Ok(handle) => on_cleanup(move || handle.clear()),
        Err(err) => logging::warn!("[panel] clock timer unavailable: {err:?}"),
    }
    now
}
