//! App registry: lazy loading, single running instance per app, and app/window teardown.
//!
//! Loaded app objects are cached independently of running instances, so closing an app and
//! opening it again reuses the cached object instead of calling the loader a second time.
//! Closing an app's window through the window system tears the app down through a
//! `WindowClosed` subscription taken when the app opened.

use std::{
    cell::RefCell,
    collections::HashMap,
    rc::{Rc, Weak},
};

use desktop_app_contract::{AppConfig, AppId, AppLoadError, AppLoader, AppView, DesktopApp};
use leptos::logging::{error, log, warn};
use thiserror::Error;

use crate::event_bus::{DesktopEvent, EventBus, EventKind, SubscriptionId};
use crate::model::{WindowConfig, WindowId};
use crate::window_manager::{WindowError, WindowSystem};

type SharedApp = Rc<RefCell<Box<dyn DesktopApp>>>;

#[derive(Debug, Clone)]
/// Snapshot of a running app.
pub struct AppInstance {
    pub app_id: AppId,
    pub config: AppConfig,
    pub window_id: Option<WindowId>,
    pub is_running: bool,
    pub content: AppView,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Load(#[from] AppLoadError),
    #[error("failed to open a window for app `{app_id}`: {source}")]
    Window {
        app_id: AppId,
        #[source]
        source: WindowError,
    },
}

impl RegistryError {
    pub fn app_id(&self) -> Option<AppId> {
        match self {
            Self::Load(AppLoadError::NotRegistered(app_id))
            | Self::Load(AppLoadError::Failed { app_id, .. })
            | Self::Window { app_id, .. } => Some(*app_id),
            Self::Load(AppLoadError::UnknownApp(_)) => None,
        }
    }
}

struct RunningApp {
    instance: AppInstance,
    app: SharedApp,
    window_closed: SubscriptionId,
}

pub struct AppRegistry {
    bus: Rc<EventBus>,
    windows: Rc<WindowSystem>,
    loaders: RefCell<HashMap<AppId, AppLoader>>,
    loaded: RefCell<HashMap<AppId, SharedApp>>,
    running: RefCell<Vec<RunningApp>>,
}

impl AppRegistry {
    pub fn new(bus: Rc<EventBus>, windows: Rc<WindowSystem>) -> Self {
        Self {
            bus,
            windows,
            loaders: RefCell::new(HashMap::new()),
            loaded: RefCell::new(HashMap::new()),
            running: RefCell::new(Vec::new()),
        }
    }

    /// Registers the loader for `app_id`, replacing any previous one.
    pub fn register(&self, app_id: AppId, loader: AppLoader) {
        self.loaders.borrow_mut().insert(app_id, loader);
    }

    pub fn is_registered(&self, app_id: AppId) -> bool {
        self.loaders.borrow().contains_key(&app_id)
    }

    /// Opens `app_id`, or focuses its window when it is already running.
    ///
    /// # Errors
    ///
    /// Returns an error when no loader is registered, the loader fails, or the window cannot
    /// be created. No instance is recorded on failure.
    pub async fn open_app(self: &Rc<Self>, app_id: AppId) -> Result<AppInstance, RegistryError> {
        if let Some(existing) = self.focus_running(app_id) {
            return Ok(existing);
        }

        let app = match self.cached_app(app_id) {
            Some(app) => app,
            None => {
                let loaded = self.load(app_id).await.map_err(|err| {
                    error!("[app-registry] failed to load {app_id}: {err}");
                    RegistryError::from(err)
                })?;
                // Another open may have completed while the loader was suspended.
                if let Some(existing) = self.focus_running(app_id) {
                    return Ok(existing);
                }
                let app = Rc::new(RefCell::new(loaded));
                Rc::clone(self.loaded.borrow_mut().entry(app_id).or_insert(app))
            }
        };

        let (config, content) = {
            let mut app = app.borrow_mut();
            app.init();
            let content = app.render();
            (app.config().clone(), content)
        };

        let window_config = WindowConfig::for_app(&config);
        let window_id = window_config.id.clone();
        if let Err(source) = self
            .windows
            .create_window(window_config, Some(content.clone()))
        {
            error!("[app-registry] failed to open window for {app_id}: {source}");
            app.borrow_mut().cleanup();
            return Err(RegistryError::Window { app_id, source });
        }

        let instance = AppInstance {
            app_id,
            config,
            window_id: Some(window_id.clone()),
            is_running: true,
            content,
        };
        let window_closed = self.watch_window_close(app_id, window_id.clone());
        self.running.borrow_mut().push(RunningApp {
            instance: instance.clone(),
            app,
            window_closed,
        });

        log!("[app-registry] opened {app_id} in {window_id}");
        self.bus.emit(DesktopEvent::AppOpened { app_id, window_id });
        Ok(instance)
    }

    /// Tears down a running app: app cleanup, window close, `AppClosed`.
    pub fn close_app(&self, app_id: AppId) {
        let removed = {
            let mut running = self.running.borrow_mut();
            let index = running.iter().position(|r| r.instance.app_id == app_id);
            index.map(|index| running.remove(index))
        };
        let Some(running) = removed else {
            return;
        };

        self.bus.off(EventKind::WindowClosed, running.window_closed);
        match running.app.try_borrow_mut() {
            Ok(mut app) => app.cleanup(),
            Err(_) => warn!("[app-registry] {app_id} is busy; skipping cleanup"),
        }
        if let Some(window_id) = &running.instance.window_id {
            self.windows.close_window(window_id);
        }
        log!("[app-registry] closed {app_id}");
        self.bus.emit(DesktopEvent::AppClosed { app_id });
    }

    /// Closes every running app and forgets every loaded app object.
    ///
    /// Loaders stay registered, so a later open calls the loader again.
    pub fn cleanup(&self) {
        for app_id in self.running_apps() {
            self.close_app(app_id);
        }
        self.running.borrow_mut().clear();
        self.loaded.borrow_mut().clear();
    }

    pub fn get_app(&self, app_id: AppId) -> Option<AppInstance> {
        self.running
            .borrow()
            .iter()
            .find(|r| r.instance.app_id == app_id)
            .map(|r| r.instance.clone())
    }

    pub fn is_app_running(&self, app_id: AppId) -> bool {
        self.running
            .borrow()
            .iter()
            .any(|r| r.instance.app_id == app_id)
    }

    /// Running app ids in open order.
    pub fn running_apps(&self) -> Vec<AppId> {
        self.running
            .borrow()
            .iter()
            .map(|r| r.instance.app_id)
            .collect()
    }

    pub fn is_loaded(&self, app_id: AppId) -> bool {
        self.loaded.borrow().contains_key(&app_id)
    }

    fn focus_running(&self, app_id: AppId) -> Option<AppInstance> {
        let existing = self.get_app(app_id)?;
        if let Some(window_id) = &existing.window_id {
            self.windows.focus_window(window_id);
        }
        Some(existing)
    }

    fn cached_app(&self, app_id: AppId) -> Option<SharedApp> {
        self.loaded.borrow().get(&app_id).cloned()
    }

    async fn load(&self, app_id: AppId) -> Result<Box<dyn DesktopApp>, AppLoadError> {
        let loader = self
            .loaders
            .borrow()
            .get(&app_id)
            .cloned()
            .ok_or(AppLoadError::NotRegistered(app_id))?;
        loader().await
    }

    fn watch_window_close(self: &Rc<Self>, app_id: AppId, window_id: WindowId) -> SubscriptionId {
        let registry: Weak<Self> = Rc::downgrade(self);
        self.bus.on(EventKind::WindowClosed, move |event| {
            if event.window_id() == Some(&window_id) {
                if let Some(registry) = registry.upgrade() {
                    registry.close_app(app_id);
                }
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use desktop_app_contract::{loader_fn, AppLoadFuture};
    use futures::executor::block_on;
    use leptos::IntoView;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::window_manager::MemoryWindowSurface;

    #[derive(Default)]
    struct Spy {
        inits: Cell<u32>,
        renders: Cell<u32>,
        cleanups: Cell<u32>,
        loads: Cell<u32>,
    }

    struct SpyApp {
        config: AppConfig,
        spy: Rc<Spy>,
    }

    impl DesktopApp for SpyApp {
        fn config(&self) -> &AppConfig {
            &self.config
        }

        fn init(&mut self) {
            self.spy.inits.set(self.spy.inits.get() + 1);
        }

        fn render(&mut self) -> AppView {
            self.spy.renders.set(self.spy.renders.get() + 1);
            AppView::new(|| ().into_view())
        }

        fn cleanup(&mut self) {
            self.spy.cleanups.set(self.spy.cleanups.get() + 1);
        }
    }

    fn spy_loader(app_id: AppId, title: &str, spy: &Rc<Spy>) -> AppLoader {
        let spy = Rc::clone(spy);
        let mut config = AppConfig::fallback(app_id);
        config.title = title.to_string();
        config.window.width = Some(500);
        config.window.height = Some(350);
        loader_fn(move || {
            spy.loads.set(spy.loads.get() + 1);
            SpyApp {
                config: config.clone(),
                spy: Rc::clone(&spy),
            }
        })
    }

    fn registry() -> (Rc<EventBus>, Rc<WindowSystem>, Rc<AppRegistry>) {
        let bus = Rc::new(EventBus::new());
        let surface = Rc::new(MemoryWindowSurface::default());
        let windows = Rc::new(WindowSystem::new(Rc::clone(&bus), surface));
        let registry = Rc::new(AppRegistry::new(Rc::clone(&bus), Rc::clone(&windows)));
        (bus, windows, registry)
    }

    fn record_opened(bus: &EventBus) -> Rc<RefCell<Vec<DesktopEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        bus.on(EventKind::AppOpened, move |event| {
            sink.borrow_mut().push(event.clone());
            Ok(())
        });
        log
    }

    #[test]
    fn opening_terminal_loads_once_and_creates_one_window() {
        let (bus, windows, registry) = registry();
        let spy = Rc::new(Spy::default());
        registry.register(AppId::Terminal, spy_loader(AppId::Terminal, "XTerm", &spy));
        let opened = record_opened(&bus);

        let instance = block_on(registry.open_app(AppId::Terminal)).expect("open terminal");

        assert_eq!(spy.loads.get(), 1);
        assert_eq!(
            *opened.borrow(),
            vec![DesktopEvent::AppOpened {
                app_id: AppId::Terminal,
                window_id: WindowId::from("terminal-window"),
            }]
        );
        let all = windows.get_all_windows();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].config.title, "XTerm");
        assert_eq!((all[0].config.width, all[0].config.height), (500, 350));
        assert_eq!(instance.window_id, Some(WindowId::from("terminal-window")));
        assert!(instance.is_running);
    }

    #[test]
    fn second_open_focuses_existing_instance() {
        let (bus, windows, registry) = registry();
        let spy = Rc::new(Spy::default());
        registry.register(AppId::Xcalc, spy_loader(AppId::Xcalc, "Calculator", &spy));
        registry.register(AppId::Terminal, spy_loader(AppId::Terminal, "XTerm", &spy));
        let opened = record_opened(&bus);

        block_on(registry.open_app(AppId::Xcalc)).expect("open xcalc");
        block_on(registry.open_app(AppId::Terminal)).expect("open terminal");
        let z_before = windows
            .get_window(&WindowId::from("xcalc-window"))
            .map(|w| w.state.z_index);

        let again = block_on(registry.open_app(AppId::Xcalc)).expect("reopen xcalc");

        assert_eq!(again.app_id, AppId::Xcalc);
        assert_eq!(registry.running_apps(), vec![AppId::Xcalc, AppId::Terminal]);
        assert_eq!(windows.get_all_windows().len(), 2);
        assert_eq!(opened.borrow().len(), 2);
        assert_eq!(spy.inits.get(), 2);
        assert_eq!(
            windows.focused_window_id(),
            Some(WindowId::from("xcalc-window"))
        );
        let z_after = windows
            .get_window(&WindowId::from("xcalc-window"))
            .map(|w| w.state.z_index);
        assert!(z_after > z_before);
    }

    #[test]
    fn closing_window_runs_app_cleanup_exactly_once() {
        let (bus, windows, registry) = registry();
        let spy = Rc::new(Spy::default());
        registry.register(AppId::Xcalc, spy_loader(AppId::Xcalc, "Calculator", &spy));
        let closed = Rc::new(Cell::new(0));
        let counter = Rc::clone(&closed);
        bus.on(EventKind::AppClosed, move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        });

        block_on(registry.open_app(AppId::Xcalc)).expect("open");
        windows.close_window(&WindowId::from("xcalc-window"));

        assert_eq!(spy.cleanups.get(), 1);
        assert!(!registry.is_app_running(AppId::Xcalc));
        assert_eq!(closed.get(), 1);
        assert_eq!(bus.listener_count(EventKind::WindowClosed), 0);
    }

    #[test]
    fn unrelated_window_close_does_not_tear_down_app() {
        let (_bus, windows, registry) = registry();
        let spy = Rc::new(Spy::default());
        registry.register(AppId::Xcalc, spy_loader(AppId::Xcalc, "Calculator", &spy));
        block_on(registry.open_app(AppId::Xcalc)).expect("open");

        windows
            .create_window(WindowConfig::new("dialog", "Dialog"), None)
            .expect("create dialog");
        windows.close_window(&WindowId::from("dialog"));
        assert!(registry.is_app_running(AppId::Xcalc));

        windows.close_window(&WindowId::from("xcalc-window"));
        assert_eq!(spy.cleanups.get(), 1);
    }

    #[test]
    fn programmatic_close_cleans_up_and_closes_window() {
        let (bus, windows, registry) = registry();
        let spy = Rc::new(Spy::default());
        registry.register(AppId::Xcalc, spy_loader(AppId::Xcalc, "Calculator", &spy));
        block_on(registry.open_app(AppId::Xcalc)).expect("open");

        registry.close_app(AppId::Xcalc);
        registry.close_app(AppId::Xcalc);

        assert_eq!(spy.cleanups.get(), 1);
        assert!(windows.get_all_windows().is_empty());
        assert_eq!(bus.listener_count(EventKind::WindowClosed), 0);
    }

    #[test]
    fn reopen_after_close_reuses_cached_app() {
        let (_bus, _windows, registry) = registry();
        let spy = Rc::new(Spy::default());
        registry.register(AppId::Xcalc, spy_loader(AppId::Xcalc, "Calculator", &spy));

        block_on(registry.open_app(AppId::Xcalc)).expect("open");
        registry.close_app(AppId::Xcalc);
        assert!(registry.is_loaded(AppId::Xcalc));
        block_on(registry.open_app(AppId::Xcalc)).expect("reopen");

        assert_eq!(spy.loads.get(), 1);
        assert_eq!(spy.inits.get(), 2);
    }

    #[test]
    fn cleanup_closes_all_and_forces_reload() {
        let (_bus, windows, registry) = registry();
        let spy = Rc::new(Spy::default());
        registry.register(AppId::Xcalc, spy_loader(AppId::Xcalc, "Calculator", &spy));
        registry.register(AppId::Terminal, spy_loader(AppId::Terminal, "XTerm", &spy));
        block_on(registry.open_app(AppId::Xcalc)).expect("open xcalc");
        block_on(registry.open_app(AppId::Terminal)).expect("open terminal");

        registry.cleanup();

        assert_eq!(spy.cleanups.get(), 2);
        assert!(registry.running_apps().is_empty());
        assert!(windows.get_all_windows().is_empty());
        assert!(!registry.is_loaded(AppId::Xcalc));

        block_on(registry.open_app(AppId::Xcalc)).expect("open after cleanup");
        assert_eq!(spy.loads.get(), 3);
    }

    #[test]
    fn loader_failure_leaves_registry_usable() {
        let (bus, windows, registry) = registry();
        let opened = record_opened(&bus);
        let failing: AppLoader = Rc::new(|| -> AppLoadFuture {
            Box::pin(async {
                Err(AppLoadError::Failed {
                    app_id: AppId::Minesweeper,
                    reason: "chunk missing".to_string(),
                })
            })
        });
        registry.register(AppId::Minesweeper, failing);

        let err = block_on(registry.open_app(AppId::Minesweeper)).expect_err("load fails");
        assert_eq!(err.app_id(), Some(AppId::Minesweeper));
        assert!(!registry.is_app_running(AppId::Minesweeper));
        assert!(!registry.is_loaded(AppId::Minesweeper));
        assert!(windows.get_all_windows().is_empty());
        assert!(opened.borrow().is_empty());

        let missing = block_on(registry.open_app(AppId::TextEditor)).expect_err("unregistered");
        assert_eq!(
            missing,
            RegistryError::Load(AppLoadError::NotRegistered(AppId::TextEditor))
        );

        let spy = Rc::new(Spy::default());
        registry.register(
            AppId::Minesweeper,
            spy_loader(AppId::Minesweeper, "XMines", &spy),
        );
        block_on(registry.open_app(AppId::Minesweeper)).expect("open after re-register");
        assert!(registry.is_app_running(AppId::Minesweeper));
    }

    #[test]
    fn window_failure_runs_cleanup_and_records_nothing() {
        let (_bus, windows, registry) = registry();
        let spy = Rc::new(Spy::default());
        registry.register(AppId::Xcalc, spy_loader(AppId::Xcalc, "Calculator", &spy));
        windows
            .create_window(WindowConfig::new("xcalc-window", "Squatter"), None)
            .expect("squat");

        let err = block_on(registry.open_app(AppId::Xcalc)).expect_err("duplicate window");
        assert!(matches!(err, RegistryError::Window { .. }));
        assert_eq!(spy.cleanups.get(), 1);
        assert!(!registry.is_app_running(AppId::Xcalc));
    }
}
