pub mod app_registry;
pub mod apps;
pub mod components;
pub mod desktop;
pub mod event_bus;
pub mod host;
pub mod icons;
pub mod menus;
pub mod model;
pub mod panel;
mod runtime_context;
pub mod window_manager;

pub use app_registry::{AppInstance, AppRegistry, RegistryError};
pub use components::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext, DesktopShell};
pub use desktop::{DesktopDialog, DesktopManager};
pub use event_bus::{DesktopEvent, EventBus, EventKind, HandlerError, SubscriptionId};
pub use host::DesktopHostContext;
pub use icons::LaunchTarget;
pub use model::*;
pub use window_manager::{
    MemoryWindowSurface, NoopWindowSurface, WindowError, WindowSurface, WindowSystem,
};
