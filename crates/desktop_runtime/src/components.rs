//! Desktop shell UI composition and interaction surfaces.

mod dialogs;
mod menus;
mod panel;
mod window;

use leptos::*;

use self::{
    dialogs::DesktopDialogLayer, menus::DesktopRootMenu, panel::FvwmPanel, window::DesktopWindow,
};

use crate::{icons::DesktopIcon, model::Point};

pub use crate::runtime_context::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext};

#[component]
/// Renders the desktop: icons, windows, root menu, dialogs and the panel.
pub fn DesktopShell() -> impl IntoView {
    let runtime = use_desktop_runtime();

    let on_pointer_move = move |ev: web_sys::PointerEvent| {
        let pointer = pointer_from_pointer_event(&ev);
        let manager = runtime.manager();
        let windows = manager.windows();
        if windows.dragging_window().is_some() {
            windows.update_drag(pointer);
        }
        if manager.update_icon_drag(pointer).is_some() {
            runtime.touch();
        }
    };
    let on_pointer_end = move |_| {
        let manager = runtime.manager();
        manager.windows().end_drag();
        manager.end_icon_drag();
    };

    view! {
        <div
            id="desktop-shell-root"
            class="desktop-shell"
            on:click=move |_| {
                if let Some(menu) = runtime.manager().menu().filter(|menu| menu.is_visible()) {
                    menu.hide();
                }
            }
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_end
            on:pointercancel=on_pointer_end
        >
            <div
                class="desktop"
                on:mousedown=move |_| runtime.with_desktop(|desktop| desktop.select_icon(None))
                on:contextmenu=move |ev: web_sys::MouseEvent| {
                    stop_mouse_event(&ev);
                    if let Some(menu) = runtime.manager().menu() {
                        menu.show(ev.client_x(), ev.client_y());
                    }
                }
            >
                <DesktopIconGrid />
            </div>

            <div class="desktop-window-layer">
                <For
                    each=move || runtime.windows.get()
                    key=|win| win.id().clone()
                    let:win
                >
                    <DesktopWindow window_id=win.id().clone() />
                </For>
            </div>

            <DesktopRootMenu />
            <DesktopDialogLayer />
            <FvwmPanel />
        </div>
    }
}

#[component]
fn DesktopIconGrid() -> impl IntoView {
    let runtime = use_desktop_runtime();

    let on_keydown = move |ev: web_sys::KeyboardEvent| {
        let key = ev.key();
        if key == "Enter" || key == "Delete" {
            ev.prevent_default();
            runtime.handle_key(key);
        }
    };

    view! {
        <div class="desktop-icons" tabindex="0" role="listbox" aria-label="Desktop" on:keydown=on_keydown>
            {move || {
                runtime.revision.get();
                let manager = runtime.manager();
                let selected = manager.selected_icon();
                manager
                    .icons()
                    .into_iter()
                    .map(|icon| {
                        let is_selected = selected == Some(icon.target);
                        view! { <DesktopIconButton icon is_selected /> }
                    })
                    .collect_view()
            }}
        </div>
    }
}

#[component]
fn DesktopIconButton(icon: DesktopIcon, is_selected: bool) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let target = icon.target;
    let style = format!("left:{}px;top:{}px;", icon.position.x, icon.position.y);

    view! {
        <div
            class="icon"
            class:selected=is_selected
            style=style
            role="option"
            aria-selected=is_selected.to_string()
            on:mousedown=move |ev: web_sys::MouseEvent| ev.stop_propagation()
            on:pointerdown=move |ev: web_sys::PointerEvent| {
                if ev.button() != 0 {
                    return;
                }
                let pointer = pointer_from_pointer_event(&ev);
                runtime.with_desktop(|desktop| desktop.begin_icon_drag(target, pointer));
            }
            on:dblclick=move |ev: web_sys::MouseEvent| {
                stop_mouse_event(&ev);
                runtime.open(target);
            }
        >
            <span class="icon-glyph" aria-hidden="true">{icon.icon}</span>
            <span class="icon-label">{icon.label}</span>
        </div>
    }
}

fn stop_mouse_event(ev: &web_sys::MouseEvent) {
    ev.prevent_default();
    ev.stop_propagation();
}

fn pointer_from_pointer_event(ev: &web_sys::PointerEvent) -> Point {
    Point::new(ev.client_x(), ev.client_y())
}
