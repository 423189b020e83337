use super::*;
use crate::model::WindowId;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

#[cfg(target_arch = "wasm32")]
fn try_set_pointer_capture(ev: &web_sys::PointerEvent) {
    if let Some(target) = ev.current_target() {
        if let Ok(element) = target.dyn_into::<web_sys::Element>() {
            let _ = element.set_pointer_capture(ev.pointer_id());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn try_set_pointer_capture(_: &web_sys::PointerEvent) {}

#[component]
pub(super) fn DesktopWindow(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let id = store_value(window_id);

    let window = Signal::derive(move || {
        let window_id = id.get_value();
        runtime
            .windows
            .get()
            .into_iter()
            .find(|w| w.id() == &window_id)
    });

    // App content is rendered once; state changes only restyle the frame.
    let content = runtime.windows.with_untracked(|windows| {
        let window_id = id.get_value();
        windows
            .iter()
            .find(|w| w.id() == &window_id)
            .and_then(|w| w.content.clone())
    });
    let body = content.map(|content| content.render());

    let focus = move |_: web_sys::PointerEvent| {
        let focused = window.get_untracked().is_some_and(|w| w.state.is_focused);
        if !focused {
            runtime.manager().windows().focus_window(&id.get_value());
        }
    };
    let minimize = move |ev: web_sys::MouseEvent| {
        stop_mouse_event(&ev);
        runtime.manager().windows().minimize_window(&id.get_value());
    };
    let close = move |ev: web_sys::MouseEvent| {
        stop_mouse_event(&ev);
        runtime.manager().windows().close_window(&id.get_value());
    };
    let begin_move = move |ev: web_sys::PointerEvent| {
        if ev.button() != 0 {
            return;
        }
        try_set_pointer_capture(&ev);
        ev.prevent_default();
        ev.stop_propagation();
        runtime
            .manager()
            .windows()
            .begin_drag(&id.get_value(), pointer_from_pointer_event(&ev));
    };

    let frame_style = move || {
        window
            .get()
            .map(|win| {
                format!(
                    "left:{}px;top:{}px;width:{}px;height:{}px;z-index:{};",
                    win.state.position.x,
                    win.state.position.y,
                    win.state.size.width,
                    win.state.size.height,
                    win.state.z_index
                )
            })
            .unwrap_or_default()
    };
    let frame_class = move || {
        let Some(win) = window.get() else {
            return "window".to_string();
        };
        let mut class = String::from("window");
        if let Some(extra) = &win.config.class_name {
            class.push(' ');
            class.push_str(extra);
        }
        if win.state.is_focused {
            class.push_str(" focused");
        }
        if win.state.is_minimized {
            class.push_str(" minimized");
        }
        class
    };
    let config = window.get_untracked().map(|win| win.config);
    let title = config.as_ref().map(|c| c.title.clone()).unwrap_or_default();
    let minimizable = config.as_ref().is_some_and(|c| c.minimizable);
    let closable = config.as_ref().is_some_and(|c| c.closable);

    view! {
        <section
            id=move || id.get_value().to_string()
            class=frame_class
            style=frame_style
            on:pointerdown=focus
            role="dialog"
            aria-label=title.clone()
        >
            <header class="window-titlebar" on:pointerdown=begin_move>
                <span class="window-title">{title}</span>
                <div class="window-controls">
                    <Show when=move || minimizable fallback=|| ()>
                        <button
                            class="window-control minimize"
                            aria-label="Minimize window"
                            on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
                            on:click=minimize
                        >
                            "_"
                        </button>
                    </Show>
                    <Show when=move || closable fallback=|| ()>
                        <button
                            class="window-control close"
                            aria-label="Close window"
                            on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
                            on:click=close
                        >
                            "×"
                        </button>
                    </Show>
                </div>
            </header>
            <div class="window-content">{body}</div>
        </section>
    }
}
