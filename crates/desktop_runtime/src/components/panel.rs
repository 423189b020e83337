use super::*;
use crate::panel::{clock_label, PanelButton, VIRTUAL_DESKTOPS};
use crate::runtime_context::use_wall_clock;

const MIDDLE_BUTTON: i16 = 1;

#[component]
pub(super) fn FvwmPanel() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let now = use_wall_clock();

    let toggle_menu = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        if let Some(panel) = runtime.manager().panel() {
            panel.toggle_start_menu();
        }
    };

    view! {
        <footer class="fvwm-panel" role="toolbar" aria-label="Panel">
            <button class="panel-menu-button" aria-label="Applications" on:click=toggle_menu>
                "🐧"
            </button>
            <div class="panel-pager" role="group" aria-label="Virtual desktops">
                {move || {
                    runtime.revision.get();
                    let current = runtime
                        .manager()
                        .panel()
                        .map(|panel| panel.current_desktop())
                        .unwrap_or_default();
                    (0..VIRTUAL_DESKTOPS)
                        .map(|desktop| {
                            view! {
                                <button
                                    class="pager-desk"
                                    class:active={desktop == current}
                                    aria-label=format!("Desktop {}", desktop + 1)
                                    on:click=move |_| {
                                        if let Some(panel) = runtime.manager().panel() {
                                            panel.switch_desktop(desktop);
                                        }
                                    }
                                >
                                    {desktop + 1}
                                </button>
                            }
                        })
                        .collect_view()
                }}
            </div>
            <div class="panel-tasks" role="group" aria-label="Running applications">
                {move || {
                    runtime.revision.get();
                    runtime
                        .manager()
                        .panel()
                        .map(|panel| panel.buttons())
                        .unwrap_or_default()
                        .into_iter()
                        .map(|button| view! { <PanelTaskButton button /> })
                        .collect_view()
                }}
            </div>
            <div class="panel-clock" aria-live="off">
                {move || {
                    let (date, time) = clock_label(now.get());
                    view! {
                        <span class="panel-clock-time">{time}</span>
                        <span class="panel-clock-date">{date}</span>
                    }
                }}
            </div>
        </footer>
    }
}

#[component]
fn PanelTaskButton(button: PanelButton) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let window_id = store_value(button.window_id.clone());

    view! {
        <button
            class="panel-task"
            class:active=button.is_active
            class:minimized=button.is_minimized
            title=button.label.clone()
            on:click=move |_| {
                if let Some(panel) = runtime.manager().panel() {
                    panel.click(&window_id.get_value());
                }
            }
            on:auxclick=move |ev: web_sys::MouseEvent| {
                if ev.button() != MIDDLE_BUTTON {
                    return;
                }
                ev.prevent_default();
                if let Some(panel) = runtime.manager().panel() {
                    panel.middle_click(&window_id.get_value());
                }
            }
        >
            {button.label}
        </button>
    }
}
