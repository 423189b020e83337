use super::*;
use crate::menus::MenuEntry;

#[component]
pub(super) fn DesktopRootMenu() -> impl IntoView {
    let runtime = use_desktop_runtime();

    let placement = move || {
        runtime.revision.get();
        runtime.manager().menu().and_then(|menu| menu.position())
    };

    view! {
        <Show when=move || placement().is_some() fallback=|| ()>
            {move || {
                let Some(position) = placement() else {
                    return ().into_view();
                };
                let entries = runtime
                    .manager()
                    .menu()
                    .map(|menu| menu.entries())
                    .unwrap_or_default();
                view! {
                    <div
                        id="desktop-menu"
                        class="desktop-menu"
                        role="menu"
                        style=format!("left:{}px;top:{}px;", position.x, position.y)
                        on:click=move |ev: web_sys::MouseEvent| ev.stop_propagation()
                        on:contextmenu=move |ev: web_sys::MouseEvent| ev.prevent_default()
                    >
                        {entries
                            .into_iter()
                            .enumerate()
                            .map(|(index, entry)| view! { <DesktopMenuItem index entry /> })
                            .collect_view()}
                    </div>
                }
                .into_view()
            }}
        </Show>
    }
}

#[component]
fn DesktopMenuItem(index: usize, entry: MenuEntry) -> impl IntoView {
    let runtime = use_desktop_runtime();

    if entry.is_separator() {
        return view! { <div class="menu-separator" role="separator"></div> }.into_view();
    }

    let activate = move |_| {
        let command = runtime
            .with_desktop(|desktop| desktop.menu().and_then(|menu| menu.activate(index)));
        if let Some(command) = command {
            runtime.run_menu_command(command);
        }
    };

    view! {
        <button class="menu-item" role="menuitem" on:click=activate>
            <span class="menu-icon" aria-hidden="true">{entry.icon().to_string()}</span>
            <span class="menu-label">{entry.label().to_string()}</span>
        </button>
    }
    .into_view()
}
