use super::*;

#[component]
pub(super) fn DesktopDialogLayer() -> impl IntoView {
    let runtime = use_desktop_runtime();

    let dialog = move || {
        runtime.revision.get();
        runtime.manager().dialog()
    };

    view! {
        <Show when=move || dialog().is_some() fallback=|| ()>
            {move || {
                let Some(dialog) = dialog() else {
                    return ().into_view();
                };
                view! {
                    <div class="x11-dialog-backdrop">
                        <div class="x11-dialog" role="alertdialog" aria-modal="true" aria-label=dialog.title()>
                            <div class="x11-dialog-title">{dialog.title()}</div>
                            <div class="x11-dialog-message">
                                {dialog
                                    .lines()
                                    .into_iter()
                                    .map(|line| view! { <p>{line}</p> })
                                    .collect_view()}
                            </div>
                            <div class="x11-dialog-buttons">
                                <button on:click=move |_| {
                                    runtime.with_desktop(|desktop| desktop.dismiss_dialog())
                                }>
                                    "OK"
                                </button>
                            </div>
                        </div>
                    </div>
                }
                .into_view()
            }}
        </Show>
    }
}
