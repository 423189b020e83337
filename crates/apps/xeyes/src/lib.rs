//! XEyes desktop app: two eyes whose pupils follow the pointer anywhere on the page.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod eyes;

use desktop_app_contract::{AppConfig, AppView, DesktopApp};
use eyes::{pupil_offset, Offset};
use leptos::*;

/// XEyes app. Pointer tracking is scoped to the rendered window.
pub struct XeyesApp {
    config: AppConfig,
}

impl XeyesApp {
    /// Creates the app.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

impl DesktopApp for XeyesApp {
    fn config(&self) -> &AppConfig {
        &self.config
    }

    fn init(&mut self) {}

    fn render(&mut self) -> AppView {
        AppView::new(|| view! { <XeyesWindow /> }.into_view())
    }

    fn cleanup(&mut self) {}
}

fn eye_center(eye: NodeRef<html::Div>) -> Option<(f64, f64)> {
    let rect = eye.get_untracked()?.get_bounding_client_rect();
    Some((
        rect.left() + rect.width() / 2.0,
        rect.top() + rect.height() / 2.0,
    ))
}

#[component]
fn XeyesWindow() -> impl IntoView {
    let eyes = [NodeRef::<html::Div>::new(), NodeRef::<html::Div>::new()];
    let pupils = create_rw_signal([Offset::default(); 2]);

    let tracker = window_event_listener(ev::mousemove, move |ev| {
        let pointer = (f64::from(ev.client_x()), f64::from(ev.client_y()));
        let mut next = [Offset::default(); 2];
        for (slot, eye) in next.iter_mut().zip(eyes) {
            if let Some(center) = eye_center(eye) {
                *slot = pupil_offset(center, pointer);
            }
        }
        pupils.set(next);
    });
    on_cleanup(move || tracker.remove());

    view! {
        <div class="xeyes-app">
            <div class="xeyes-container">
                {eyes
                    .into_iter()
                    .enumerate()
                    .map(|(index, eye)| {
                        view! {
                            <div class="eye" node_ref=eye>
                                <div
                                    class="pupil"
                                    id=format!("pupil-{index}")
                                    style=move || {
                                        let offset = pupils.with(|p| p[index]);
                                        format!("transform:{};", offset.transform())
                                    }
                                ></div>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}
