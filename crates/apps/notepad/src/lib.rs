//! Text editor desktop app: a plain text buffer saved to the host document store.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod editor;

use std::{cell::RefCell, rc::Rc, time::Duration};

use desktop_app_contract::{AppConfig, AppView, DesktopApp};
use leptos::*;
use platform_host::{next_monotonic_timestamp_ms, DocumentStore};

pub use editor::{display_name, EditorBuffer, NOTHING_TO_SAVE, WELCOME_TEXT};

const NOTICE_DURATION: Duration = Duration::from_secs(3);

/// Text editor app.
pub struct TextEditorApp {
    config: AppConfig,
    documents: Rc<dyn DocumentStore>,
    buffer: Option<Rc<RefCell<EditorBuffer>>>,
}

impl TextEditorApp {
    /// Creates the editor over the host document store.
    pub fn new(config: AppConfig, documents: Rc<dyn DocumentStore>) -> Self {
        Self {
            config,
            documents,
            buffer: None,
        }
    }

    fn buffer(&mut self) -> Rc<RefCell<EditorBuffer>> {
        Rc::clone(self.buffer.get_or_insert_with(Default::default))
    }
}

impl DesktopApp for TextEditorApp {
    fn config(&self) -> &AppConfig {
        &self.config
    }

    fn init(&mut self) {
        self.buffer = Some(Rc::default());
    }

    fn render(&mut self) -> AppView {
        let buffer = self.buffer();
        let documents = Rc::clone(&self.documents);
        AppView::new(move || {
            view! {
                <TextEditorWindow buffer=Rc::clone(&buffer) documents=Rc::clone(&documents) />
            }
            .into_view()
        })
    }

    fn cleanup(&mut self) {
        self.buffer = None;
    }
}

#[component]
fn TextEditorWindow(
    buffer: Rc<RefCell<EditorBuffer>>,
    documents: Rc<dyn DocumentStore>,
) -> impl IntoView {
    let text = create_rw_signal(buffer.borrow().text().to_string());
    let notice = create_rw_signal::<Option<String>>(None);

    let show_notice = move |message: String| {
        notice.set(Some(message.clone()));
        set_timeout(
            move || {
                if notice.get_untracked().as_deref() == Some(message.as_str()) {
                    notice.set(None);
                }
            },
            NOTICE_DURATION,
        );
    };

    let on_save = {
        let buffer = Rc::clone(&buffer);
        move |_| {
            let snapshot = buffer.borrow().clone();
            let documents = Rc::clone(&documents);
            spawn_local(async move {
                let message = snapshot
                    .save(documents.as_ref(), next_monotonic_timestamp_ms())
                    .await;
                show_notice(message);
            });
        }
    };

    let on_clear = {
        let buffer = Rc::clone(&buffer);
        move |_| {
            buffer.borrow_mut().clear();
            text.set(String::new());
        }
    };

    let on_input = move |event: ev::Event| {
        let value = event_target_value(&event);
        buffer.borrow_mut().set_text(value.clone());
        text.set(value);
    };

    let counts = move || {
        text.with(|t| {
            let buffer = EditorBuffer::new(t.as_str());
            format!("Lines: {}  Chars: {}", buffer.line_count(), buffer.char_count())
        })
    };

    view! {
        <div class="app-shell text-editor-app">
            <div class="app-toolbar editor-toolbar">
                <button type="button" class="editor-button" on:click=on_save>"💾 Save"</button>
                <button type="button" class="editor-button" on:click=on_clear>"🗑️ Clear"</button>
            </div>
            <textarea
                class="editor-textarea"
                placeholder="Start typing your text here..."
                prop:value=move || text.get()
                on:input=on_input
                spellcheck="false"
                aria-label="Text editor document"
            />
            <div class="app-statusbar">
                <span>{counts}</span>
                <span class="editor-message" role="status">
                    {move || notice.get().unwrap_or_default()}
                </span>
            </div>
        </div>
    }
}
