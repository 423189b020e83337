//! XTerm desktop app: a small shell over the session's virtual file system.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod shell;

use std::{cell::RefCell, rc::Rc};

use desktop_app_contract::{AppConfig, AppView, DesktopApp};
use leptos::ev::KeyboardEvent;
use leptos::*;
use platform_host::SharedFileSystem;

pub use shell::{TerminalSession, TranscriptLine, MAX_TRANSCRIPT_LINES};

/// Terminal app; each opened window gets a fresh session with its own working directory.
pub struct TerminalApp {
    config: AppConfig,
    fs: SharedFileSystem,
    session: Option<Rc<RefCell<TerminalSession>>>,
}

impl TerminalApp {
    /// Creates the app over the desktop's shared file system.
    pub fn new(config: AppConfig, fs: SharedFileSystem) -> Self {
        Self {
            config,
            fs,
            session: None,
        }
    }

    fn fresh_session(&self) -> Rc<RefCell<TerminalSession>> {
        let tree = self.fs.borrow().clone();
        Rc::new(RefCell::new(TerminalSession::new(tree)))
    }
}

impl DesktopApp for TerminalApp {
    fn config(&self) -> &AppConfig {
        &self.config
    }

    fn init(&mut self) {
        self.session = Some(self.fresh_session());
    }

    fn render(&mut self) -> AppView {
        let session = match &self.session {
            Some(session) => Rc::clone(session),
            None => {
                let session = self.fresh_session();
                self.session = Some(Rc::clone(&session));
                session
            }
        };
        AppView::new(move || {
            view! { <TerminalWindow session=Rc::clone(&session) /> }.into_view()
        })
    }

    fn cleanup(&mut self) {
        self.session = None;
    }
}

#[component]
fn TerminalWindow(session: Rc<RefCell<TerminalSession>>) -> impl IntoView {
    let transcript = create_rw_signal(session.borrow().transcript().to_vec());
    let prompt = create_rw_signal(session.borrow().prompt());
    let input = create_rw_signal(String::new());

    let sync = {
        let session = Rc::clone(&session);
        Rc::new(move || {
            let session = session.borrow();
            transcript.set(session.transcript().to_vec());
            prompt.set(session.prompt());
        })
    };

    let on_keydown = move |ev: KeyboardEvent| match ev.key().as_str() {
        "Enter" => {
            session.borrow_mut().submit(&input.get_untracked());
            input.set(String::new());
            sync();
        }
        "ArrowUp" => {
            ev.prevent_default();
            if let Some(line) = session.borrow_mut().history_previous() {
                input.set(line);
            }
        }
        "ArrowDown" => {
            ev.prevent_default();
            if let Some(line) = session.borrow_mut().history_next() {
                input.set(line);
            }
        }
        _ => {}
    };

    let indexed_lines = move || {
        transcript
            .get()
            .into_iter()
            .enumerate()
            .map(|(idx, line)| {
                let class = match line {
                    TranscriptLine::Error(_) => "terminal-line terminal-error",
                    _ => "terminal-line",
                };
                (idx, class, line.text())
            })
            .collect::<Vec<_>>()
    };

    view! {
        <div class="terminal-app">
            <div class="terminal-output" role="log" aria-live="polite">
                <For each=indexed_lines key=|(idx, _, text)| (*idx, text.clone()) let:line>
                    <div class=line.1>{line.2}</div>
                </For>
            </div>
            <div class="terminal-input-row">
                <span class="terminal-prompt">{move || prompt.get()}</span>
                <input
                    class="terminal-input"
                    type="text"
                    prop:value=move || input.get()
                    on:input=move |ev| input.set(event_target_value(&ev))
                    on:keydown=on_keydown
                    autocomplete="off"
                    spellcheck="false"
                />
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use platform_host::VirtualFileSystem;

    use super::*;
    use desktop_app_contract::AppId;

    #[test]
    fn init_creates_a_session_detached_from_the_shared_cursor() {
        let fs = VirtualFileSystem::default().shared();
        let mut app = TerminalApp::new(AppConfig::fallback(AppId::Terminal), Rc::clone(&fs));
        app.init();
        let session = app.session.clone().expect("session");
        session.borrow_mut().submit("cd /usr");

        assert_eq!(session.borrow().cwd(), "/usr");
        assert_eq!(fs.borrow().current_path(), "/");

        app.cleanup();
        assert!(app.session.is_none());
    }
}
