//! xcalc desktop app: a four-function pocket calculator.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod engine;

use desktop_app_contract::{AppConfig, AppView, DesktopApp};
use engine::{keyboard_action, BinaryOp, CalcAction, CalculatorState};
use leptos::ev::KeyboardEvent;
use leptos::*;

#[derive(Clone, Copy)]
struct CalcKeySpec {
    label: &'static str,
    class_name: &'static str,
    action: CalcAction,
}

const fn calc_key(
    label: &'static str,
    class_name: &'static str,
    action: CalcAction,
) -> CalcKeySpec {
    CalcKeySpec {
        label,
        class_name,
        action,
    }
}

const CALC_KEYS: [CalcKeySpec; 20] = [
    calc_key("C", "util", CalcAction::ClearAll),
    calc_key("CE", "util", CalcAction::ClearEntry),
    calc_key("%", "op", CalcAction::Binary(BinaryOp::Modulo)),
    calc_key("÷", "op", CalcAction::Binary(BinaryOp::Divide)),
    calc_key("7", "digit", CalcAction::Digit('7')),
    calc_key("8", "digit", CalcAction::Digit('8')),
    calc_key("9", "digit", CalcAction::Digit('9')),
    calc_key("×", "op", CalcAction::Binary(BinaryOp::Multiply)),
    calc_key("4", "digit", CalcAction::Digit('4')),
    calc_key("5", "digit", CalcAction::Digit('5')),
    calc_key("6", "digit", CalcAction::Digit('6')),
    calc_key("−", "op", CalcAction::Binary(BinaryOp::Subtract)),
    calc_key("1", "digit", CalcAction::Digit('1')),
    calc_key("2", "digit", CalcAction::Digit('2')),
    calc_key("3", "digit", CalcAction::Digit('3')),
    calc_key("+", "op", CalcAction::Binary(BinaryOp::Add)),
    calc_key("0", "digit", CalcAction::Digit('0')),
    calc_key(".", "digit", CalcAction::Decimal),
    calc_key("±", "util", CalcAction::ToggleSign),
    calc_key("=", "equals", CalcAction::Equals),
];

/// Calculator app. State lives in the window's reactive scope.
pub struct CalculatorApp {
    config: AppConfig,
}

impl CalculatorApp {
    /// Creates the calculator.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

impl DesktopApp for CalculatorApp {
    fn config(&self) -> &AppConfig {
        &self.config
    }

    fn init(&mut self) {}

    fn render(&mut self) -> AppView {
        AppView::new(|| view! { <CalculatorWindow /> }.into_view())
    }

    fn cleanup(&mut self) {}
}

#[component]
fn CalculatorWindow() -> impl IntoView {
    let calc = create_rw_signal(CalculatorState::default());

    let on_keydown = move |ev: KeyboardEvent| {
        if ev.ctrl_key() || ev.meta_key() || ev.alt_key() {
            return;
        }

        if let Some(action) = keyboard_action(&ev.key()) {
            ev.prevent_default();
            calc.update(|state| state.apply(action));
        }
    };

    view! {
        <div class="xcalc-app" tabindex="0" on:keydown=on_keydown>
            <div class="calc-display-panel">
                <div class="calc-pending" aria-live="off">{move || calc.with(|s| s.pending_text())}</div>
                <div class="calc-display" role="status" aria-live="polite">
                    {move || calc.with(|s| s.display_text())}
                </div>
            </div>
            <div class="calc-buttons" role="group" aria-label="Calculator keys">
                <For each=move || CALC_KEYS.to_vec() key=|spec| spec.label let:spec>
                    <button
                        type="button"
                        class=format!("calc-button {}", spec.class_name)
                        on:click=move |_| calc.update(|state| state.apply(spec.action))
                    >
                        {spec.label}
                    </button>
                </For>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::AppId;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn keypad_matches_the_xcalc_layout() {
        let rows: Vec<Vec<&str>> = CALC_KEYS
            .chunks(4)
            .map(|row| row.iter().map(|spec| spec.label).collect())
            .collect();
        assert_eq!(
            rows,
            vec![
                vec!["C", "CE", "%", "÷"],
                vec!["7", "8", "9", "×"],
                vec!["4", "5", "6", "−"],
                vec!["1", "2", "3", "+"],
                vec!["0", ".", "±", "="],
            ]
        );
    }

    #[test]
    fn keypad_drives_the_engine() {
        let mut state = CalculatorState::default();
        for label in ["1", "2", "÷", "4", "="] {
            let spec = CALC_KEYS
                .iter()
                .find(|spec| spec.label == label)
                .expect("key exists");
            state.apply(spec.action);
        }
        assert_eq!(state.display_text(), "3");

        let app = CalculatorApp::new(AppConfig::fallback(AppId::Xcalc));
        assert_eq!(app.config().id, AppId::Xcalc);
    }
}
