//! XMines desktop app: a 9x9 minesweeper game.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod board;

use std::{cell::RefCell, rc::Rc};

use desktop_app_contract::{AppConfig, AppView, DesktopApp};
use leptos::ev::MouseEvent;
use leptos::*;
use platform_host::next_monotonic_timestamp_ms;

pub use board::{Board, Cell, GameState, COLS, MINES, ROWS};

/// Minesweeper app; each window plays its own board.
pub struct MinesweeperApp {
    config: AppConfig,
    board: Option<Rc<RefCell<Board>>>,
}

impl MinesweeperApp {
    /// Creates the game.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            board: None,
        }
    }

    fn board(&mut self) -> Rc<RefCell<Board>> {
        Rc::clone(
            self.board
                .get_or_insert_with(|| Rc::new(RefCell::new(fresh_board()))),
        )
    }
}

fn fresh_board() -> Board {
    Board::new(next_monotonic_timestamp_ms())
}

impl DesktopApp for MinesweeperApp {
    fn config(&self) -> &AppConfig {
        &self.config
    }

    fn init(&mut self) {
        self.board = Some(Rc::new(RefCell::new(fresh_board())));
    }

    fn render(&mut self) -> AppView {
        let board = self.board();
        AppView::new(move || view! { <MinesweeperWindow board=Rc::clone(&board) /> }.into_view())
    }

    fn cleanup(&mut self) {
        self.board = None;
    }
}

#[component]
fn MinesweeperWindow(board: Rc<RefCell<Board>>) -> impl IntoView {
    let snapshot = create_rw_signal(board.borrow().clone());

    let act: Rc<dyn Fn(&dyn Fn(&mut Board))> = {
        let board = Rc::clone(&board);
        Rc::new(move |action: &dyn Fn(&mut Board)| {
            let mut board = board.borrow_mut();
            action(&mut *board);
            snapshot.set(board.clone());
        })
    };

    let new_game = {
        let act = Rc::clone(&act);
        move |_| act(&|board: &mut Board| *board = fresh_board())
    };

    let squares = move || {
        snapshot.with(|board| {
            (0..board.rows())
                .flat_map(|row| (0..board.cols()).map(move |col| (row, col)))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="minesweeper-app">
            <div class="ms-header">
                <button type="button" class="ms-button" on:click=new_game>"🙂 New Game"</button>
            </div>
            <div
                class="ms-board"
                style=move || snapshot.with(|b| format!("grid-template-columns: repeat({}, 1fr)", b.cols()))
            >
                <For each=squares key=|square| *square let:square>
                    <Square row=square.0 col=square.1 snapshot=snapshot act=Rc::clone(&act) />
                </For>
            </div>
            <div class="ms-status" role="status">{move || snapshot.with(Board::status_text)}</div>
        </div>
    }
}

#[component]
fn Square(
    row: usize,
    col: usize,
    snapshot: RwSignal<Board>,
    act: Rc<dyn Fn(&dyn Fn(&mut Board))>,
) -> impl IntoView {
    let cell = move || snapshot.with(|board| board.cell(row, col).copied().unwrap_or_default());
    let class = move || {
        let cell = cell();
        let mut class = String::from("ms-cell");
        if cell.is_revealed {
            class.push_str(" revealed");
            if cell.is_mine {
                class.push_str(" mine");
            } else if cell.adjacent_mines > 0 {
                class.push_str(&format!(" number-{}", cell.adjacent_mines));
            }
        } else if cell.is_flagged {
            class.push_str(" flagged");
        }
        class
    };

    let reveal = {
        let act = Rc::clone(&act);
        move |_| act(&|board: &mut Board| board.reveal(row, col))
    };
    let flag = move |ev: MouseEvent| {
        ev.prevent_default();
        act(&|board: &mut Board| board.toggle_flag(row, col));
    };

    view! {
        <div class=class on:click=reveal on:contextmenu=flag>
            {move || cell().label()}
        </div>
    }
}
