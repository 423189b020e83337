//! Minesweeper board: mine placement, flood reveal, flags, and win/loss detection.

use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Board height for the standard game.
pub const ROWS: usize = 9;
/// Board width for the standard game.
pub const COLS: usize = 9;
/// Mines hidden on the standard board.
pub const MINES: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// One square of the board.
pub struct Cell {
    /// Whether a mine is hidden here.
    pub is_mine: bool,
    /// Whether the square has been uncovered.
    pub is_revealed: bool,
    /// Whether the player marked the square.
    pub is_flagged: bool,
    /// Mines in the eight neighbouring squares.
    pub adjacent_mines: u8,
}

impl Cell {
    /// Glyph drawn on the square.
    pub fn label(&self) -> String {
        match (self.is_revealed, self.is_flagged) {
            (true, _) if self.is_mine => "💣".to_string(),
            (true, _) if self.adjacent_mines > 0 => self.adjacent_mines.to_string(),
            (true, _) => String::new(),
            (false, true) => "🚩".to_string(),
            (false, false) => String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Game progress.
pub enum GameState {
    /// Moves are accepted.
    Playing,
    /// Every safe square is uncovered.
    Won,
    /// A mine was uncovered.
    Lost,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A rectangular minefield.
pub struct Board {
    rows: usize,
    cols: usize,
    mines: usize,
    cells: Vec<Cell>,
    state: GameState,
    flags_used: usize,
}

impl Board {
    /// Creates the standard 9x9 board with mines placed from `seed`.
    pub fn new(seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut mines = Vec::with_capacity(MINES);
        while mines.len() < MINES {
            let position = (rng.random_range(0..ROWS), rng.random_range(0..COLS));
            if !mines.contains(&position) {
                mines.push(position);
            }
        }
        Self::with_mines(ROWS, COLS, &mines)
    }

    /// Creates a board with mines at fixed `(row, col)` positions; out-of-range positions
    /// are ignored.
    pub fn with_mines(rows: usize, cols: usize, mines: &[(usize, usize)]) -> Self {
        let mut board = Self {
            rows,
            cols,
            mines: 0,
            cells: vec![Cell::default(); rows * cols],
            state: GameState::Playing,
            flags_used: 0,
        };
        for &(row, col) in mines {
            if let Some(idx) = board.index(row, col) {
                if !board.cells[idx].is_mine {
                    board.cells[idx].is_mine = true;
                    board.mines += 1;
                }
            }
        }
        for row in 0..rows {
            for col in 0..cols {
                let count = board
                    .neighbours(row, col)
                    .filter(|&(r, c)| board.cells[r * cols + c].is_mine)
                    .count();
                board.cells[row * cols + col].adjacent_mines = count as u8;
            }
        }
        board
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the square at `(row, col)`.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.index(row, col).map(|idx| &self.cells[idx])
    }

    /// Current game progress.
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Mines minus flags placed; negative when the player over-flags.
    pub fn mines_remaining(&self) -> i64 {
        self.mines as i64 - self.flags_used as i64
    }

    /// Status bar text.
    pub fn status_text(&self) -> String {
        let remaining = format!("Mines: {}", self.mines_remaining());
        match self.state {
            GameState::Playing => remaining,
            GameState::Won => format!("{remaining} - 🎉 You Win!"),
            GameState::Lost => format!("{remaining} - 💥 Game Over"),
        }
    }

    /// Uncovers a square. Blank squares open their neighbourhood; a mine ends the game.
    pub fn reveal(&mut self, row: usize, col: usize) {
        if self.state != GameState::Playing {
            return;
        }
        let Some(start) = self.index(row, col) else {
            return;
        };
        if self.cells[start].is_flagged || self.cells[start].is_revealed {
            return;
        }
        if self.cells[start].is_mine {
            self.state = GameState::Lost;
            for cell in self.cells.iter_mut().filter(|cell| cell.is_mine) {
                cell.is_revealed = true;
            }
            return;
        }

        let mut pending = vec![(row, col)];
        while let Some((r, c)) = pending.pop() {
            let idx = r * self.cols + c;
            let cell = &mut self.cells[idx];
            if cell.is_revealed || cell.is_flagged || cell.is_mine {
                continue;
            }
            cell.is_revealed = true;
            if cell.adjacent_mines == 0 {
                pending.extend(self.neighbours(r, c));
            }
        }

        let safe_revealed = self
            .cells
            .iter()
            .filter(|cell| cell.is_revealed && !cell.is_mine)
            .count();
        if safe_revealed == self.cells.len() - self.mines {
            self.state = GameState::Won;
        }
    }

    /// Places or removes a flag on a covered square.
    pub fn toggle_flag(&mut self, row: usize, col: usize) {
        if self.state != GameState::Playing {
            return;
        }
        let Some(idx) = self.index(row, col) else {
            return;
        };
        let cell = &mut self.cells[idx];
        if cell.is_revealed {
            return;
        }
        cell.is_flagged = !cell.is_flagged;
        if cell.is_flagged {
            self.flags_used += 1;
        } else {
            self.flags_used -= 1;
        }
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    fn neighbours(&self, row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> {
        let (rows, cols) = (self.rows, self.cols);
        (row.saturating_sub(1)..=(row + 1).min(rows - 1))
            .flat_map(move |r| {
                (col.saturating_sub(1)..=(col + 1).min(cols - 1)).map(move |c| (r, c))
            })
            .filter(move |&(r, c)| (r, c) != (row, col))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn revealed(board: &Board) -> usize {
        (0..board.rows())
            .flat_map(|r| (0..board.cols()).map(move |c| (r, c)))
            .filter(|&(r, c)| board.cell(r, c).is_some_and(|cell| cell.is_revealed))
            .count()
    }

    #[test]
    fn seeded_board_places_exactly_ten_mines() {
        let board = Board::new(42);
        let mines = (0..ROWS)
            .flat_map(|r| (0..COLS).map(move |c| (r, c)))
            .filter(|&(r, c)| board.cell(r, c).is_some_and(|cell| cell.is_mine))
            .count();
        assert_eq!(mines, MINES);
        assert_eq!(board.status_text(), "Mines: 10");
        assert_eq!(Board::new(42), board);
    }

    #[test]
    fn adjacent_counts_cover_all_neighbours() {
        let board = Board::with_mines(3, 3, &[(0, 0), (2, 2)]);
        assert_eq!(board.cell(1, 1).map(|c| c.adjacent_mines), Some(2));
        assert_eq!(board.cell(0, 2).map(|c| c.adjacent_mines), Some(0));
        assert_eq!(board.cell(0, 1).map(|c| c.adjacent_mines), Some(1));
    }

    #[test]
    fn blank_square_flood_reveals_and_wins() {
        let mut board = Board::with_mines(4, 4, &[(3, 3)]);
        board.reveal(0, 0);
        assert_eq!(revealed(&board), 15);
        assert_eq!(board.state(), GameState::Won);
        assert_eq!(board.status_text(), "Mines: 1 - 🎉 You Win!");
    }

    #[test]
    fn flood_stops_at_flags_and_numbers() {
        let mut board = Board::with_mines(3, 5, &[(1, 4)]);
        board.toggle_flag(0, 0);
        board.reveal(2, 0);
        assert!(board.cell(0, 0).is_some_and(|c| !c.is_revealed));
        assert_eq!(board.cell(0, 3).map(Cell::label), Some("1".to_string()));
        assert!(board.cell(0, 3).is_some_and(|c| c.is_revealed));
        assert_eq!(board.state(), GameState::Playing);

        board.reveal(0, 0);
        assert!(board.cell(0, 0).is_some_and(|c| !c.is_revealed));
    }

    #[test]
    fn mine_ends_the_game_and_shows_every_mine() {
        let mut board = Board::with_mines(3, 3, &[(0, 0), (2, 2)]);
        board.reveal(0, 0);
        assert_eq!(board.state(), GameState::Lost);
        assert_eq!(board.cell(2, 2).map(Cell::label), Some("💣".to_string()));
        assert_eq!(board.status_text(), "Mines: 2 - 💥 Game Over");

        board.toggle_flag(1, 1);
        board.reveal(1, 1);
        assert_eq!(revealed(&board), 2);
    }

    #[test]
    fn flags_adjust_the_mine_counter() {
        let mut board = Board::with_mines(2, 2, &[(0, 0)]);
        board.toggle_flag(1, 1);
        board.toggle_flag(0, 1);
        assert_eq!(board.mines_remaining(), -1);
        assert_eq!(board.cell(1, 1).map(Cell::label), Some("🚩".to_string()));
        board.toggle_flag(1, 1);
        assert_eq!(board.mines_remaining(), 0);
    }
}
