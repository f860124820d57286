use std::fmt;

use arrayvec::ArrayVec;

use crate::IllegalMoveError;

/// Side length of the square board.
pub const BOARD_SIZE: usize = 8;
/// Total number of cells.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Longest walk in a single direction before hitting the board edge; the
/// capture scan may buffer this many opponent discs before it learns
/// whether the run is terminated.
const MAX_RUN: usize = BOARD_SIZE - 1;

/// The 8 capture directions as (dx, dy) offsets.
const DIRECTIONS: [(isize, isize); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
];

/// One of the two disc colors. Black always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    Black,
    White,
}

impl Player {
    #[must_use]
    pub fn opponent(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// Signed encoding used by the network input transform:
    /// Black = +1.0, White = -1.0.
    #[must_use]
    pub fn signed(self) -> f64 {
        match self {
            Player::Black => 1.0,
            Player::White => -1.0,
        }
    }
}

/// A cell index on the board, guaranteed to be within `0..CELL_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(u8);

impl Position {
    #[must_use]
    pub fn new(index: usize) -> Option<Self> {
        (index < CELL_COUNT).then(|| Self(u8::try_from(index).unwrap()))
    }

    #[must_use]
    pub fn from_xy(x: usize, y: usize) -> Option<Self> {
        (x < BOARD_SIZE && y < BOARD_SIZE).then(|| Self(u8::try_from(x + y * BOARD_SIZE).unwrap()))
    }

    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    #[must_use]
    pub fn x(self) -> usize {
        self.index() % BOARD_SIZE
    }

    #[must_use]
    pub fn y(self) -> usize {
        self.index() / BOARD_SIZE
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let column = char::from(b'a' + u8::try_from(self.x()).unwrap());
        write!(f, "{column}{}", self.y() + 1)
    }
}

/// List of legal moves for one player. Never longer than the board itself.
pub type MoveList = ArrayVec<Position, CELL_COUNT>;

/// The playing surface: a flat array of cells, each empty or holding a disc.
///
/// `Board` knows nothing about whose turn it is; turn alternation, passing
/// and terminal detection live in [`GameSession`](crate::GameSession). All
/// mutation goes through [`Board::apply_move`], which validates the full
/// capture rule before touching any cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Player>; CELL_COUNT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates the standard starting position: two discs per color on the
    /// four center cells, same-color discs diagonal to each other.
    #[must_use]
    pub fn new() -> Self {
        let mut cells = [None; CELL_COUNT];
        let center = BOARD_SIZE / 2;
        cells[(center - 1) + (center - 1) * BOARD_SIZE] = Some(Player::White);
        cells[center + center * BOARD_SIZE] = Some(Player::White);
        cells[center + (center - 1) * BOARD_SIZE] = Some(Player::Black);
        cells[(center - 1) + center * BOARD_SIZE] = Some(Player::Black);
        Self { cells }
    }

    #[must_use]
    pub fn cell(&self, pos: Position) -> Option<Player> {
        self.cells[pos.index()]
    }

    /// Iterates over all cells in index order.
    pub fn cells(&self) -> impl Iterator<Item = Option<Player>> + '_ {
        self.cells.iter().copied()
    }

    /// Returns `(black, white)` disc counts.
    #[must_use]
    pub fn counts(&self) -> (usize, usize) {
        let black = self.cells.iter().filter(|c| **c == Some(Player::Black)).count();
        let white = self.cells.iter().filter(|c| **c == Some(Player::White)).count();
        (black, white)
    }

    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Walks from `pos` in direction `(dx, dy)` and returns the run of
    /// opponent discs that `player` would capture by moving at `pos`.
    ///
    /// The run is non-empty only when it is a contiguous sequence of
    /// opponent discs terminated by one of `player`'s own discs. A run that
    /// hits an empty cell or the board edge captures nothing.
    #[expect(clippy::cast_possible_wrap)]
    fn capture_run(&self, pos: Position, dx: isize, dy: isize, player: Player) -> ArrayVec<Position, MAX_RUN> {
        let mut run = ArrayVec::new();
        let mut x = pos.x() as isize + dx;
        let mut y = pos.y() as isize + dy;
        loop {
            let (Ok(ux), Ok(uy)) = (usize::try_from(x), usize::try_from(y)) else {
                return ArrayVec::new();
            };
            let Some(next) = Position::from_xy(ux, uy) else {
                return ArrayVec::new();
            };
            match self.cell(next) {
                Some(disc) if disc == player => return run,
                Some(_) => run.push(next),
                None => return ArrayVec::new(),
            }
            x += dx;
            y += dy;
        }
    }

    /// Checks whether `player` may legally move at `pos`.
    #[must_use]
    pub fn is_legal_move(&self, pos: Position, player: Player) -> bool {
        self.cell(pos).is_none()
            && DIRECTIONS
                .iter()
                .any(|&(dx, dy)| !self.capture_run(pos, dx, dy, player).is_empty())
    }

    /// Enumerates every cell where `player` has a legal capturing move,
    /// in index order.
    #[must_use]
    pub fn legal_moves(&self, player: Player) -> MoveList {
        (0..CELL_COUNT)
            .map(|i| Position::new(i).unwrap())
            .filter(|&pos| self.is_legal_move(pos, player))
            .collect()
    }

    /// Places a disc for `player` at `pos` and flips every captured run.
    ///
    /// The move is validated in full before any cell changes: an occupied
    /// target or a move that captures nothing fails without mutating the
    /// board. Returns the number of flipped discs (always >= 1 on success).
    pub fn apply_move(&mut self, pos: Position, player: Player) -> Result<usize, IllegalMoveError> {
        if self.cell(pos).is_some() {
            return Err(IllegalMoveError::CellOccupied);
        }
        let mut captured: ArrayVec<Position, CELL_COUNT> = ArrayVec::new();
        for &(dx, dy) in &DIRECTIONS {
            captured.extend(self.capture_run(pos, dx, dy, player));
        }
        if captured.is_empty() {
            return Err(IllegalMoveError::NoCapture);
        }
        self.cells[pos.index()] = Some(player);
        for flip in &captured {
            debug_assert_eq!(self.cell(*flip), Some(player.opponent()));
            self.cells[flip.index()] = Some(player);
        }
        Ok(captured.len())
    }

    /// Creates a `Board` from ASCII art for testing.
    /// 'B' is a black disc, 'W' a white disc, '.' an empty cell.
    /// Rows are specified top to bottom; whitespace-only lines are skipped.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let mut cells = [None; CELL_COUNT];
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert_eq!(lines.len(), BOARD_SIZE, "expected {BOARD_SIZE} rows");

        for (y, line) in lines.iter().enumerate() {
            let chars: Vec<char> = line
                .chars()
                .filter(|c| matches!(c, 'B' | 'W' | '.'))
                .collect();
            assert_eq!(
                chars.len(),
                BOARD_SIZE,
                "each row must have exactly {BOARD_SIZE} cells, got {} at row {y}",
                chars.len(),
            );
            for (x, &ch) in chars.iter().enumerate() {
                cells[x + y * BOARD_SIZE] = match ch {
                    'B' => Some(Player::Black),
                    'W' => Some(Player::White),
                    _ => None,
                };
            }
        }
        Self { cells }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  abcdefgh")?;
        for y in 0..BOARD_SIZE {
            write!(f, "{} ", y + 1)?;
            for x in 0..BOARD_SIZE {
                let ch = match self.cells[x + y * BOARD_SIZE] {
                    Some(Player::Black) => 'B',
                    Some(Player::White) => 'W',
                    None => '.',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
