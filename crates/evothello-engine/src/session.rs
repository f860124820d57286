use crate::{
    IllegalMoveError, PassWithMovesError,
    board::{Board, CELL_COUNT, MoveList, Player, Position},
};

/// Upper bound on moves-or-passes in one game.
///
/// Every move fills a cell and at most one pass separates two moves, so a
/// legal game can never reach this many plies. The match runner treats an
/// overrun as a referee invariant violation.
pub const PLY_LIMIT: usize = 2 * CELL_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    InProgress,
    Terminal,
}

/// Final result of a finished game: disc counts per color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub black: usize,
    pub white: usize,
}

impl Outcome {
    /// The player with more discs, or `None` on a draw.
    #[must_use]
    pub fn winner(&self) -> Option<Player> {
        match self.black.cmp(&self.white) {
            std::cmp::Ordering::Greater => Some(Player::Black),
            std::cmp::Ordering::Less => Some(Player::White),
            std::cmp::Ordering::Equal => None,
        }
    }

    #[must_use]
    pub fn count_for(&self, player: Player) -> usize {
        match player {
            Player::Black => self.black,
            Player::White => self.white,
        }
    }
}

/// The authoritative referee for one match.
///
/// Owns the board and the turn state machine: alternation, forced passes
/// and terminal detection. No other component mutates board state; callers
/// submit moves through [`GameSession::play_move`] and
/// [`GameSession::pass`] only.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    current_player: Player,
    state: SessionState,
    consecutive_passes: u8,
    plies: usize,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Starts a fresh game from the standard opening position.
    /// Black moves first.
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Player::Black,
            state: SessionState::InProgress,
            consecutive_passes: 0,
            plies: 0,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Number of moves-or-passes taken so far.
    #[must_use]
    pub fn plies(&self) -> usize {
        self.plies
    }

    /// Legal moves for the player to move.
    #[must_use]
    pub fn legal_moves(&self) -> MoveList {
        self.board.legal_moves(self.current_player)
    }

    /// Plays a move for the current player and advances the turn.
    ///
    /// # Panics
    ///
    /// Panics if the game is already terminal; submitting moves into a
    /// finished game is a programming error.
    pub fn play_move(&mut self, pos: Position) -> Result<(), IllegalMoveError> {
        assert!(self.state.is_in_progress(), "move submitted after terminal state");
        self.board.apply_move(pos, self.current_player)?;
        self.consecutive_passes = 0;
        self.advance_turn();
        Ok(())
    }

    /// Passes the turn. Legal only when the current player has no moves.
    /// Two consecutive passes end the game.
    pub fn pass(&mut self) -> Result<(), PassWithMovesError> {
        assert!(self.state.is_in_progress(), "pass submitted after terminal state");
        if !self.legal_moves().is_empty() {
            return Err(PassWithMovesError);
        }
        self.consecutive_passes += 1;
        if self.consecutive_passes >= 2 {
            self.plies += 1;
            self.state = SessionState::Terminal;
            return Ok(());
        }
        self.advance_turn();
        Ok(())
    }

    fn advance_turn(&mut self) {
        self.plies += 1;
        self.current_player = self.current_player.opponent();
        // The game also ends as soon as no empty cell admits a legal move
        // for either player.
        if self.board.legal_moves(Player::Black).is_empty()
            && self.board.legal_moves(Player::White).is_empty()
        {
            self.state = SessionState::Terminal;
        }
    }

    /// The final score, available once the game is terminal.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        if self.state.is_terminal() {
            let (black, white) = self.board.counts();
            Some(Outcome { black, white })
        } else {
            None
        }
    }
}
