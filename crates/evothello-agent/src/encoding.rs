use evothello_engine::{Board, CELL_COUNT, Player};

/// Width of the network input vector: one cell for the acting player plus
/// the full board.
pub const INPUT_SIZE: usize = CELL_COUNT + 1;

/// Affine transform applied to the signed cell encoding before it enters
/// the network. Fixed, not learned: `signed / 2 + 0.001` keeps the three
/// cell states distinct while staying near zero.
fn transform(signed: f64) -> f64 {
    signed / 2.0 + 0.001
}

/// Builds the network input vector for `player` to move on `board`.
///
/// Element 0 encodes the acting player; elements `1..=CELL_COUNT` encode
/// the cells in index order (Black = +1, White = -1, empty = 0, each put
/// through the affine transform).
#[must_use]
pub fn encode_board(board: &Board, player: Player) -> Vec<f64> {
    let mut input = Vec::with_capacity(INPUT_SIZE);
    input.push(transform(player.signed()));
    input.extend(board.cells().map(|cell| transform(cell.map_or(0.0, Player::signed))));
    input
}
