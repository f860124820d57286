pub use self::{encoding::*, match_runner::*, policy::*};

pub mod encoding;
pub mod match_runner;
pub mod policy;

use evothello_engine::CELL_COUNT;

/// A network whose layer sizes cannot drive a move policy. Rejected at
/// policy construction, before any match is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PolicyShapeError {
    #[display("network input size {got} does not match the board encoding ({INPUT_SIZE} values)")]
    InputWidth { got: usize },
    #[display("network output size {got} is narrower than the board ({CELL_COUNT} cells)")]
    OutputWidth { got: usize },
}
