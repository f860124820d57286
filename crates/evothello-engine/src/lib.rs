pub use self::{board::*, session::*};

pub mod board;
pub mod session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum IllegalMoveError {
    #[display("target cell is already occupied")]
    CellOccupied,
    #[display("move captures no opponent discs")]
    NoCapture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("cannot pass while legal moves are available")]
pub struct PassWithMovesError;
