pub use self::{activation::*, network::*, snapshot::*, train::*};

pub mod activation;
pub mod network;
pub mod snapshot;
pub mod train;

/// Identifies one of the two weight matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    InputHidden,
    HiddenOutput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("weight index ({i}, {j}) out of range for {layer:?} layer")]
pub struct WeightIndexError {
    pub layer: Layer,
    pub i: usize,
    pub j: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum NetworkBuildError {
    #[display("{name} has length {got}, expected {expected}")]
    DimensionMismatch {
        name: &'static str,
        got: usize,
        expected: usize,
    },
    #[display("network contains a non-finite weight or bias")]
    NonFinite,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown activation pair {name:?}, expected one of: relu-sigmoid, sigmoid-sigmoid")]
pub struct UnknownActivationError {
    pub name: String,
}
