use serde::{Deserialize, Serialize};

use crate::{ActivationPair, Network, NetworkBuildError};

/// Serializable image of a [`Network`]'s matrices.
///
/// This is the wire schema handed to the persistence collaborator; the
/// exact encoding (JSON, binary) is the caller's concern. The only
/// contract is exact round-trip fidelity:
/// `Network::from_snapshot(n.to_snapshot())` reproduces `n`'s matrices
/// bit for bit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub input_size: usize,
    pub hidden_size: usize,
    pub output_size: usize,
    pub activation: ActivationPair,
    pub weights_input_hidden: Vec<f64>,
    pub weights_hidden_output: Vec<f64>,
    pub bias_hidden: Vec<f64>,
    pub bias_output: Vec<f64>,
}

impl Network {
    #[must_use]
    pub fn to_snapshot(&self) -> NetworkSnapshot {
        NetworkSnapshot {
            input_size: self.input_size,
            hidden_size: self.hidden_size,
            output_size: self.output_size,
            activation: self.activation,
            weights_input_hidden: self.w_input_hidden.clone(),
            weights_hidden_output: self.w_hidden_output.clone(),
            bias_hidden: self.bias_hidden.clone(),
            bias_output: self.bias_output.clone(),
        }
    }

    /// Rebuilds a network from a persisted snapshot, rejecting snapshots
    /// with inconsistent dimensions or non-finite values.
    pub fn from_snapshot(snapshot: NetworkSnapshot) -> Result<Self, NetworkBuildError> {
        Self::from_parts(
            snapshot.input_size,
            snapshot.hidden_size,
            snapshot.output_size,
            snapshot.activation,
            snapshot.weights_input_hidden,
            snapshot.weights_hidden_output,
            snapshot.bias_hidden,
            snapshot.bias_output,
        )
    }
}
