use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::UnknownActivationError;

/// A single activation function together with its derivative.
///
/// The derivative is only consumed by the supervised trainer; the
/// evolutionary path never differentiates anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Sigmoid,
}

impl Activation {
    #[must_use]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Activation::Relu => {
                if x >= 0.0 {
                    x
                } else {
                    0.0
                }
            }
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
        }
    }

    /// Derivative expressed in terms of the activated value `y`, which is
    /// what the backward pass has at hand.
    #[must_use]
    pub fn derivative(self, y: f64) -> f64 {
        match self {
            Activation::Relu => {
                if y > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activation::Sigmoid => y * (1.0 - y),
        }
    }
}

/// The closed set of (hidden, output) activation pairs a network can be
/// built with. Parsing an unknown name is a configuration error; a network
/// can never exist without activations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivationPair {
    ReluSigmoid,
    SigmoidSigmoid,
}

impl ActivationPair {
    #[must_use]
    pub fn hidden(self) -> Activation {
        match self {
            ActivationPair::ReluSigmoid => Activation::Relu,
            ActivationPair::SigmoidSigmoid => Activation::Sigmoid,
        }
    }

    #[must_use]
    pub fn output(self) -> Activation {
        match self {
            ActivationPair::ReluSigmoid | ActivationPair::SigmoidSigmoid => Activation::Sigmoid,
        }
    }
}

impl fmt::Display for ActivationPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActivationPair::ReluSigmoid => "relu-sigmoid",
            ActivationPair::SigmoidSigmoid => "sigmoid-sigmoid",
        };
        f.write_str(name)
    }
}

impl FromStr for ActivationPair {
    type Err = UnknownActivationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relu-sigmoid" => Ok(ActivationPair::ReluSigmoid),
            "sigmoid-sigmoid" => Ok(ActivationPair::SigmoidSigmoid),
            _ => Err(UnknownActivationError { name: s.to_owned() }),
        }
    }
}
