use rand::Rng;

use crate::{ActivationPair, Layer, NetworkBuildError, WeightIndexError};

/// How freshly constructed weights are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightInit {
    /// Uniform over `[0, 1)`.
    Unit,
    /// Uniform over `[-0.5, 0.5)`.
    Centered,
}

impl WeightInit {
    fn sample<R>(self, rng: &mut R) -> f64
    where
        R: Rng + ?Sized,
    {
        match self {
            WeightInit::Unit => rng.random_range(0.0..1.0),
            WeightInit::Centered => rng.random_range(-0.5..0.5),
        }
    }
}

/// A fixed-topology feed-forward network: input layer, one hidden layer,
/// output layer.
///
/// Matrix dimensions are fixed for the network's lifetime and every
/// instance exclusively owns its weight storage; the genetic operator
/// produces children with freshly allocated matrices, so no two networks
/// ever alias.
///
/// Weight layout is row-major from the source layer: the weight from input
/// `j` to hidden `i` lives at `w_input_hidden[j * hidden_size + i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    pub(crate) input_size: usize,
    pub(crate) hidden_size: usize,
    pub(crate) output_size: usize,
    pub(crate) w_input_hidden: Vec<f64>,
    pub(crate) w_hidden_output: Vec<f64>,
    pub(crate) bias_hidden: Vec<f64>,
    pub(crate) bias_output: Vec<f64>,
    pub(crate) activation: ActivationPair,
}

impl Network {
    /// Creates a network with every weight and bias drawn independently
    /// from the `init` distribution.
    ///
    /// # Panics
    ///
    /// Panics if any layer size is zero; sizes are fixed configuration and
    /// a zero-width layer is a programming error.
    pub fn random<R>(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        activation: ActivationPair,
        init: WeightInit,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + ?Sized,
    {
        assert!(
            input_size > 0 && hidden_size > 0 && output_size > 0,
            "layer sizes must be positive"
        );
        let mut draw = |len: usize| -> Vec<f64> { (0..len).map(|_| init.sample(rng)).collect() };
        Self {
            input_size,
            hidden_size,
            output_size,
            w_input_hidden: draw(input_size * hidden_size),
            w_hidden_output: draw(hidden_size * output_size),
            bias_hidden: draw(hidden_size),
            bias_output: draw(output_size),
            activation,
        }
    }

    /// Assembles a network from explicit matrices, validating that every
    /// buffer has the expected length and every value is finite.
    pub fn from_parts(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        activation: ActivationPair,
        w_input_hidden: Vec<f64>,
        w_hidden_output: Vec<f64>,
        bias_hidden: Vec<f64>,
        bias_output: Vec<f64>,
    ) -> Result<Self, NetworkBuildError> {
        let check = |name: &'static str, buf: &[f64], expected: usize| {
            if buf.len() != expected {
                return Err(NetworkBuildError::DimensionMismatch {
                    name,
                    got: buf.len(),
                    expected,
                });
            }
            if buf.iter().any(|v| !v.is_finite()) {
                return Err(NetworkBuildError::NonFinite);
            }
            Ok(())
        };
        check("w_input_hidden", &w_input_hidden, input_size * hidden_size)?;
        check("w_hidden_output", &w_hidden_output, hidden_size * output_size)?;
        check("bias_hidden", &bias_hidden, hidden_size)?;
        check("bias_output", &bias_output, output_size)?;
        Ok(Self {
            input_size,
            hidden_size,
            output_size,
            w_input_hidden,
            w_hidden_output,
            bias_hidden,
            bias_output,
            activation,
        })
    }

    #[must_use]
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    #[must_use]
    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    #[must_use]
    pub fn output_size(&self) -> usize {
        self.output_size
    }

    #[must_use]
    pub fn activation(&self) -> ActivationPair {
        self.activation
    }

    /// Computes the output vector for `input`.
    ///
    /// Pure with respect to the network: evaluation never mutates weights.
    /// Identical weights and input always produce bit-identical output.
    ///
    /// # Panics
    ///
    /// Panics if `input.len() != input_size`; feeding a wrong-width vector
    /// is a programming error, not a recoverable condition.
    #[must_use]
    pub fn forward(&self, input: &[f64]) -> Vec<f64> {
        let (_, output) = self.forward_layers(input);
        output
    }

    /// Forward pass returning both the activated hidden layer and the
    /// output layer. The hidden values feed the supervised trainer.
    pub(crate) fn forward_layers(&self, input: &[f64]) -> (Vec<f64>, Vec<f64>) {
        assert_eq!(
            input.len(),
            self.input_size,
            "input length does not match the network's input size"
        );
        let act_hidden = self.activation.hidden();
        let act_output = self.activation.output();

        let mut hidden = vec![0.0; self.hidden_size];
        for (i, h) in hidden.iter_mut().enumerate() {
            let mut sum = self.bias_hidden[i];
            for (j, x) in input.iter().enumerate() {
                sum += x * self.w_input_hidden[j * self.hidden_size + i];
            }
            *h = act_hidden.apply(sum);
        }

        let mut output = vec![0.0; self.output_size];
        for (k, o) in output.iter_mut().enumerate() {
            let mut sum = self.bias_output[k];
            for (i, h) in hidden.iter().enumerate() {
                sum += h * self.w_hidden_output[i * self.output_size + k];
            }
            *o = act_output.apply(sum);
        }

        (hidden, output)
    }

    /// Bounds-checked weight accessor.
    ///
    /// `i` indexes the source layer, `j` the destination layer of the
    /// selected matrix. Out-of-range indices are a reported error, never a
    /// silently returned default.
    pub fn weight(&self, layer: Layer, i: usize, j: usize) -> Result<f64, WeightIndexError> {
        let (rows, cols, buf) = match layer {
            Layer::InputHidden => (self.input_size, self.hidden_size, &self.w_input_hidden),
            Layer::HiddenOutput => (self.hidden_size, self.output_size, &self.w_hidden_output),
        };
        if i >= rows || j >= cols {
            return Err(WeightIndexError { layer, i, j });
        }
        Ok(buf[i * cols + j])
    }

    #[must_use]
    pub fn w_input_hidden(&self) -> &[f64] {
        &self.w_input_hidden
    }

    #[must_use]
    pub fn w_hidden_output(&self) -> &[f64] {
        &self.w_hidden_output
    }

    #[must_use]
    pub fn bias_hidden(&self) -> &[f64] {
        &self.bias_hidden
    }

    #[must_use]
    pub fn bias_output(&self) -> &[f64] {
        &self.bias_output
    }

    /// True when every weight and bias is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.w_input_hidden
            .iter()
            .chain(&self.w_hidden_output)
            .chain(&self.bias_hidden)
            .chain(&self.bias_output)
            .all(|v| v.is_finite())
    }

    /// True when `other` has the same layer sizes and activation pair,
    /// i.e. the two networks are genetically compatible.
    #[must_use]
    pub fn same_topology(&self, other: &Self) -> bool {
        self.input_size == other.input_size
            && self.hidden_size == other.hidden_size
            && self.output_size == other.output_size
            && self.activation == other.activation
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use crate::Activation;

    use super::*;

    fn small_rng() -> Pcg64Mcg {
        Pcg64Mcg::seed_from_u64(7)
    }

    #[test]
    fn test_random_network_dimensions() {
        let mut rng = small_rng();
        let nn = Network::random(
            5,
            4,
            3,
            ActivationPair::SigmoidSigmoid,
            WeightInit::Unit,
            &mut rng,
        );
        assert_eq!(nn.w_input_hidden().len(), 20);
        assert_eq!(nn.w_hidden_output().len(), 12);
        assert_eq!(nn.bias_hidden().len(), 4);
        assert_eq!(nn.bias_output().len(), 3);
        assert!(nn.is_finite());
    }

    #[test]
    fn test_unit_init_range() {
        let mut rng = small_rng();
        let nn = Network::random(
            8,
            8,
            8,
            ActivationPair::SigmoidSigmoid,
            WeightInit::Unit,
            &mut rng,
        );
        assert!(nn.w_input_hidden().iter().all(|w| (0.0..1.0).contains(w)));
    }

    #[test]
    fn test_centered_init_range() {
        let mut rng = small_rng();
        let nn = Network::random(
            8,
            8,
            8,
            ActivationPair::SigmoidSigmoid,
            WeightInit::Centered,
            &mut rng,
        );
        assert!(nn.w_input_hidden().iter().all(|w| (-0.5..0.5).contains(w)));
    }

    #[test]
    fn test_forward_is_deterministic() {
        let mut rng = small_rng();
        let nn = Network::random(
            6,
            5,
            4,
            ActivationPair::ReluSigmoid,
            WeightInit::Centered,
            &mut rng,
        );
        let input = [0.1, -0.2, 0.3, 0.0, 0.5, -0.5];
        let a = nn.forward(&input);
        let b = nn.forward(&input);
        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
    }

    #[test]
    fn test_forward_sigmoid_output_bounds() {
        let mut rng = small_rng();
        let nn = Network::random(
            4,
            4,
            4,
            ActivationPair::SigmoidSigmoid,
            WeightInit::Unit,
            &mut rng,
        );
        let output = nn.forward(&[1.0, 0.0, -1.0, 0.5]);
        assert!(output.iter().all(|o| (0.0..=1.0).contains(o)));
    }

    #[test]
    #[should_panic(expected = "input length does not match")]
    fn test_forward_wrong_input_length_panics() {
        let mut rng = small_rng();
        let nn = Network::random(
            4,
            4,
            4,
            ActivationPair::SigmoidSigmoid,
            WeightInit::Unit,
            &mut rng,
        );
        let _ = nn.forward(&[1.0, 2.0]);
    }

    #[test]
    fn test_weight_accessor_bounds() {
        let mut rng = small_rng();
        let nn = Network::random(
            3,
            2,
            4,
            ActivationPair::SigmoidSigmoid,
            WeightInit::Unit,
            &mut rng,
        );
        assert!(nn.weight(Layer::InputHidden, 2, 1).is_ok());
        assert_eq!(
            nn.weight(Layer::InputHidden, 3, 0),
            Err(WeightIndexError {
                layer: Layer::InputHidden,
                i: 3,
                j: 0,
            })
        );
        assert!(nn.weight(Layer::HiddenOutput, 1, 3).is_ok());
        assert!(nn.weight(Layer::HiddenOutput, 2, 0).is_err());
        assert!(nn.weight(Layer::HiddenOutput, 0, 4).is_err());
    }

    #[test]
    fn test_weight_accessor_matches_forward_layout() {
        // A 1x1x1 network computes act(act(x*w1 + b1)*w2 + b2).
        let nn = Network::from_parts(
            1,
            1,
            1,
            ActivationPair::ReluSigmoid,
            vec![2.0],
            vec![3.0],
            vec![0.5],
            vec![-1.0],
        )
        .unwrap();
        assert_eq!(nn.weight(Layer::InputHidden, 0, 0).unwrap(), 2.0);
        let hidden = 2.0 * 1.0 + 0.5; // relu(2.5) = 2.5
        let expected = Activation::Sigmoid.apply(hidden * 3.0 - 1.0);
        assert_eq!(nn.forward(&[1.0]), vec![expected]);
    }

    #[test]
    fn test_from_parts_rejects_bad_dimensions() {
        let err = Network::from_parts(
            2,
            2,
            2,
            ActivationPair::SigmoidSigmoid,
            vec![0.0; 3],
            vec![0.0; 4],
            vec![0.0; 2],
            vec![0.0; 2],
        )
        .unwrap_err();
        assert!(matches!(err, NetworkBuildError::DimensionMismatch { name: "w_input_hidden", .. }));
    }

    #[test]
    fn test_from_parts_rejects_non_finite() {
        let err = Network::from_parts(
            1,
            1,
            1,
            ActivationPair::SigmoidSigmoid,
            vec![f64::NAN],
            vec![0.0],
            vec![0.0],
            vec![0.0],
        )
        .unwrap_err();
        assert_eq!(err, NetworkBuildError::NonFinite);
    }
}
