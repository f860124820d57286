//! Supervised trainer: plain stochastic backpropagation.
//!
//! This is the alternative, non-evolutionary training path. It consumes
//! `(input, one-hot label)` pairs from a data-loading collaborator and
//! updates the network in place. The evolutionary loop never calls into
//! this module.

use crate::Network;

/// One labeled example. `target` is a one-hot vector over the output layer.
#[derive(Debug, Clone)]
pub struct TrainSample {
    pub input: Vec<f64>,
    pub target: Vec<f64>,
}

/// Per-epoch training accuracy over the full sample set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochReport {
    pub epoch: usize,
    pub accuracy: f64,
}

fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

impl Network {
    /// Trains the network with per-sample gradient descent for `epochs`
    /// passes over `samples`, returning the accuracy after each epoch.
    ///
    /// # Panics
    ///
    /// Panics if a sample's input or target length does not match the
    /// network dimensions, or if `samples` is empty.
    pub fn train_supervised(
        &mut self,
        samples: &[TrainSample],
        learning_rate: f64,
        epochs: usize,
    ) -> Vec<EpochReport> {
        assert!(!samples.is_empty(), "training requires at least one sample");
        for sample in samples {
            assert_eq!(sample.input.len(), self.input_size, "sample input width mismatch");
            assert_eq!(sample.target.len(), self.output_size, "sample target width mismatch");
        }

        let act_hidden = self.activation.hidden();
        let act_output = self.activation.output();
        let mut reports = Vec::with_capacity(epochs);

        for epoch in 0..epochs {
            let mut correct = 0_usize;
            for sample in samples {
                let (hidden, output) = self.forward_layers(&sample.input);

                if sample.target[argmax(&output)] == 1.0 {
                    correct += 1;
                }

                let output_delta: Vec<f64> = output
                    .iter()
                    .zip(&sample.target)
                    .map(|(o, t)| (t - o) * act_output.derivative(*o))
                    .collect();

                let hidden_delta: Vec<f64> = hidden
                    .iter()
                    .enumerate()
                    .map(|(i, h)| {
                        let error: f64 = output_delta
                            .iter()
                            .enumerate()
                            .map(|(k, d)| d * self.w_hidden_output[i * self.output_size + k])
                            .sum();
                        error * act_hidden.derivative(*h)
                    })
                    .collect();

                for (k, delta) in output_delta.iter().enumerate() {
                    self.bias_output[k] += learning_rate * delta;
                    for (i, h) in hidden.iter().enumerate() {
                        self.w_hidden_output[i * self.output_size + k] +=
                            learning_rate * delta * h;
                    }
                }
                for (i, delta) in hidden_delta.iter().enumerate() {
                    self.bias_hidden[i] += learning_rate * delta;
                    for (j, x) in sample.input.iter().enumerate() {
                        self.w_input_hidden[j * self.hidden_size + i] +=
                            learning_rate * delta * x;
                    }
                }
            }

            #[expect(clippy::cast_precision_loss)]
            let accuracy = correct as f64 / samples.len() as f64;
            reports.push(EpochReport { epoch, accuracy });
        }

        reports
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use crate::{ActivationPair, WeightInit};

    use super::*;

    fn one_hot(len: usize, hot: usize) -> Vec<f64> {
        let mut v = vec![0.0; len];
        v[hot] = 1.0;
        v
    }

    #[test]
    fn test_learns_to_separate_two_classes() {
        let mut rng = Pcg64Mcg::seed_from_u64(42);
        let mut nn = Network::random(
            2,
            4,
            2,
            ActivationPair::SigmoidSigmoid,
            WeightInit::Centered,
            &mut rng,
        );
        // Class 0: first input dominates; class 1: second input dominates.
        let samples = vec![
            TrainSample { input: vec![1.0, 0.0], target: one_hot(2, 0) },
            TrainSample { input: vec![0.9, 0.1], target: one_hot(2, 0) },
            TrainSample { input: vec![0.0, 1.0], target: one_hot(2, 1) },
            TrainSample { input: vec![0.1, 0.9], target: one_hot(2, 1) },
        ];
        let reports = nn.train_supervised(&samples, 0.5, 200);
        assert_eq!(reports.len(), 200);
        let last = reports.last().unwrap();
        assert_eq!(last.epoch, 199);
        assert!(
            last.accuracy >= 0.99,
            "trainer failed to fit a linearly separable set: {}",
            last.accuracy
        );
        assert!(nn.is_finite());
    }

    #[test]
    fn test_training_mutates_weights_in_place() {
        let mut rng = Pcg64Mcg::seed_from_u64(5);
        let mut nn = Network::random(
            2,
            3,
            2,
            ActivationPair::SigmoidSigmoid,
            WeightInit::Centered,
            &mut rng,
        );
        let before = nn.clone();
        let samples = vec![TrainSample { input: vec![1.0, -1.0], target: one_hot(2, 0) }];
        nn.train_supervised(&samples, 0.1, 1);
        assert_ne!(nn, before);
        assert!(nn.same_topology(&before));
    }

    #[test]
    #[should_panic(expected = "sample input width mismatch")]
    fn test_mismatched_sample_panics() {
        let mut rng = Pcg64Mcg::seed_from_u64(6);
        let mut nn = Network::random(
            3,
            3,
            2,
            ActivationPair::SigmoidSigmoid,
            WeightInit::Unit,
            &mut rng,
        );
        let samples = vec![TrainSample { input: vec![1.0], target: one_hot(2, 0) }];
        nn.train_supervised(&samples, 0.1, 1);
    }
}
