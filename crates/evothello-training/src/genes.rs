//! Gene-level operators shared by the genetic crossover.
//!
//! Genes are plain `f64` slices; the [`genetic`](crate::genetic) module
//! applies these operators uniformly to every weight matrix and bias
//! vector of a network.

use rand::Rng;

/// Half-width of the additive mutation perturbation.
const MUTATION_SPAN: f64 = 0.5;

/// Gene-wise uniform crossover: each output gene is copied from `p1` or
/// `p2` with probability 0.5, independently per gene. Never a blend.
///
/// # Panics
///
/// Panics if the parent slices differ in length.
pub fn cross<R>(p1: &[f64], p2: &[f64], rng: &mut R) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.len(), p2.len(), "parent gene slices differ in length");
    p1.iter()
        .zip(p2)
        .map(|(a, b)| if rng.random_bool(0.5) { *a } else { *b })
        .collect()
}

/// Mutates each gene independently with probability `rate` by adding a
/// uniform draw over `(-0.5, 0.5)`. Applied after crossover, on the
/// already-assigned gene.
pub fn mutate<R>(genes: &mut [f64], rate: f64, rng: &mut R)
where
    R: Rng + ?Sized,
{
    for gene in genes {
        if rng.random_bool(rate) {
            *gene += rng.random_range(-MUTATION_SPAN..MUTATION_SPAN);
        }
    }
}
