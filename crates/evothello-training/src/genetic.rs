//! The genetic operator: breeding child networks from a parent pool.
//!
//! Crossover is gene-wise uniform (a per-weight coin flip between two
//! parents), followed by independent additive mutation. Children always
//! own freshly allocated matrices; mutating a child can never reach into a
//! parent's storage.

use evothello_network::Network;
use rand::Rng;

use crate::{CrossoverError, genes};

/// Breeds `num_children` networks from `pool`.
///
/// For each child, two parents are drawn independently and uniformly from
/// the pool; every weight and bias is then copied gene-wise from one of
/// the two (probability 0.5 each) and mutated with probability
/// `mutation_rate` by an additive uniform draw over `(-0.5, 0.5)`.
///
/// Fails fast on configuration errors: an empty pool, parents with
/// mismatched topologies, or a mutation rate outside `[0, 1]`.
pub fn crossover<R>(
    pool: &[&Network],
    num_children: usize,
    mutation_rate: f64,
    rng: &mut R,
) -> Result<Vec<Network>, CrossoverError>
where
    R: Rng + ?Sized,
{
    let Some(first) = pool.first() else {
        return Err(CrossoverError::EmptyPool);
    };
    if pool.iter().any(|p| !p.same_topology(first)) {
        return Err(CrossoverError::MismatchedTopology);
    }
    if !(0.0..=1.0).contains(&mutation_rate) || !mutation_rate.is_finite() {
        return Err(CrossoverError::MutationRateOutOfRange {
            rate: mutation_rate,
        });
    }

    let children = (0..num_children)
        .map(|_| {
            let p1 = pool[rng.random_range(0..pool.len())];
            let p2 = pool[rng.random_range(0..pool.len())];
            breed(p1, p2, mutation_rate, rng)
        })
        .collect();
    Ok(children)
}

fn breed<R>(p1: &Network, p2: &Network, mutation_rate: f64, rng: &mut R) -> Network
where
    R: Rng + ?Sized,
{
    let mut gene_buffer = |a: &[f64], b: &[f64]| -> Vec<f64> {
        let mut buf = genes::cross(a, b, rng);
        genes::mutate(&mut buf, mutation_rate, rng);
        buf
    };
    let w_input_hidden = gene_buffer(p1.w_input_hidden(), p2.w_input_hidden());
    let w_hidden_output = gene_buffer(p1.w_hidden_output(), p2.w_hidden_output());
    let bias_hidden = gene_buffer(p1.bias_hidden(), p2.bias_hidden());
    let bias_output = gene_buffer(p1.bias_output(), p2.bias_output());

    Network::from_parts(
        p1.input_size(),
        p1.hidden_size(),
        p1.output_size(),
        p1.activation(),
        w_input_hidden,
        w_hidden_output,
        bias_hidden,
        bias_output,
    )
    .expect("child buffers are sized from validated parents")
}
