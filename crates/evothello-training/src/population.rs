use evothello_network::{ActivationPair, Network, WeightInit};
use rand::Rng;

/// Construction recipe for the networks in a population: layer sizes,
/// activation pair and weight distribution, all fixed for a training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkBlueprint {
    pub input_size: usize,
    pub hidden_size: usize,
    pub output_size: usize,
    pub activation: ActivationPair,
    pub init: WeightInit,
}

impl NetworkBlueprint {
    #[must_use]
    pub fn build<R>(&self, rng: &mut R) -> Network
    where
        R: Rng + ?Sized,
    {
        Network::random(
            self.input_size,
            self.hidden_size,
            self.output_size,
            self.activation,
            self.init,
            rng,
        )
    }
}

/// One candidate in the population: a network and its fitness for the
/// current generation.
///
/// Fitness is an explicit per-generation value: the evolution loop resets
/// it before every evaluation pass, so ranking never sees scores carried
/// over from earlier generations.
#[derive(Debug, Clone)]
pub struct Individual {
    network: Network,
    fitness: f64,
}

impl Individual {
    #[must_use]
    pub fn new(network: Network) -> Self {
        Self {
            network,
            fitness: 0.0,
        }
    }

    #[must_use]
    pub fn network(&self) -> &Network {
        &self.network
    }

    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }
}

/// An ordered collection of individuals evaluated together.
///
/// Size is constant across generations except during the transient
/// child-generation phase inside the evolver.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Creates a population of `count` independently random networks.
    #[must_use]
    pub fn random<R>(count: usize, blueprint: NetworkBlueprint, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let individuals = (0..count)
            .map(|_| Individual::new(blueprint.build(rng)))
            .collect();
        Self { individuals }
    }

    /// Wraps pre-built networks, e.g. when resuming from a persisted
    /// leader.
    #[must_use]
    pub fn from_networks(networks: Vec<Network>) -> Self {
        Self {
            individuals: networks.into_iter().map(Individual::new).collect(),
        }
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Zeroes every fitness score at the start of a generation.
    pub fn reset_fitness(&mut self) {
        for ind in &mut self.individuals {
            ind.fitness = 0.0;
        }
    }

    /// Accumulates a match delta onto one individual's score.
    pub fn add_fitness(&mut self, index: usize, delta: f64) {
        self.individuals[index].fitness += delta;
    }

    /// Sorts individuals by fitness, best first.
    pub fn rank(&mut self) {
        self.individuals
            .sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap());
    }

    /// The top `count` networks, for breeding. Call after [`rank`].
    ///
    /// [`rank`]: Population::rank
    #[must_use]
    pub fn top_networks(&self, count: usize) -> Vec<&Network> {
        self.individuals[..count.min(self.individuals.len())]
            .iter()
            .map(Individual::network)
            .collect()
    }

    /// The current best individual, best-first order assumed.
    #[must_use]
    pub fn leader(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    /// Fitness scores in population order.
    pub fn fitness_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.individuals.iter().map(Individual::fitness)
    }
}
