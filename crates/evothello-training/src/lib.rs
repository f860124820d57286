pub use self::{evolution::*, genetic::*, population::*, stats::*};

pub mod evolution;
pub mod genes;
pub mod genetic;
pub mod parallel;
pub mod population;
pub mod stats;

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum CrossoverError {
    #[display("parent pool is empty")]
    EmptyPool,
    #[display("parent networks in the pool have mismatched topologies")]
    MismatchedTopology,
    #[display("mutation rate {rate} is outside [0, 1]")]
    MutationRateOutOfRange { rate: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("population size must be non-zero")]
    ZeroPopulation,
    #[display("breeding pool must be non-zero")]
    ZeroBreedingPool,
    #[display("breeding pool ({pool}) cannot exceed the population ({population})")]
    BreedingPoolTooLarge { pool: usize, population: usize },
    #[display("matches per agent must be non-zero")]
    ZeroMatches,
    #[display("worker count must be non-zero")]
    ZeroWorkers,
    #[display("mutation rate {rate} is outside [0, 1]")]
    MutationRateOutOfRange { rate: f64 },
    #[display("network input ({input_size}) does not match the board encoding")]
    InputWidthMismatch { input_size: usize },
    #[display("network output ({output_size}) does not cover the board")]
    OutputTooNarrow { output_size: usize },
    #[display("resumed network does not match the configured blueprint")]
    ResumeTopologyMismatch,
}
