//! The evolution loop: one synchronous generation at a time.
//!
//! Each generation schedules a fixed number of pairwise matches, evaluates
//! them concurrently over the worker pool, merges the score deltas into
//! fresh per-generation fitness, ranks the population and breeds the next
//! one from the top of the ranking. Generations never overlap: ranking
//! only starts after every worker has joined.

use evothello_agent::{INPUT_SIZE, NetworkPolicy, RandomPolicy, play_match};
use evothello_engine::CELL_COUNT;
use evothello_network::{Network, NetworkSnapshot};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg64Mcg;

use crate::{
    ConfigError, genetic, parallel,
    population::{NetworkBlueprint, Population},
    stats::DescriptiveStats,
};

/// Keeps the orchestrator's stream distinct from the worker rank streams
/// derived from the same configured seed.
const ORCHESTRATOR_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// All knobs of a training run, read once at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvolutionConfig {
    /// Number of networks in every generation.
    pub population_size: usize,
    /// Number of top-ranked agents that breed the next generation.
    pub breeding_pool: usize,
    /// Matches scheduled per agent per generation, each against a
    /// uniformly drawn opponent.
    pub matches_per_agent: usize,
    /// Per-gene mutation probability used when breeding.
    pub mutation_rate: f64,
    /// Size of the match evaluation worker pool.
    pub worker_count: usize,
    /// When set, the white side of every match plays uniformly random
    /// moves instead of its network, diversifying the pool.
    pub exploration: bool,
    /// Optional seed making the whole run reproducible.
    pub seed: Option<u64>,
}

impl EvolutionConfig {
    /// Fails fast on any out-of-range knob.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::ZeroPopulation);
        }
        if self.breeding_pool == 0 {
            return Err(ConfigError::ZeroBreedingPool);
        }
        if self.breeding_pool > self.population_size {
            return Err(ConfigError::BreedingPoolTooLarge {
                pool: self.breeding_pool,
                population: self.population_size,
            });
        }
        if self.matches_per_agent == 0 {
            return Err(ConfigError::ZeroMatches);
        }
        if self.worker_count == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) || !self.mutation_rate.is_finite() {
            return Err(ConfigError::MutationRateOutOfRange {
                rate: self.mutation_rate,
            });
        }
        Ok(())
    }
}

/// One scheduled pairing: agent indices plus the result slot its worker
/// fills in.
#[derive(Debug, Clone, Copy)]
struct MatchTask {
    black: usize,
    white: usize,
    deltas: Option<(f64, f64)>,
}

/// Summary of one evaluated generation.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub generation: usize,
    /// Per-agent fitness, best first.
    pub ranked_fitness: Vec<f64>,
    pub fitness_stats: DescriptiveStats,
    pub matches_played: usize,
    /// The leader's weights, ready for the persistence collaborator.
    pub best: NetworkSnapshot,
}

/// Drives the generational cycle: evaluate, rank, breed, repeat.
#[derive(Debug)]
pub struct Trainer {
    config: EvolutionConfig,
    blueprint: NetworkBlueprint,
    population: Population,
    rng: Pcg64Mcg,
    generation: usize,
}

impl Trainer {
    /// Builds a trainer with a fresh random population.
    pub fn new(config: EvolutionConfig, blueprint: NetworkBlueprint) -> Result<Self, ConfigError> {
        let mut this = Self::empty(config, blueprint)?;
        this.population =
            Population::random(config.population_size, blueprint, &mut this.rng);
        Ok(this)
    }

    /// Builds a trainer seeded from a previously persisted leader: the
    /// leader survives as-is and the rest of the population is bred from
    /// it with the configured mutation rate.
    pub fn resume(
        config: EvolutionConfig,
        blueprint: NetworkBlueprint,
        leader: Network,
    ) -> Result<Self, ConfigError> {
        if leader.input_size() != blueprint.input_size
            || leader.hidden_size() != blueprint.hidden_size
            || leader.output_size() != blueprint.output_size
            || leader.activation() != blueprint.activation
        {
            return Err(ConfigError::ResumeTopologyMismatch);
        }
        let mut this = Self::empty(config, blueprint)?;
        let mut networks = genetic::crossover(
            &[&leader],
            config.population_size - 1,
            config.mutation_rate,
            &mut this.rng,
        )
        .expect("validated configuration");
        networks.insert(0, leader);
        this.population = Population::from_networks(networks);
        Ok(this)
    }

    fn empty(config: EvolutionConfig, blueprint: NetworkBlueprint) -> Result<Self, ConfigError> {
        config.validate()?;
        if blueprint.input_size != INPUT_SIZE {
            return Err(ConfigError::InputWidthMismatch {
                input_size: blueprint.input_size,
            });
        }
        if blueprint.output_size < CELL_COUNT {
            return Err(ConfigError::OutputTooNarrow {
                output_size: blueprint.output_size,
            });
        }
        let rng = match config.seed {
            Some(seed) => Pcg64Mcg::seed_from_u64(seed ^ ORCHESTRATOR_SEED_SALT),
            None => Pcg64Mcg::from_os_rng(),
        };
        Ok(Self {
            config,
            blueprint,
            population: Population::from_networks(Vec::new()),
            rng,
            generation: 0,
        })
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[must_use]
    pub fn blueprint(&self) -> NetworkBlueprint {
        self.blueprint
    }

    /// Evaluates the current population and returns its ranking.
    ///
    /// Schedules `matches_per_agent` pairings per agent against uniformly
    /// drawn opponents, plays them across the worker pool, merges every
    /// score delta after the pool joins, and sorts the population best
    /// first. Fitness is reset before merging; scores never leak across
    /// generations.
    pub fn run_generation(&mut self) -> GenerationReport {
        let count = self.population.len();
        let mut tasks: Vec<MatchTask> =
            Vec::with_capacity(count * self.config.matches_per_agent);
        for agent in 0..count {
            for _ in 0..self.config.matches_per_agent {
                let white = self.draw_opponent(agent, count);
                tasks.push(MatchTask {
                    black: agent,
                    white,
                    deltas: None,
                });
            }
        }

        // Each generation derives its own worker seeds so exploration
        // opponents do not replay the same move sequences every pass.
        let worker_seed = self
            .config
            .seed
            .map(|seed| seed.wrapping_add((self.generation as u64) << 20));
        let population = &self.population;
        let exploration = self.config.exploration;
        parallel::for_each_partitioned(
            self.config.worker_count,
            worker_seed,
            &mut tasks,
            |_, rng, task| {
                let mut black = NetworkPolicy::new(population.individuals()[task.black].network())
                    .expect("policy shape was validated at construction");
                let outcome = if exploration {
                    let mut white = RandomPolicy::new(&mut *rng);
                    play_match(&mut black, &mut white)
                } else {
                    let mut white =
                        NetworkPolicy::new(population.individuals()[task.white].network())
                            .expect("policy shape was validated at construction");
                    play_match(&mut black, &mut white)
                };
                task.deltas = Some(outcome.score_deltas());
            },
        );

        self.population.reset_fitness();
        for task in &tasks {
            let (black_delta, white_delta) = task.deltas.expect("worker filled every slot");
            self.population.add_fitness(task.black, black_delta);
            self.population.add_fitness(task.white, white_delta);
        }
        self.population.rank();

        GenerationReport {
            generation: self.generation,
            ranked_fitness: self.population.fitness_values().collect(),
            fitness_stats: DescriptiveStats::new(self.population.fitness_values())
                .expect("population is non-empty"),
            matches_played: tasks.len(),
            best: self
                .population
                .leader()
                .expect("population is non-empty")
                .network()
                .to_snapshot(),
        }
    }

    /// Breeds the next generation from the top of the current ranking.
    /// Population size stays constant.
    pub fn evolve(&mut self) {
        let parents = self.population.top_networks(self.config.breeding_pool);
        let children = genetic::crossover(
            &parents,
            self.config.population_size,
            self.config.mutation_rate,
            &mut self.rng,
        )
        .expect("validated configuration");
        self.population = Population::from_networks(children);
        self.generation += 1;
    }

    /// Draws a uniform opponent, resampling self-pairings away whenever
    /// possible.
    fn draw_opponent(&mut self, agent: usize, count: usize) -> usize {
        loop {
            let opponent = self.rng.random_range(0..count);
            if opponent != agent || count == 1 {
                return opponent;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use evothello_agent::INPUT_SIZE;
    use evothello_network::{ActivationPair, WeightInit};
    use rand::SeedableRng as _;

    use super::*;

    fn blueprint() -> NetworkBlueprint {
        NetworkBlueprint {
            input_size: INPUT_SIZE,
            hidden_size: 4,
            output_size: CELL_COUNT,
            activation: ActivationPair::SigmoidSigmoid,
            init: WeightInit::Unit,
        }
    }

    fn config() -> EvolutionConfig {
        EvolutionConfig {
            population_size: 4,
            breeding_pool: 2,
            matches_per_agent: 2,
            mutation_rate: 0.1,
            worker_count: 2,
            exploration: false,
            seed: Some(1234),
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(config().validate().is_ok());
        let mut bad = config();
        bad.population_size = 0;
        assert_eq!(bad.validate().unwrap_err(), ConfigError::ZeroPopulation);
        let mut bad = config();
        bad.breeding_pool = 5;
        assert!(matches!(
            bad.validate().unwrap_err(),
            ConfigError::BreedingPoolTooLarge { pool: 5, population: 4 }
        ));
        let mut bad = config();
        bad.mutation_rate = 1.5;
        assert!(matches!(
            bad.validate().unwrap_err(),
            ConfigError::MutationRateOutOfRange { .. }
        ));
        let mut bad = config();
        bad.worker_count = 0;
        assert_eq!(bad.validate().unwrap_err(), ConfigError::ZeroWorkers);
    }

    #[test]
    fn test_narrow_blueprint_is_rejected() {
        let mut narrow = blueprint();
        narrow.output_size = CELL_COUNT - 1;
        assert!(matches!(
            Trainer::new(config(), narrow).unwrap_err(),
            ConfigError::OutputTooNarrow { .. }
        ));
    }

    #[test]
    fn test_mismatched_input_blueprint_is_rejected() {
        let mut wrong = blueprint();
        wrong.input_size = 10;
        assert_eq!(
            Trainer::new(config(), wrong).unwrap_err(),
            ConfigError::InputWidthMismatch { input_size: 10 }
        );
    }

    #[test]
    fn test_generation_ranks_descending_and_plays_all_matches() {
        let mut trainer = Trainer::new(config(), blueprint()).unwrap();
        let report = trainer.run_generation();
        assert_eq!(report.generation, 0);
        assert_eq!(report.matches_played, 8);
        assert_eq!(report.ranked_fitness.len(), 4);
        assert!(
            report
                .ranked_fitness
                .windows(2)
                .all(|w| w[0] >= w[1])
        );
        assert_eq!(report.best.output_size, CELL_COUNT);
    }

    #[test]
    fn test_evolve_keeps_population_size_and_advances_generation() {
        let mut trainer = Trainer::new(config(), blueprint()).unwrap();
        trainer.run_generation();
        trainer.evolve();
        assert_eq!(trainer.generation(), 1);
        assert_eq!(trainer.population().len(), 4);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let run = || {
            let mut trainer = Trainer::new(config(), blueprint()).unwrap();
            let first = trainer.run_generation();
            trainer.evolve();
            let second = trainer.run_generation();
            (first.ranked_fitness, second.ranked_fitness)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_fitness_does_not_accumulate_across_generations() {
        let mut trainer = Trainer::new(config(), blueprint()).unwrap();
        let first = trainer.run_generation();
        // Re-running the same population must not compound earlier scores.
        let again = trainer.run_generation();
        let bound = 64.0 * f64::from(u32::try_from(trainer.config.matches_per_agent).unwrap());
        // Each agent appears in at most matches_per_agent * population
        // pairings; one generation's score can never exceed that many
        // full-board wins.
        for fitness in first.ranked_fitness.iter().chain(&again.ranked_fitness) {
            assert!(fitness.abs() <= bound * 4.0);
        }
    }

    #[test]
    fn test_exploration_mode_runs() {
        let mut cfg = config();
        cfg.exploration = true;
        let mut trainer = Trainer::new(cfg, blueprint()).unwrap();
        let report = trainer.run_generation();
        assert_eq!(report.matches_played, 8);
    }

    #[test]
    fn test_resume_keeps_leader() {
        let mut trainer = Trainer::new(config(), blueprint()).unwrap();
        let report = trainer.run_generation();
        let leader = Network::from_snapshot(report.best.clone()).unwrap();
        let resumed = Trainer::resume(config(), blueprint(), leader.clone()).unwrap();
        assert_eq!(resumed.population().len(), 4);
        assert_eq!(resumed.population().individuals()[0].network(), &leader);
    }

    #[test]
    fn test_resume_rejects_mismatched_leader() {
        let mut other = blueprint();
        other.hidden_size = 8;
        let mut rng = Pcg64Mcg::seed_from_u64(50);
        let leader = other.build(&mut rng);
        assert_eq!(
            Trainer::resume(config(), blueprint(), leader).unwrap_err(),
            ConfigError::ResumeTopologyMismatch
        );
    }
}
