use std::{num::NonZero, path::PathBuf, thread};

use anyhow::Context as _;
use chrono::Utc;
use evothello_agent::INPUT_SIZE;
use evothello_engine::CELL_COUNT;
use evothello_network::{ActivationPair, Network, WeightInit};
use evothello_training::{EvolutionConfig, NetworkBlueprint, Trainer};

use crate::{
    model::TrainedModel,
    util::{self, Output},
};

fn default_workers() -> usize {
    thread::available_parallelism().map_or(1, NonZero::get)
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Number of generations to train; 0 runs until interrupted
    #[arg(long, default_value_t = 100)]
    generations: usize,
    /// Number of networks per generation
    #[arg(long, default_value_t = 24)]
    population: usize,
    /// Top-ranked agents that breed the next generation
    #[arg(long, default_value_t = 6)]
    breeding_pool: usize,
    /// Matches scheduled per agent per generation
    #[arg(long, default_value_t = 4)]
    matches_per_agent: usize,
    /// Per-gene mutation probability
    #[arg(long, default_value_t = 0.05)]
    mutation_rate: f64,
    /// Match evaluation worker threads
    #[arg(long, default_value_t = default_workers())]
    workers: usize,
    /// Hidden layer width
    #[arg(long, default_value_t = 32)]
    hidden_size: usize,
    /// Activation pair: "sigmoid-sigmoid" or "relu-sigmoid"
    #[arg(long, default_value = "sigmoid-sigmoid")]
    activation: ActivationPair,
    /// Play the white side with uniformly random moves
    #[arg(long)]
    explore: bool,
    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    /// Model name recorded in the output file
    #[arg(long, default_value = "evothello")]
    name: String,
    /// Output file path; the leader is checkpointed here every generation
    #[arg(long)]
    output: Option<PathBuf>,
    /// Resume from a previously saved model; a missing file starts fresh
    #[arg(long)]
    resume: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let config = EvolutionConfig {
        population_size: arg.population,
        breeding_pool: arg.breeding_pool,
        matches_per_agent: arg.matches_per_agent,
        mutation_rate: arg.mutation_rate,
        worker_count: arg.workers,
        exploration: arg.explore,
        seed: arg.seed,
    };
    let blueprint = NetworkBlueprint {
        input_size: INPUT_SIZE,
        hidden_size: arg.hidden_size,
        output_size: CELL_COUNT,
        activation: arg.activation,
        init: WeightInit::Unit,
    };

    // Generation numbers continue across resumed runs even though the
    // trainer itself restarts at zero.
    let mut base_generation = 0;
    let mut trainer = match arg.resume.as_deref().filter(|path| path.exists()) {
        Some(path) => {
            let model = util::read_model_file(path)?;
            let leader = Network::from_snapshot(model.network)
                .with_context(|| format!("Invalid network in model file: {}", path.display()))?;
            eprintln!(
                "Resuming {} from generation {}",
                path.display(),
                model.generation
            );
            base_generation = model.generation + 1;
            Trainer::resume(config, blueprint, leader)?
        }
        None => {
            if let Some(path) = &arg.resume {
                eprintln!("No model at {}; starting fresh", path.display());
            }
            Trainer::new(config, blueprint)?
        }
    };

    let mut completed = 0;
    let mut last_model = None;
    loop {
        let report = trainer.run_generation();
        let generation = base_generation + report.generation;
        eprintln!("Generation #{generation}:");
        eprintln!("  Matches: {}", report.matches_played);
        eprintln!("  Fitness:");
        eprintln!("    Min:    {:.1}", report.fitness_stats.min);
        eprintln!("    Max:    {:.1}", report.fitness_stats.max);
        eprintln!("    Mean:   {:.1}", report.fitness_stats.mean);
        eprintln!("    Stddev: {:.1}", report.fitness_stats.std_dev);
        eprintln!("    Ranked: {:.1?}", report.ranked_fitness);

        let model = TrainedModel {
            name: arg.name.clone(),
            trained_at: Utc::now(),
            generation,
            final_fitness: report.ranked_fitness[0],
            network: report.best,
        };
        if arg.output.is_some() {
            Output::save_json(&model, arg.output.clone())?;
        }
        last_model = Some(model);

        completed += 1;
        if arg.generations != 0 && completed >= arg.generations {
            break;
        }
        trainer.evolve();
    }

    let model = last_model.expect("at least one generation ran");
    if arg.output.is_none() {
        Output::save_json(&model, None)?;
    }

    eprintln!();
    eprintln!("Training completed.");
    if let Some(path) = &arg.output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Name: {}", model.name);
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Generation: {}", model.generation);
    eprintln!("  Final fitness: {:.1}", model.final_fitness);

    Ok(())
}
