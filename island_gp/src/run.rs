use std::fmt::Display;

use num_traits::Float;
use program_trees::ModuleTree;

use crate::error::GpError;
use crate::generation::Island;
use crate::islands::island_generations;
use crate::options::Options;
use crate::stop::StopFlag;

/// What a finished run hands back: the final island populations, the best
/// individual observed anywhere, and the total number of fitness evaluations.
#[derive(Debug)]
pub struct RunResult<T: Float> {
    pub islands: Vec<Vec<ModuleTree<T>>>,
    pub best_tree: ModuleTree<T>,
    pub best_fitness: T,
    pub evaluations: u64,
}

/// Validate the options, seed `num_islands` populations, and evolve them for
/// `migrations` rounds of `iterations` generations each. Returns early once
/// any island holds a perfect individual.
pub fn run<T>(options: &Options<T>) -> Result<RunResult<T>, GpError>
where
    T: Float + Display + Send + Sync,
{
    run_with_stop(options, &StopFlag::new())
}

/// [`run`] with a caller-held cancellation flag, checked between migration
/// rounds.
pub fn run_with_stop<T>(options: &Options<T>, stop: &StopFlag) -> Result<RunResult<T>, GpError>
where
    T: Float + Display + Send + Sync,
{
    options.validate()?;

    let islands: Vec<Island<T>> = (0..options.num_islands as u64)
        .map(|index| Island::seeded(index, options))
        .collect::<Result<_, _>>()?;

    let (islands, best_tree, best_fitness) = island_generations(options, islands, stop)?;

    let evaluations = islands.iter().map(Island::evaluations).sum();
    Ok(RunResult {
        islands: islands.into_iter().map(|island| island.population).collect(),
        best_tree,
        best_fitness,
        evaluations,
    })
}
