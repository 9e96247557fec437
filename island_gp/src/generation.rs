use std::collections::HashMap;
use std::fmt::Display;

use num_traits::Float;
use program_trees::{truncate_module, ModuleTree};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::builder::random_population;
use crate::error::GpError;
use crate::options::Options;
use crate::selection::{score_population, tournament};
use crate::variation::mutate_population;

/// One population plus the state it owns for the duration of the run: an
/// independent random source, the best individual it has ever scored, and its
/// evaluation counter.
pub struct Island<T: Float> {
    pub population: Vec<ModuleTree<T>>,
    pub(crate) rng: StdRng,
    pub(crate) best: Option<(ModuleTree<T>, T)>,
    pub(crate) evals: u64,
    pub(crate) reported_failures: HashMap<u64, Vec<ModuleTree<T>>>,
}

impl<T: Float> Island<T> {
    pub fn new(population: Vec<ModuleTree<T>>, seed: u64) -> Self {
        Self {
            population,
            rng: StdRng::seed_from_u64(seed),
            best: None,
            evals: 0,
            reported_failures: HashMap::new(),
        }
    }

    /// Island `index` of a run: derives its generator from the master seed
    /// and seeds its own population.
    pub(crate) fn seeded(index: u64, options: &Options<T>) -> Result<Self, GpError> {
        let mut rng = StdRng::seed_from_u64(options.seed.wrapping_add(index));
        let population = random_population(&mut rng, options)?;
        Ok(Self {
            population,
            rng,
            best: None,
            evals: 0,
            reported_failures: HashMap::new(),
        })
    }

    pub fn evaluations(&self) -> u64 {
        self.evals
    }

    fn note_best(&mut self, tree: ModuleTree<T>, fitness: T) {
        let improved = match &self.best {
            None => true,
            Some((_, current)) => fitness < *current,
        };
        if improved {
            self.best = Some((tree, fitness));
        }
    }
}

pub struct GenerationOutcome<T> {
    pub best_tree: ModuleTree<T>,
    pub best_fitness: T,
    /// A perfect individual (fitness 0) was found and the loop stopped early.
    pub solved: bool,
}

/// Run up to `n` generations on one island: score, check for a perfect
/// individual, then breed the next population (tournament-select, mutate,
/// truncate to `max_depth`, and re-insert the best-so-far as the elite).
pub fn generations<T>(
    island: &mut Island<T>,
    n: usize,
    options: &Options<T>,
) -> Result<GenerationOutcome<T>, GpError>
where
    T: Float + Display,
{
    island.reported_failures.clear();

    for _ in 0..n {
        let fitness = score_population(
            &island.population,
            options,
            &mut island.reported_failures,
            &mut island.evals,
        );

        let mut best_index = 0;
        for (i, f) in fitness.iter().enumerate() {
            if *f < fitness[best_index] {
                best_index = i;
            }
        }
        let generation_best = island.population[best_index].clone();
        island.note_best(generation_best, fitness[best_index]);

        if fitness[best_index] <= T::zero() {
            let (best_tree, best_fitness) = island
                .best
                .clone()
                .ok_or(GpError::Unreachable("solved generation without a best"))?;
            return Ok(GenerationOutcome {
                best_tree,
                best_fitness,
                solved: true,
            });
        }

        let mut selected = Vec::with_capacity(island.population.len());
        for _ in 0..island.population.len() {
            selected.push(tournament(
                &mut island.rng,
                &island.population,
                &fitness,
                options,
            )?);
        }

        let mutated = mutate_population(&mut island.rng, &selected, options)?;

        let mut next = Vec::with_capacity(mutated.len());
        for child in mutated {
            next.push(truncate_module(&mut island.rng, child, options.max_depth)?);
        }

        let (elite, _) = island
            .best
            .clone()
            .ok_or(GpError::Unreachable("elitism before any generation was scored"))?;
        next[0] = elite;

        island.population = next;
    }

    let (best_tree, best_fitness) = island
        .best
        .clone()
        .ok_or(GpError::Unreachable("generation loop ran zero generations"))?;
    Ok(GenerationOutcome {
        best_tree,
        best_fitness,
        solved: false,
    })
}
