use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Display;

use num_traits::Float;
use program_trees::ModuleTree;
use rand::Rng;

use crate::error::GpError;
use crate::options::Options;
use crate::variation::crossover_module;

/// Score every member of a population, invoking the fitness callback once per
/// distinct tree. Fingerprints only bucket candidates; a cache hit is trusted
/// only after a structural equality check, so hash collisions cannot share a
/// score. Nothing is cached across generations.
///
/// A callback error or non-finite result scores the tree as `+inf` so it
/// loses every tournament; each offending tree is recorded at most once per
/// entry in `reported_failures` (cleared at migration-round boundaries).
pub(crate) fn score_population<T>(
    population: &[ModuleTree<T>],
    options: &Options<T>,
    reported_failures: &mut HashMap<u64, Vec<ModuleTree<T>>>,
    evals: &mut u64,
) -> Vec<T>
where
    T: Float + Display,
{
    let mut seen: HashMap<u64, Vec<usize>> = HashMap::with_capacity(population.len());
    let mut scores: Vec<T> = Vec::with_capacity(population.len());

    for (index, tree) in population.iter().enumerate() {
        let key = tree.fingerprint();
        let bucket = seen.entry(key).or_default();
        if let Some(&prev) = bucket.iter().find(|&&prev| population[prev] == *tree) {
            scores.push(scores[prev]);
            continue;
        }
        bucket.push(index);

        *evals += 1;
        let fitness = match (options.fitness)(tree) {
            Ok(value) if value.is_finite() => value,
            Ok(_) => {
                let err = anyhow::anyhow!("fitness callback returned a non-finite value");
                record_failure(tree, &err, key, options, reported_failures);
                T::infinity()
            }
            Err(err) => {
                record_failure(tree, &err, key, options, reported_failures);
                T::infinity()
            }
        };
        scores.push(fitness);
    }

    scores
}

fn record_failure<T: Float + Display>(
    tree: &ModuleTree<T>,
    err: &anyhow::Error,
    key: u64,
    options: &Options<T>,
    reported_failures: &mut HashMap<u64, Vec<ModuleTree<T>>>,
) {
    let bucket = reported_failures.entry(key).or_default();
    if bucket.iter().any(|reported| reported == tree) {
        return;
    }
    bucket.push(tree.clone());

    log::warn!("fitness evaluation failed for {tree}: {err}; scoring as +inf");
    if let Some(hook) = &options.failure_report {
        hook(tree, err);
    }
}

/// Sample `tournament_size` members uniformly with replacement and breed the
/// best two by crossover. Larger tournaments mean stronger selective
/// pressure.
pub(crate) fn tournament<T, R>(
    rng: &mut R,
    population: &[ModuleTree<T>],
    fitness: &[T],
    options: &Options<T>,
) -> Result<ModuleTree<T>, GpError>
where
    T: Float,
    R: Rng + ?Sized,
{
    let mut entrants: Vec<usize> = (0..options.tournament_size)
        .map(|_| rng.random_range(0..population.len()))
        .collect();
    entrants.sort_by(|&a, &b| {
        fitness[a]
            .partial_cmp(&fitness[b])
            .unwrap_or(Ordering::Greater)
    });
    let best = &population[entrants[0]];
    // A size-1 tournament degenerates to breeding the sample with itself.
    let second = &population[entrants[if entrants.len() > 1 { 1 } else { 0 }]];
    crossover_module(rng, best, second)
}
