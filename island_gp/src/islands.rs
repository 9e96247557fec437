use std::fmt::Display;
use std::sync::mpsc;

use num_traits::Float;
use program_trees::ModuleTree;
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};

use crate::error::GpError;
use crate::generation::{generations, GenerationOutcome, Island};
use crate::options::Options;
use crate::selection::score_population;
use crate::stop::StopFlag;

/// One migration step. Island `i` receives a uniformly chosen individual from
/// island `i + 1` (mod N); each receiver shuffles its members, drops one, and
/// prepends the migrant, so population sizes are preserved.
pub(crate) fn migrate<T: Float, R: Rng + ?Sized>(
    rng: &mut R,
    islands: &mut [Island<T>],
) -> Result<(), GpError> {
    let picks: Vec<ModuleTree<T>> = islands
        .iter()
        .map(|island| {
            island
                .population
                .choose(rng)
                .cloned()
                .ok_or(GpError::Unreachable("migration from an empty island"))
        })
        .collect::<Result<_, _>>()?;

    let count = islands.len();
    for (i, island) in islands.iter_mut().enumerate() {
        let migrant = picks[(i + 1) % count].clone();
        island.population.shuffle(rng);
        island.population.pop();
        island.population.insert(0, migrant);
    }
    Ok(())
}

/// Drive up to `migrations` rounds: migrate, run every island's generation
/// loop in parallel, fold the local bests into the global best, report, and
/// stop early on a perfect individual or a cancelled [`StopFlag`].
pub(crate) fn island_generations<T>(
    options: &Options<T>,
    mut islands: Vec<Island<T>>,
    stop: &StopFlag,
) -> Result<(Vec<Island<T>>, ModuleTree<T>, T), GpError>
where
    T: Float + Display + Send + Sync,
{
    let mut driver_rng = StdRng::seed_from_u64(options.seed ^ 0x9e37_79b9_7f4a_7c15);
    let mut global: Option<(ModuleTree<T>, T)> = None;

    for round in 0..options.migrations {
        if stop.is_cancelled() {
            break;
        }
        if islands.len() > 1 {
            migrate(&mut driver_rng, &mut islands)?;
        }

        let count = islands.len();
        let (tx, rx) = mpsc::channel::<(usize, Island<T>, Result<GenerationOutcome<T>, GpError>)>();
        rayon::scope(|scope| {
            for (index, mut island) in islands.drain(..).enumerate() {
                let tx = tx.clone();
                scope.spawn(move |_| {
                    let outcome = generations(&mut island, options.iterations, options);
                    let _ = tx.send((index, island, outcome));
                });
            }
            drop(tx);
        });

        let mut slots: Vec<Option<Island<T>>> = (0..count).map(|_| None).collect();
        let mut outcomes: Vec<Option<Result<GenerationOutcome<T>, GpError>>> =
            (0..count).map(|_| None).collect();
        for (index, island, outcome) in rx.try_iter() {
            slots[index] = Some(island);
            outcomes[index] = Some(outcome);
        }
        islands = slots
            .into_iter()
            .map(|slot| slot.ok_or(GpError::Unreachable("island lost during a parallel round")))
            .collect::<Result<_, _>>()?;

        // Fold in island order so ties resolve the same way on every run.
        for outcome in outcomes {
            let outcome =
                outcome.ok_or(GpError::Unreachable("island finished without an outcome"))??;
            let improved = match &global {
                None => true,
                Some((_, current)) => outcome.best_fitness < *current,
            };
            if improved {
                global = Some((outcome.best_tree, outcome.best_fitness));
            }
        }

        let (best_tree, best_fitness) = global
            .as_ref()
            .ok_or(GpError::Unreachable("migration round produced no best"))?;
        (options.report)(best_tree, *best_fitness);
        log::debug!("migration round {round}: best fitness {best_fitness}");

        if *best_fitness <= T::zero() {
            break;
        }
    }

    let (best_tree, best_fitness) = match global {
        Some(best) => best,
        // Cancelled before the first round completed: score the populations
        // once so the caller still receives a best individual.
        None => best_of_islands(options, &mut islands)?,
    };
    Ok((islands, best_tree, best_fitness))
}

fn best_of_islands<T>(
    options: &Options<T>,
    islands: &mut [Island<T>],
) -> Result<(ModuleTree<T>, T), GpError>
where
    T: Float + Display,
{
    let mut best: Option<(ModuleTree<T>, T)> = None;
    for island in islands.iter_mut() {
        let fitness = score_population(
            &island.population,
            options,
            &mut island.reported_failures,
            &mut island.evals,
        );
        for (member, f) in island.population.iter().zip(fitness) {
            let improved = match &best {
                None => true,
                Some((_, current)) => f < *current,
            };
            if improved {
                best = Some((member.clone(), f));
            }
        }
    }
    best.ok_or(GpError::Unreachable("run held no islands"))
}
