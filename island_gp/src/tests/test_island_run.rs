use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use program_trees::{Branch, ModuleTree, Symbol, Tree};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::common::{small_options, T};
use crate::error::GpError;
use crate::generation::Island;
use crate::islands::migrate;
use crate::options::Options;
use crate::run::{run, run_with_stop};
use crate::stop::StopFlag;

#[test]
fn zeroed_budget_fields_are_rejected() {
    for field in ["iterations", "migrations", "num_islands", "population_size"] {
        let mut options = small_options(|_| Ok(0.0));
        match field {
            "iterations" => options.iterations = 0,
            "migrations" => options.migrations = 0,
            "num_islands" => options.num_islands = 0,
            _ => options.population_size = 0,
        }
        let err = run(&options).unwrap_err();
        assert!(matches!(err, GpError::InvalidConfig(_)), "{field}");
    }
}

#[test]
fn empty_function_set_is_rejected_at_positive_max_depth() {
    let mut options = small_options(|_| Ok(0.0));
    options.functions = Vec::new();
    let err = run(&options).unwrap_err();
    assert!(matches!(err, GpError::InvalidConfig(_)));
}

#[test]
fn conflicting_operator_arities_are_rejected() {
    let mut options = small_options(|_| Ok(0.0));
    options.functions.push(program_trees::Op::new("+", 3));
    let err = run(&options).unwrap_err();
    assert!(matches!(err, GpError::InvalidConfig(_)));
}

#[test]
fn out_of_range_mutation_probability_is_rejected() {
    for p in [-0.1, 1.5, f64::NAN] {
        let mut options = small_options(|_| Ok(0.0));
        options.mutation_probability = p;
        let err = run(&options).unwrap_err();
        assert!(matches!(err, GpError::InvalidConfig(_)));
    }
}

#[test]
fn migration_preserves_island_sizes_and_moves_one_neighbor() {
    let leaf = |name: &str| ModuleTree::plain(Tree::<T>::Var(Symbol::from(name)));
    let mut islands: Vec<Island<T>> = (0..3)
        .map(|i| {
            Island::new(
                (0..4).map(|j| leaf(&format!("i{i}m{j}"))).collect(),
                i as u64,
            )
        })
        .collect();
    let old: Vec<Vec<ModuleTree<T>>> = islands.iter().map(|isl| isl.population.clone()).collect();

    let mut rng = StdRng::seed_from_u64(8);
    migrate(&mut rng, &mut islands).unwrap();

    for (i, island) in islands.iter().enumerate() {
        assert_eq!(island.population.len(), 4);
        // The migrant is prepended and always comes from the ring neighbor.
        assert!(old[(i + 1) % 3].contains(&island.population[0]));
    }
}

#[test]
fn module_runs_present_the_envelope_to_the_fitness_callback() {
    let violated = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&violated);
    let options = Options {
        adf_count: 2,
        adf_arity: 1,
        ..small_options(move |module| {
            let ok = module.branches.len() == 2
                && matches!(&module.branches[0], Branch::Adf(b)
                    if b.name.as_str() == "adf0" && b.params.len() == 1)
                && matches!(&module.branches[1], Branch::Adf(b)
                    if b.name.as_str() == "adf1" && b.params.len() == 1);
            if !ok {
                flag.store(true, Ordering::Relaxed);
            }
            Ok(1.0)
        })
    };

    run(&options).unwrap();
    assert!(!violated.load(Ordering::Relaxed));
}

#[test]
fn reported_best_is_monotone_across_migration_rounds() {
    let seen = Arc::new(Mutex::new(Vec::<T>::new()));
    let log = Arc::clone(&seen);
    let options = Options {
        iterations: 2,
        migrations: 6,
        num_islands: 3,
        population_size: 10,
        max_depth: 4,
        mutation_depth: 3,
        seed: 7,
        ..small_options(|module| Ok(module.body.size() as T))
    };
    let options = Options {
        report: Arc::new(move |_: &ModuleTree<T>, fitness: T| {
            log.lock().unwrap().push(fitness);
        }),
        ..options
    };

    run(&options).unwrap();

    let seen = seen.lock().unwrap();
    assert!(!seen.is_empty());
    for pair in seen.windows(2) {
        assert!(pair[1] <= pair[0]);
    }
}

#[test]
fn fixed_seeds_reproduce_the_run() {
    let make_options = || Options {
        iterations: 3,
        migrations: 3,
        num_islands: 2,
        population_size: 8,
        max_depth: 4,
        mutation_depth: 3,
        seed: 1234,
        ..small_options(|module| Ok(module.body.size() as T))
    };

    let first = run(&make_options()).unwrap();
    let second = run(&make_options()).unwrap();

    assert_eq!(first.best_fitness, second.best_fitness);
    assert_eq!(first.best_tree, second.best_tree);
    assert_eq!(first.evaluations, second.evaluations);
}

#[test]
fn failures_are_reported_once_per_tree_per_round() {
    let fitness_calls = Arc::new(AtomicUsize::new(0));
    let failure_records = Arc::new(AtomicUsize::new(0));

    let calls = Arc::clone(&fitness_calls);
    let records = Arc::clone(&failure_records);
    let options = Options {
        iterations: 4,
        migrations: 2,
        num_islands: 1,
        population_size: 1,
        mutation_probability: 0.0,
        max_depth: 0,
        functions: Vec::new(),
        numbers: Vec::new(),
        failure_report: Some(Arc::new(move |_: &ModuleTree<T>, _: &anyhow::Error| {
            records.fetch_add(1, Ordering::Relaxed);
        })),
        ..small_options(move |_| {
            calls.fetch_add(1, Ordering::Relaxed);
            anyhow::bail!("always failing")
        })
    };

    let result = run(&options).unwrap();

    // A single stable individual: scored once per generation, with the
    // failure surfaced once per migration round.
    assert!(result.best_fitness.is_infinite());
    assert_eq!(fitness_calls.load(Ordering::Relaxed), 8);
    assert_eq!(failure_records.load(Ordering::Relaxed), 2);
}

#[test]
fn cancelled_runs_still_return_a_best_individual() {
    let reports = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&reports);
    let mut options = small_options(|_| Ok(1.0));
    options.report = Arc::new(move |_: &ModuleTree<T>, _: T| {
        counter.fetch_add(1, Ordering::Relaxed);
    });

    let stop = StopFlag::new();
    stop.cancel();
    let result = run_with_stop(&options, &stop).unwrap();

    assert_eq!(result.best_fitness, 1.0);
    assert_eq!(reports.load(Ordering::Relaxed), 0);
    assert!(result.evaluations >= 1);
}
