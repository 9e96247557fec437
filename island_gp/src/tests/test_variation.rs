use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use program_trees::{Branch, ModuleTree, Symbol};

use super::common::{arith_functions, arity_consistent, arity_map, small_options, T};
use crate::builder::{build_tree, create_module_tree, BuildMode};
use crate::variation::{crossover, crossover_module, mutate_module, mutate_population, mutate_tree};

fn arb_tree(rng: &mut StdRng, depth: usize) -> program_trees::Tree<T> {
    build_tree(
        rng,
        depth,
        0,
        &[Symbol::from("x")],
        &[1.0, 2.0],
        &arith_functions(),
        BuildMode::Grow,
    )
    .unwrap()
}

fn arb_module(rng: &mut StdRng, options: &crate::options::Options<T>) -> ModuleTree<T> {
    create_module_tree(rng, 4, 0, BuildMode::Grow, options).unwrap()
}

/// The parts of the envelope that variation must never touch.
fn envelope_of(module: &ModuleTree<T>) -> Vec<(String, Option<Vec<String>>, Option<u32>)> {
    module
        .branches
        .iter()
        .map(|branch| match branch {
            Branch::Adf(b) => (
                b.name.as_str().to_owned(),
                Some(b.params.iter().map(|p| p.as_str().to_owned()).collect()),
                None,
            ),
            Branch::Adl(b) => (b.name.as_str().to_owned(), None, Some(b.limit)),
        })
        .collect()
}

#[test]
fn crossover_is_bit_exact_under_a_fixed_seed() {
    let mut setup = StdRng::seed_from_u64(10);
    let first = arb_tree(&mut setup, 4);
    let second = arb_tree(&mut setup, 4);

    let mut rng_a = StdRng::seed_from_u64(99);
    let mut rng_b = StdRng::seed_from_u64(99);
    let child_a = crossover(&mut rng_a, &first, &second);
    let child_b = crossover(&mut rng_b, &first, &second);

    assert_eq!(child_a, child_b);
}

#[test]
fn zero_probability_mutation_is_the_identity() {
    let options = crate::options::Options {
        mutation_probability: 0.0,
        ..small_options(|_| Ok(0.0))
    };
    let mut rng = StdRng::seed_from_u64(11);
    let population: Vec<ModuleTree<T>> = (0..10)
        .map(|_| ModuleTree::plain(arb_tree(&mut rng, 3)))
        .collect();

    let mutated = mutate_population(&mut rng, &population, &options).unwrap();
    assert_eq!(mutated, population);
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn crossover_preserves_well_formedness(rng_seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(rng_seed);
        let first = arb_tree(&mut rng, 4);
        let second = arb_tree(&mut rng, 4);

        let child = crossover(&mut rng, &first, &second);
        prop_assert!(arity_consistent(&child, &arity_map(&arith_functions())));
    }

    #[test]
    fn forced_mutation_preserves_well_formedness(rng_seed in any::<u64>()) {
        let options = crate::options::Options {
            mutation_probability: 1.0,
            ..small_options(|_| Ok(0.0))
        };
        let mut rng = StdRng::seed_from_u64(rng_seed);
        let tree = arb_tree(&mut rng, 4);

        let out = mutate_tree(&mut rng, &tree, &options).unwrap();
        prop_assert!(arity_consistent(&out, &arity_map(&arith_functions())));
    }

    #[test]
    fn module_mutation_preserves_the_envelope(rng_seed in any::<u64>()) {
        let options = crate::options::Options {
            adf_count: 2,
            adl_count: 1,
            mutation_probability: 1.0,
            ..small_options(|_| Ok(0.0))
        };
        let mut rng = StdRng::seed_from_u64(rng_seed);
        let module = arb_module(&mut rng, &options);

        let out = mutate_module(&mut rng, &module, &options).unwrap();
        prop_assert_eq!(envelope_of(&out), envelope_of(&module));
    }

    #[test]
    fn module_crossover_preserves_the_envelope(rng_seed in any::<u64>()) {
        let options = crate::options::Options {
            adf_count: 2,
            adl_count: 1,
            ..small_options(|_| Ok(0.0))
        };
        let mut rng = StdRng::seed_from_u64(rng_seed);
        let first = arb_module(&mut rng, &options);
        let second = arb_module(&mut rng, &options);

        let child = crossover_module(&mut rng, &first, &second).unwrap();
        prop_assert_eq!(envelope_of(&child), envelope_of(&first));
    }
}
