use std::collections::HashMap;

use program_trees::{ModuleTree, Op, Symbol, Tree};

use crate::options::Options;

pub(crate) type T = f64;

pub(crate) fn arith_functions() -> Vec<Op> {
    vec![Op::new("+", 2), Op::new("-", 2), Op::new("*", 2)]
}

pub(crate) fn arity_map(functions: &[Op]) -> HashMap<Symbol, usize> {
    functions
        .iter()
        .map(|op| (op.name.clone(), op.arity))
        .collect()
}

pub(crate) fn arity_consistent(tree: &Tree<T>, arities: &HashMap<Symbol, usize>) -> bool {
    match tree {
        Tree::Var(_) | Tree::Num(_) => true,
        Tree::App(op, children) => {
            arities.get(op).is_some_and(|&arity| arity == children.len())
                && children.iter().all(|child| arity_consistent(child, arities))
        }
    }
}

/// The S1/S2 option set: one island, four individuals, one generation.
pub(crate) fn small_options<F>(fitness: F) -> Options<T>
where
    F: Fn(&ModuleTree<T>) -> anyhow::Result<T> + Send + Sync + 'static,
{
    Options {
        iterations: 1,
        migrations: 1,
        num_islands: 1,
        population_size: 4,
        tournament_size: 2,
        mutation_depth: 2,
        max_depth: 3,
        terminals: vec![Symbol::from("x")],
        numbers: vec![1.0, 2.0],
        functions: vec![Op::new("+", 2), Op::new("*", 2)],
        ..Options::new(fitness, |_, _| {})
    }
}
