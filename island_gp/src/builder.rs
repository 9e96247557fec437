use num_traits::Float;
use program_trees::{AdfBranch, AdlBranch, Branch, ModuleTree, Op, Symbol, Tree};
use rand::Rng;

use crate::error::GpError;
use crate::options::Options;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// May stop at a terminal at any level once `depth_min` is exhausted.
    Grow,
    /// Always extends to `depth_max`.
    Fill,
}

/// Draw a random terminal: a fair coin picks a variable symbol, falling back
/// to the numeric literals on tails (and to variables again when there are no
/// literals).
pub fn random_terminal<T: Float, R: Rng + ?Sized>(
    rng: &mut R,
    terminals: &[Symbol],
    numbers: &[T],
) -> Result<Tree<T>, GpError> {
    if terminals.is_empty() && numbers.is_empty() {
        return Err(GpError::InvalidConfig(
            "cannot draw a terminal: both the terminal and number sets are empty".into(),
        ));
    }
    if terminals.is_empty() {
        return Ok(Tree::Num(numbers[rng.random_range(0..numbers.len())]));
    }
    if rng.random_bool(0.5) || numbers.is_empty() {
        Ok(Tree::Var(terminals[rng.random_range(0..terminals.len())].clone()))
    } else {
        Ok(Tree::Num(numbers[rng.random_range(0..numbers.len())]))
    }
}

/// Grow a random tree of height at most `depth_max`. In `Grow` mode the walk
/// may stop at a terminal once `depth_min` reaches zero; in `Fill` mode every
/// path runs the full depth.
pub fn build_tree<T: Float, R: Rng + ?Sized>(
    rng: &mut R,
    depth_max: usize,
    depth_min: usize,
    terminals: &[Symbol],
    numbers: &[T],
    functions: &[Op],
    mode: BuildMode,
) -> Result<Tree<T>, GpError> {
    if depth_max == 0 {
        return random_terminal(rng, terminals, numbers);
    }
    if functions.is_empty() {
        return Err(GpError::InvalidConfig(
            "function set is empty but depth_max > 0".into(),
        ));
    }
    if mode == BuildMode::Grow && depth_min == 0 && rng.random_bool(0.5) {
        return random_terminal(rng, terminals, numbers);
    }

    let op = &functions[rng.random_range(0..functions.len())];
    let children = (0..op.arity)
        .map(|_| {
            build_tree(
                rng,
                depth_max - 1,
                depth_min.saturating_sub(1),
                terminals,
                numbers,
                functions,
                mode,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Tree::App(op.name.clone(), children))
}

fn grow_branch_body<T: Float, R: Rng + ?Sized>(
    rng: &mut R,
    depth: usize,
    terminals: &[Symbol],
    numbers: &[T],
    functions: &[Op],
) -> Result<Tree<T>, GpError> {
    if functions.is_empty() {
        // The first ADF has nothing callable below it (and a caller may run
        // with an empty function set when max_depth is 0).
        return random_terminal(rng, terminals, numbers);
    }
    build_tree(rng, depth, 0, terminals, numbers, functions, BuildMode::Grow)
}

/// Build one individual: the result body plus its ADF/ADL branches.
///
/// `adf<i>` may call `adf<j>` only for `j < i`, so the definitions form a DAG
/// and evolved programs cannot recurse. The result body sees every ADF as a
/// callable and every ADL name as an extra terminal. Without branches the
/// envelope is empty and the individual is just the built tree.
pub fn create_module_tree<T: Float, R: Rng + ?Sized>(
    rng: &mut R,
    depth_max: usize,
    depth_min: usize,
    mode: BuildMode,
    options: &Options<T>,
) -> Result<ModuleTree<T>, GpError> {
    if options.adf_count == 0 && options.adl_count == 0 {
        let body = build_tree(
            rng,
            depth_max,
            depth_min,
            &options.terminals,
            &options.numbers,
            &options.functions,
            mode,
        )?;
        return Ok(ModuleTree::plain(body));
    }

    let mut branches = Vec::with_capacity(options.adf_count + options.adl_count);

    let params: Vec<Symbol> = (0..options.adf_arity)
        .map(|i| Symbol::from(format!("arg{i}")))
        .collect();
    let mut adf_terminals = options.terminals.clone();
    adf_terminals.extend(params.iter().cloned());

    let mut adf_ops: Vec<Op> = Vec::with_capacity(options.adf_count);
    for i in 0..options.adf_count {
        let mut callable = options.functions.clone();
        callable.extend(adf_ops.iter().cloned());
        let body = grow_branch_body(rng, depth_max, &adf_terminals, &options.numbers, &callable)?;
        let name = ModuleTree::<T>::adf_name(i);
        branches.push(Branch::Adf(AdfBranch {
            name: name.clone(),
            params: params.clone(),
            body,
        }));
        adf_ops.push(Op::new(name, options.adf_arity));
    }

    for i in 0..options.adl_count {
        let mut grow = || {
            grow_branch_body(
                rng,
                depth_max,
                &options.terminals,
                &options.numbers,
                &options.functions,
            )
        };
        let init = grow()?;
        let cond = grow()?;
        let body = grow()?;
        let update = grow()?;
        branches.push(Branch::Adl(AdlBranch {
            name: ModuleTree::<T>::adl_name(i),
            init,
            cond,
            body,
            update,
            limit: options.adl_limit,
        }));
    }

    let mut result_terminals = options.terminals.clone();
    result_terminals.extend((0..options.adl_count).map(ModuleTree::<T>::adl_name));
    let mut result_functions = options.functions.clone();
    result_functions.extend(adf_ops);
    let body = build_tree(
        rng,
        depth_max,
        depth_min,
        &result_terminals,
        &options.numbers,
        &result_functions,
        mode,
    )?;

    Ok(ModuleTree { branches, body })
}

/// Seed one island's population, ramped half-and-half: each individual draws
/// its own depth from `[1, mutation_depth]` and a fair coin between Grow and
/// Fill.
pub fn random_population<T: Float, R: Rng + ?Sized>(
    rng: &mut R,
    options: &Options<T>,
) -> Result<Vec<ModuleTree<T>>, GpError> {
    (0..options.population_size)
        .map(|_| {
            let depth = if options.functions.is_empty() {
                0
            } else {
                rng.random_range(1..=options.mutation_depth)
            };
            let mode = if rng.random_bool(0.5) {
                BuildMode::Grow
            } else {
                BuildMode::Fill
            };
            create_module_tree(rng, depth, depth, mode, options)
        })
        .collect()
}
