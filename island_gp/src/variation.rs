use num_traits::Float;
use program_trees::{rand_subtree, replace_subtree, AdfBranch, AdlBranch, Branch, ModuleTree, Tree};
use rand::Rng;

use crate::builder::{build_tree, random_terminal, BuildMode};
use crate::error::GpError;
use crate::options::Options;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MutationKind {
    /// Replace a random sub-tree with a freshly grown one.
    SubtreeGrow,
    /// Replace a random sub-tree with a single terminal.
    PointTerminal,
    /// Raise a random sub-tree to the root.
    Lift,
}

/// Mutate `tree` with probability `mutation_probability`, choosing one of the
/// three kinds uniformly; otherwise return it unchanged.
pub fn mutate_tree<T: Float, R: Rng + ?Sized>(
    rng: &mut R,
    tree: &Tree<T>,
    options: &Options<T>,
) -> Result<Tree<T>, GpError> {
    if !rng.random_bool(options.mutation_probability) {
        return Ok(tree.clone());
    }

    let kind = match rng.random_range(0..3u8) {
        0 => MutationKind::SubtreeGrow,
        1 => MutationKind::PointTerminal,
        _ => MutationKind::Lift,
    };
    match kind {
        MutationKind::SubtreeGrow => {
            let depth = if options.functions.is_empty() {
                0
            } else {
                options.mutation_depth
            };
            let sub = build_tree(
                rng,
                depth,
                depth,
                &options.terminals,
                &options.numbers,
                &options.functions,
                BuildMode::Grow,
            )?;
            Ok(replace_subtree(rng, tree, sub))
        }
        MutationKind::PointTerminal => {
            let sub = random_terminal(rng, &options.terminals, &options.numbers)?;
            Ok(replace_subtree(rng, tree, sub))
        }
        MutationKind::Lift => Ok(rand_subtree(rng, tree).clone()),
    }
}

/// Graft a random sub-tree of `second` at a random point of `first`.
///
/// Strictly asymmetric: the child inherits its skeleton from `first` and a
/// single graft from `second`, and each mating produces one child.
pub fn crossover<T: Clone, R: Rng + ?Sized>(
    rng: &mut R,
    first: &Tree<T>,
    second: &Tree<T>,
) -> Tree<T> {
    let graft = rand_subtree(rng, second).clone();
    replace_subtree(rng, first, graft)
}

/// Branch-preserving mutation. A fair coin (forced to the body when the
/// envelope is empty) sends the mutation to the result body or to one
/// uniformly chosen branch; names, parameter vectors, and loop limits are
/// never touched.
pub fn mutate_module<T: Float, R: Rng + ?Sized>(
    rng: &mut R,
    module: &ModuleTree<T>,
    options: &Options<T>,
) -> Result<ModuleTree<T>, GpError> {
    if module.branches.is_empty() || rng.random_bool(0.5) {
        return Ok(ModuleTree {
            branches: module.branches.clone(),
            body: mutate_tree(rng, &module.body, options)?,
        });
    }

    let index = rng.random_range(0..module.branches.len());
    let mut branches = module.branches.clone();
    branches[index] = match &module.branches[index] {
        Branch::Adf(b) => Branch::Adf(AdfBranch {
            name: b.name.clone(),
            params: b.params.clone(),
            body: mutate_tree(rng, &b.body, options)?,
        }),
        Branch::Adl(b) => Branch::Adl(AdlBranch {
            name: b.name.clone(),
            init: mutate_tree(rng, &b.init, options)?,
            cond: mutate_tree(rng, &b.cond, options)?,
            body: mutate_tree(rng, &b.body, options)?,
            update: mutate_tree(rng, &b.update, options)?,
            limit: b.limit,
        }),
    };
    Ok(ModuleTree {
        branches,
        body: module.body.clone(),
    })
}

/// Branch-preserving crossover. Like [`mutate_module`], a fair coin picks the
/// result body or a single branch slot; crossed branches keep the first
/// parent's name, parameters, and loop limit.
pub fn crossover_module<T: Float, R: Rng + ?Sized>(
    rng: &mut R,
    first: &ModuleTree<T>,
    second: &ModuleTree<T>,
) -> Result<ModuleTree<T>, GpError> {
    if first.branches.is_empty() || rng.random_bool(0.5) {
        return Ok(ModuleTree {
            branches: first.branches.clone(),
            body: crossover(rng, &first.body, &second.body),
        });
    }

    let index = rng.random_range(0..first.branches.len());
    let other = second
        .branches
        .get(index)
        .ok_or(GpError::Unreachable("module envelopes disagree on branch count"))?;
    let mut branches = first.branches.clone();
    branches[index] = match (&first.branches[index], other) {
        (Branch::Adf(a), Branch::Adf(b)) => Branch::Adf(AdfBranch {
            name: a.name.clone(),
            params: a.params.clone(),
            body: crossover(rng, &a.body, &b.body),
        }),
        (Branch::Adl(a), Branch::Adl(b)) => Branch::Adl(AdlBranch {
            name: a.name.clone(),
            init: crossover(rng, &a.init, &b.init),
            cond: crossover(rng, &a.cond, &b.cond),
            body: crossover(rng, &a.body, &b.body),
            update: crossover(rng, &a.update, &b.update),
            limit: a.limit,
        }),
        _ => {
            return Err(GpError::Unreachable(
                "module envelopes disagree on branch kind",
            ))
        }
    };
    Ok(ModuleTree {
        branches,
        body: first.body.clone(),
    })
}

/// Apply [`mutate_module`] to every member, preserving order. With a zero
/// mutation probability this is structurally the identity.
pub fn mutate_population<T: Float, R: Rng + ?Sized>(
    rng: &mut R,
    population: &[ModuleTree<T>],
    options: &Options<T>,
) -> Result<Vec<ModuleTree<T>>, GpError> {
    population
        .iter()
        .map(|member| mutate_module(rng, member, options))
        .collect()
}
