use std::fmt;

use rand::Rng;

use crate::module::{AdfBranch, AdlBranch, Branch, ModuleTree};
use crate::tree::Tree;

/// A tree value violated a structural invariant mid-surgery. Always a bug in
/// whoever produced the tree, never a recoverable condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CorruptTree(pub &'static str);

impl fmt::Display for CorruptTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "corrupt tree: {}", self.0)
    }
}

impl std::error::Error for CorruptTree {}

/// Select a sub-tree by a random descending walk, with the walk budget drawn
/// from `[0, height(tree)]`.
///
/// The walk stops at leaves, at childless applications, or when the budget
/// runs out, and redraws a smaller budget at every step. The resulting
/// distribution is biased toward shallow cuts (the root included); it is NOT
/// uniform over nodes, and that bias is intended.
pub fn rand_subtree<'a, T, R: Rng + ?Sized>(rng: &mut R, tree: &'a Tree<T>) -> &'a Tree<T> {
    let budget = rng.random_range(0..=tree.height());
    rand_subtree_at(rng, tree, budget)
}

/// `rand_subtree` with an explicit walk budget.
pub fn rand_subtree_at<'a, T, R: Rng + ?Sized>(
    rng: &mut R,
    tree: &'a Tree<T>,
    budget: usize,
) -> &'a Tree<T> {
    match tree {
        Tree::Var(_) | Tree::Num(_) => tree,
        Tree::App(_, children) if children.is_empty() || budget == 0 => tree,
        Tree::App(_, children) => {
            let child = &children[rng.random_range(0..children.len())];
            let next = rng.random_range(0..budget);
            rand_subtree_at(rng, child, next)
        }
    }
}

/// Rebuild `tree` along a random descending path and graft `sub` at the
/// stopping point (same stop condition as [`rand_subtree`]).
pub fn replace_subtree<T: Clone, R: Rng + ?Sized>(
    rng: &mut R,
    tree: &Tree<T>,
    sub: Tree<T>,
) -> Tree<T> {
    let budget = rng.random_range(0..=tree.height());
    replace_subtree_at(rng, tree, sub, budget)
}

/// `replace_subtree` with an explicit walk budget.
pub fn replace_subtree_at<T: Clone, R: Rng + ?Sized>(
    rng: &mut R,
    tree: &Tree<T>,
    sub: Tree<T>,
    budget: usize,
) -> Tree<T> {
    match tree {
        Tree::Var(_) | Tree::Num(_) => sub,
        Tree::App(_, children) if children.is_empty() || budget == 0 => sub,
        Tree::App(op, children) => {
            let pick = rng.random_range(1..=children.len());
            let next = rng.random_range(0..budget);
            let mut rebuilt = Vec::with_capacity(children.len());
            rebuilt.extend(children[..pick - 1].iter().cloned());
            rebuilt.push(replace_subtree_at(rng, &children[pick - 1], sub, next));
            rebuilt.extend(children[pick..].iter().cloned());
            Tree::App(op.clone(), rebuilt)
        }
    }
}

/// Shrink `tree` below the height bound by repeatedly replacing it with one
/// of its own random sub-trees. Leaves sit at height 0, so the loop always
/// terminates; a leaf reporting a nonzero height is a corrupt value.
pub fn truncate<T: Clone, R: Rng + ?Sized>(
    rng: &mut R,
    mut tree: Tree<T>,
    max_height: usize,
) -> Result<Tree<T>, CorruptTree> {
    while tree.height() > max_height {
        if tree.is_leaf() {
            return Err(CorruptTree("leaf with nonzero height"));
        }
        tree = rand_subtree(rng, &tree).clone();
    }
    Ok(tree)
}

/// Truncate every branch body and the result body independently, leaving the
/// envelope untouched.
pub fn truncate_module<T: Clone, R: Rng + ?Sized>(
    rng: &mut R,
    module: ModuleTree<T>,
    max_height: usize,
) -> Result<ModuleTree<T>, CorruptTree> {
    let mut branches = Vec::with_capacity(module.branches.len());
    for branch in module.branches {
        branches.push(match branch {
            Branch::Adf(b) => Branch::Adf(AdfBranch {
                name: b.name,
                params: b.params,
                body: truncate(rng, b.body, max_height)?,
            }),
            Branch::Adl(b) => Branch::Adl(AdlBranch {
                name: b.name,
                init: truncate(rng, b.init, max_height)?,
                cond: truncate(rng, b.cond, max_height)?,
                body: truncate(rng, b.body, max_height)?,
                update: truncate(rng, b.update, max_height)?,
                limit: b.limit,
            }),
        });
    }
    Ok(ModuleTree {
        branches,
        body: truncate(rng, module.body, max_height)?,
    })
}
