pub mod module;
pub mod surgery;
pub mod tree;

pub use num_traits;

pub use crate::module::{AdfBranch, AdlBranch, Branch, ModuleTree};
pub use crate::surgery::{
    rand_subtree, rand_subtree_at, replace_subtree, replace_subtree_at, truncate, truncate_module,
    CorruptTree,
};
pub use crate::tree::{Op, Symbol, Tree};
