//! Convenience re-exports for examples and quickstarts.

pub use crate::builder::{
    build_tree, create_module_tree, random_population, random_terminal, BuildMode,
};
pub use crate::error::GpError;
pub use crate::generation::{generations, GenerationOutcome, Island};
pub use crate::options::Options;
pub use crate::run::{run, run_with_stop, RunResult};
pub use crate::stop::StopFlag;
pub use crate::variation::{
    crossover, crossover_module, mutate_module, mutate_population, mutate_tree, MutationKind,
};

// Re-export the tree types so callers don't need to depend on
// `program_trees` directly.
pub use program_trees::{
    rand_subtree, replace_subtree, truncate, truncate_module, AdfBranch, AdlBranch, Branch,
    ModuleTree, Op, Symbol, Tree,
};
