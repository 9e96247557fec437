pub(crate) mod builder;
pub(crate) mod error;
pub(crate) mod generation;
pub(crate) mod islands;
pub(crate) mod options;
pub(crate) mod run;
pub(crate) mod selection;
pub(crate) mod stop;
pub(crate) mod variation;

pub mod prelude;

pub use builder::{build_tree, create_module_tree, random_population, random_terminal, BuildMode};
pub use error::GpError;
pub use generation::{generations, GenerationOutcome, Island};
pub use options::{FailureFn, FitnessFn, Options, ReportFn};
pub use run::{run, run_with_stop, RunResult};
pub use stop::StopFlag;
pub use variation::{
    crossover, crossover_module, mutate_module, mutate_population, mutate_tree, MutationKind,
};

pub use program_trees::{
    rand_subtree, rand_subtree_at, replace_subtree, replace_subtree_at, truncate, truncate_module,
    AdfBranch, AdlBranch, Branch, CorruptTree, ModuleTree, Op, Symbol, Tree,
};

#[cfg(test)]
mod tests;
