use std::collections::HashMap;
use std::sync::Arc;

use num_traits::Float;
use program_trees::{ModuleTree, Op, Symbol};

use crate::error::GpError;

/// Caller-supplied fitness callback: maps a candidate to a non-negative error
/// (lower is better, zero is perfect). Islands evaluate concurrently, so the
/// callback must be thread-safe. A returned `Err` (or a non-finite value)
/// scores the candidate as `+inf` for the current generation; it never aborts
/// the run.
pub type FitnessFn<T> = dyn Fn(&ModuleTree<T>) -> anyhow::Result<T> + Send + Sync;

/// Called once per migration round with the global best individual.
pub type ReportFn<T> = dyn Fn(&ModuleTree<T>, T) + Send + Sync;

/// Optional hook receiving each recovered fitness failure, at most once per
/// offending tree per migration round. Failures are also logged through the
/// `log` facade whether or not a hook is installed.
pub type FailureFn<T> = dyn Fn(&ModuleTree<T>, &anyhow::Error) + Send + Sync;

/// The full tuning surface of a run. Immutable once the run starts; every
/// subsystem receives it by shared reference.
#[derive(Clone)]
pub struct Options<T: Float> {
    /// Generations per island between migrations.
    pub iterations: usize,
    /// Number of migration rounds.
    pub migrations: usize,
    pub num_islands: usize,
    pub population_size: usize,
    pub tournament_size: usize,
    /// Per-individual mutation coin.
    pub mutation_probability: f64,
    /// Depth bound for mutation-grown subtrees, and the depth ramp for the
    /// initial populations.
    pub mutation_depth: usize,
    /// Post-truncation height bound, enforced after every variation step.
    pub max_depth: usize,
    /// Variable-symbol terminals.
    pub terminals: Vec<Symbol>,
    /// Numeric-literal terminals.
    pub numbers: Vec<T>,
    /// Operator descriptors usable as internal nodes.
    pub functions: Vec<Op>,
    pub adf_count: usize,
    pub adf_arity: usize,
    pub adl_count: usize,
    pub adl_limit: u32,
    /// Master seed. Island `i` derives its own generator from `seed + i`, so
    /// a fixed seed reproduces a run bit-for-bit on one platform.
    pub seed: u64,
    pub fitness: Arc<FitnessFn<T>>,
    pub report: Arc<ReportFn<T>>,
    pub failure_report: Option<Arc<FailureFn<T>>>,
}

impl<T: Float> Options<T> {
    /// Engine defaults around the two required callbacks. Budget fields
    /// (`iterations`, `migrations`, `num_islands`, `population_size`,
    /// `max_depth`) and the symbol sets start zeroed or empty; fill them via
    /// struct update, or [`Options::validate`] will reject the placeholders.
    pub fn new<F, R>(fitness: F, report: R) -> Self
    where
        F: Fn(&ModuleTree<T>) -> anyhow::Result<T> + Send + Sync + 'static,
        R: Fn(&ModuleTree<T>, T) + Send + Sync + 'static,
    {
        Self {
            iterations: 0,
            migrations: 0,
            num_islands: 0,
            population_size: 0,
            tournament_size: 3,
            mutation_probability: 0.1,
            mutation_depth: 6,
            max_depth: 0,
            terminals: Vec::new(),
            numbers: Vec::new(),
            functions: Vec::new(),
            adf_count: 0,
            adf_arity: 1,
            adl_count: 0,
            adl_limit: 25,
            seed: 0,
            fitness: Arc::new(fitness),
            report: Arc::new(report),
            failure_report: None,
        }
    }

    pub fn validate(&self) -> Result<(), GpError> {
        fn at_least_one(name: &str, value: usize) -> Result<(), GpError> {
            if value == 0 {
                Err(GpError::InvalidConfig(format!(
                    "`{name}` must be at least 1"
                )))
            } else {
                Ok(())
            }
        }

        at_least_one("iterations", self.iterations)?;
        at_least_one("migrations", self.migrations)?;
        at_least_one("num_islands", self.num_islands)?;
        at_least_one("population_size", self.population_size)?;
        at_least_one("tournament_size", self.tournament_size)?;
        at_least_one("mutation_depth", self.mutation_depth)?;

        if !self.mutation_probability.is_finite()
            || !(0.0..=1.0).contains(&self.mutation_probability)
        {
            return Err(GpError::InvalidConfig(
                "`mutation_probability` must lie in [0, 1]".into(),
            ));
        }
        if self.terminals.is_empty() && self.numbers.is_empty() {
            return Err(GpError::InvalidConfig(
                "at least one terminal symbol or numeric literal is required".into(),
            ));
        }
        if self.functions.is_empty() && self.max_depth > 0 {
            return Err(GpError::InvalidConfig(
                "`functions` must be non-empty when `max_depth` > 0".into(),
            ));
        }

        let mut arities: HashMap<&Symbol, usize> = HashMap::new();
        for op in &self.functions {
            match arities.get(&op.name) {
                Some(&arity) if arity != op.arity => {
                    return Err(GpError::InvalidConfig(format!(
                        "operator `{}` declared with arities {} and {}",
                        op.name, arity, op.arity
                    )));
                }
                Some(_) => {}
                None => {
                    arities.insert(&op.name, op.arity);
                }
            }
        }

        Ok(())
    }
}
