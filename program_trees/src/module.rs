use std::fmt;
use std::hash::Hasher;

use num_traits::Float;

use crate::tree::{Symbol, Tree};

/// A function-defining branch: `name(params...) = body`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct AdfBranch<T> {
    pub name: Symbol,
    pub params: Vec<Symbol>,
    pub body: Tree<T>,
}

/// A loop-defining branch: initialization, condition, loop body, and update
/// trees, plus a fixed iteration bound.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct AdlBranch<T> {
    pub name: Symbol,
    pub init: Tree<T>,
    pub cond: Tree<T>,
    pub body: Tree<T>,
    pub update: Tree<T>,
    pub limit: u32,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum Branch<T> {
    Adf(AdfBranch<T>),
    Adl(AdlBranch<T>),
}

impl<T> Branch<T> {
    pub fn name(&self) -> &Symbol {
        match self {
            Branch::Adf(branch) => &branch.name,
            Branch::Adl(branch) => &branch.name,
        }
    }
}

/// A tree packaged with its named branches as a let form.
///
/// Variation operators rewrite the result body or a branch body, never the
/// envelope itself: branch count, names, parameter vectors, and loop limits
/// survive every generation. An individual without ADFs or ADLs carries an
/// empty branch vector and the envelope is an identity wrapper.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ModuleTree<T> {
    pub branches: Vec<Branch<T>>,
    pub body: Tree<T>,
}

impl<T> ModuleTree<T> {
    /// Wrap a bare tree in an empty envelope.
    pub fn plain(body: Tree<T>) -> Self {
        Self {
            branches: Vec::new(),
            body,
        }
    }

    pub fn is_plain(&self) -> bool {
        self.branches.is_empty()
    }

    /// Generated name of the `i`-th function branch.
    pub fn adf_name(index: usize) -> Symbol {
        Symbol::from(format!("adf{index}"))
    }

    /// Generated name of the `i`-th loop branch. The same symbol doubles as
    /// the loop's result terminal in the result body.
    pub fn adl_name(index: usize) -> Symbol {
        Symbol::from(format!("adl{index}"))
    }
}

impl<T: Float> ModuleTree<T> {
    /// Structural hash over the envelope and every body tree.
    pub fn fingerprint(&self) -> u64 {
        use std::hash::Hash;

        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.branches.len().hash(&mut hasher);
        for branch in &self.branches {
            match branch {
                Branch::Adf(b) => {
                    0u8.hash(&mut hasher);
                    b.name.hash(&mut hasher);
                    b.params.hash(&mut hasher);
                    b.body.hash_structure(&mut hasher);
                }
                Branch::Adl(b) => {
                    1u8.hash(&mut hasher);
                    b.name.hash(&mut hasher);
                    b.limit.hash(&mut hasher);
                    b.init.hash_structure(&mut hasher);
                    b.cond.hash_structure(&mut hasher);
                    b.body.hash_structure(&mut hasher);
                    b.update.hash_structure(&mut hasher);
                }
            }
        }
        self.body.hash_structure(&mut hasher);
        hasher.finish()
    }
}

impl<T: fmt::Display> fmt::Display for ModuleTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.branches.is_empty() {
            return write!(f, "{}", self.body);
        }
        write!(f, "(let (")?;
        for (i, branch) in self.branches.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match branch {
                Branch::Adf(b) => {
                    write!(f, "({} (fn (", b.name)?;
                    for (j, param) in b.params.iter().enumerate() {
                        if j > 0 {
                            write!(f, " ")?;
                        }
                        write!(f, "{param}")?;
                    }
                    write!(f, ") {}))", b.body)?;
                }
                Branch::Adl(b) => {
                    write!(
                        f,
                        "({} (loop {} {} {} {} :limit {}))",
                        b.name, b.init, b.cond, b.body, b.update, b.limit
                    )?;
                }
            }
        }
        write!(f, ") {})", self.body)
    }
}
