use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use num_traits::Float;

/// An operator, variable, or branch name. Cheap to clone; compares by value.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Operator descriptor: an opaque identifier plus its fixed arity.
///
/// The identifier is never interpreted by the engine; it is handed back to the
/// caller inside application nodes.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Op {
    pub name: Symbol,
    pub arity: usize,
}

impl Op {
    pub fn new(name: impl Into<Symbol>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }
}

/// An immutable expression tree. All variation operators return new trees.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum Tree<T> {
    /// Variable terminal.
    Var(Symbol),
    /// Numeric literal terminal.
    Num(T),
    /// Application of an operator to exactly `arity` children.
    App(Symbol, Vec<Tree<T>>),
}

impl<T> Tree<T> {
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Tree::App(..))
    }

    /// Longest root-to-leaf path length; leaves sit at height 0.
    pub fn height(&self) -> usize {
        match self {
            Tree::Var(_) | Tree::Num(_) => 0,
            Tree::App(_, children) => {
                1 + children.iter().map(Tree::height).max().unwrap_or(0)
            }
        }
    }

    /// Total node count, leaves included.
    pub fn size(&self) -> usize {
        match self {
            Tree::Var(_) | Tree::Num(_) => 1,
            Tree::App(_, children) => 1 + children.iter().map(Tree::size).sum::<usize>(),
        }
    }

    /// Whether `sub` occurs in `self` as a structural sub-expression.
    pub fn contains(&self, sub: &Tree<T>) -> bool
    where
        T: PartialEq,
    {
        if self == sub {
            return true;
        }
        match self {
            Tree::App(_, children) => children.iter().any(|c| c.contains(sub)),
            _ => false,
        }
    }
}

impl<T: Float> Tree<T> {
    /// 64-bit structural hash. Numeric literals hash by their bit pattern, so
    /// two trees collide only when they are structurally equal (modulo hash
    /// collisions).
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.hash_structure(&mut hasher);
        hasher.finish()
    }

    pub(crate) fn hash_structure<H: Hasher>(&self, hasher: &mut H) {
        match self {
            Tree::Var(name) => {
                0u8.hash(hasher);
                name.hash(hasher);
            }
            Tree::Num(value) => {
                1u8.hash(hasher);
                value.to_f64().unwrap_or(f64::NAN).to_bits().hash(hasher);
            }
            Tree::App(op, children) => {
                2u8.hash(hasher);
                op.hash(hasher);
                children.len().hash(hasher);
                for child in children {
                    child.hash_structure(hasher);
                }
            }
        }
    }
}

impl<T: fmt::Display> fmt::Display for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tree::Var(name) => write!(f, "{name}"),
            Tree::Num(value) => write!(f, "{value}"),
            Tree::App(op, children) => {
                write!(f, "({op}")?;
                for child in children {
                    write!(f, " {child}")?;
                }
                write!(f, ")")
            }
        }
    }
}
