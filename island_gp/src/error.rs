use program_trees::CorruptTree;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GpError {
    /// The caller passed a malformed option set; the run never begins.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An internal invariant was violated after a variation step. Always an
    /// engine bug, surfaced distinctly so it is never mistaken for caller
    /// error.
    #[error("internal invariant violated: {0}")]
    Unreachable(&'static str),
}

impl From<CorruptTree> for GpError {
    fn from(err: CorruptTree) -> Self {
        GpError::Unreachable(err.0)
    }
}
