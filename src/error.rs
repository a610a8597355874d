//! Error types shared across the crate.

use thiserror::Error;

use crate::Index;

/// Structural errors raised while building a shape function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShapeFnError {
    /// The element family has no topology with this many basis functions.
    #[error("specified number of shape functions ({nfunctions}) is not defined")]
    UnsupportedTopology { nfunctions: usize },
}

/// Errors raised when resolving an entity by its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No entity is stored under this index.
    #[error("no entity with id {0}")]
    NotFound(Index),
}

/// Errors raised when assigning a nodal vector field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NodeError {
    /// The supplied vector does not have one entry per degree of freedom.
    #[error("{field} has {actual} entries, node carries {expected} degrees of freedom")]
    DofMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}
