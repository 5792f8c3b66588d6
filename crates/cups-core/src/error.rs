use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// Registration requires a human-readable description.
    #[error("description must not be empty")]
    EmptyDescription,

    /// The underlying store failed; not retried here. The
    /// duplicate-principal sub-case is the one callers are expected to
    /// retry by re-invoking `register_or_merge`.
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
