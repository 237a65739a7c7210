//! Typed error kinds for repository operations.
//!
//! Library functions return `anyhow::Result`; these kinds are the root error of
//! the chain and can be recovered with `err.downcast_ref::<RepoError>()`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    /// Target of `create` is missing or not a directory.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// `create` on a tree that already has a metadata directory.
    #[error("repository already exists: {}", .0.display())]
    RepositoryExists(PathBuf),

    /// Operation on a tree that has no metadata directory.
    #[error("repository does not exist: {}", .0.display())]
    RepositoryDoesNotExist(PathBuf),

    /// Not a 40-char lowercase hex SHA-1.
    #[error("invalid image id: {0:?}")]
    InvalidImageId(String),
}

impl RepoError {
    /// Extract the typed kind from an anyhow chain, if any.
    pub fn from_anyhow(err: &anyhow::Error) -> Option<&RepoError> {
        err.chain().find_map(|e| e.downcast_ref::<RepoError>())
    }
}
