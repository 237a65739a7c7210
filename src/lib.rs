pub mod consts;
pub mod config;
pub mod error;

// Repository store (layout, create/exists) and the handle.
pub mod repo;

// Snapshot engine and its pieces.
pub mod archive;
pub mod digest;
pub mod history;
pub mod snapshot;

pub use config::PumkinConfig;
pub use digest::ImageId;
pub use error::RepoError;
pub use repo::{create, exists, metadata_dir, Repository};
pub use snapshot::{sync, Mismatch, VerifyReport};
