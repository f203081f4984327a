//! Remote authoritative store boundary.
//!
//! The remote store owns the truth; the local mirror only caches it. This
//! module defines what the synchronization controller needs from it and an
//! in-process implementation for tests and demos.

mod memory;

use std::time::Duration;

use thiserror::Error;

use crate::models::{FieldFilter, Record};

pub use memory::MemoryRemote;

/// Result type for remote operations
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Failures talking to the remote store. Results are all-or-nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("service unavailable")]
    Unavailable,

    #[error("malformed document: {0}")]
    Malformed(String),
}

/// Per-collection access to the remote authoritative store.
///
/// The collection is taken from `T::COLLECTION`.
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    /// Every document in the collection.
    async fn fetch_all<T: Record>(&self) -> RemoteResult<Vec<T>>;

    /// Documents matching every exact-match filter.
    async fn fetch_where<T: Record>(&self, filters: &[FieldFilter]) -> RemoteResult<Vec<T>>;

    /// Create or overwrite a document under its id.
    async fn set<T: Record>(&self, record: &T) -> RemoteResult<()>;

    /// Delete a document by id.
    async fn delete<T: Record>(&self, id: &str) -> RemoteResult<()>;
}
