//! Storage abstraction for canonical entities.
//!
//! The [`EntityStore`] trait defines the document-store operations the
//! catalog core depends on; concrete drivers (network clients, connection
//! pooling, TLS) live behind it and are out of scope here. The in-memory
//! implementation backs tests and development.
//!
//! The store layer is responsible for persistence, identity-keyed lookup,
//! and identity uniqueness enforcement. It is NOT responsible for dialect
//! validation, conflict policy, or response shaping; those belong to the
//! service layer above it.

pub mod errors;
pub mod in_memory;

pub use errors::StorageError;
pub use in_memory::InMemoryStore;

use crate::entity::CanonicalEntity;
use crate::identity::EntityIdentity;
use std::future::Future;

/// Document-store operations required by the catalog core.
///
/// All operations are async and keyed by canonical identity URI. The two
/// calls the write path issues per batch (existence check, then bulk
/// insert) are sequential, non-atomic steps; a concurrent writer may slip
/// between them, in which case the insert surfaces the store's own
/// uniqueness enforcement as a [`StorageError`].
pub trait EntityStore: Send + Sync {
    /// Return the subset of `identities` already present in the store.
    ///
    /// One batched round trip, not one per identity. Duplicate inputs are
    /// reported once.
    fn find_by_identities(
        &self,
        identities: &[EntityIdentity],
    ) -> impl Future<Output = Result<Vec<EntityIdentity>, StorageError>> + Send;

    /// Insert a batch of entities as a single bulk operation.
    ///
    /// An identity collision inside the store (including one racing in after
    /// the caller's existence check) fails the whole bulk insert with
    /// [`StorageError::Permanent`].
    fn insert_batch(
        &self,
        entities: &[CanonicalEntity],
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Fetch one entity by identity.
    fn find_one(
        &self,
        identity: &EntityIdentity,
    ) -> impl Future<Output = Result<Option<CanonicalEntity>, StorageError>> + Send;

    /// Replace an existing entity in place.
    ///
    /// Returns `true` when an entity with that identity existed and was
    /// replaced, `false` when nothing was stored (no insert occurs).
    fn replace_one(
        &self,
        identity: &EntityIdentity,
        entity: &CanonicalEntity,
    ) -> impl Future<Output = Result<bool, StorageError>> + Send;

    /// Delete entities by identity, returning how many were removed.
    fn delete_many(
        &self,
        identities: &[EntityIdentity],
    ) -> impl Future<Output = Result<usize, StorageError>> + Send;

    /// Total number of stored entities.
    fn count(&self) -> impl Future<Output = Result<usize, StorageError>> + Send;
}
