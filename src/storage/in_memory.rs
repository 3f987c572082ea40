//! In-memory entity store.
//!
//! Thread-safe [`EntityStore`] implementation over a `HashMap` keyed by
//! canonical identity URI, guarded by an async `RwLock`. Intended for tests
//! and development; identity uniqueness is enforced the way a production
//! store's unique index would be, so the service layer sees the same
//! failure surface either way.

use crate::entity::CanonicalEntity;
use crate::identity::EntityIdentity;
use crate::storage::{EntityStore, StorageError};
use log::debug;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Thread-safe in-memory entity store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    entities: Arc<RwLock<HashMap<String, CanonicalEntity>>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all stored entities (useful for tests).
    pub async fn clear(&self) {
        self.entities.write().await.clear();
    }
}

impl EntityStore for InMemoryStore {
    async fn find_by_identities(
        &self,
        identities: &[EntityIdentity],
    ) -> Result<Vec<EntityIdentity>, StorageError> {
        let entities = self.entities.read().await;
        let mut seen = HashSet::new();
        Ok(identities
            .iter()
            .filter(|identity| entities.contains_key(identity.uri()))
            .filter(|identity| seen.insert(identity.uri().to_string()))
            .cloned()
            .collect())
    }

    async fn insert_batch(&self, batch: &[CanonicalEntity]) -> Result<(), StorageError> {
        let mut entities = self.entities.write().await;

        // All-or-nothing under the write lock, the same guarantee a unique
        // index gives a bulk insert.
        let mut incoming = HashSet::new();
        for entity in batch {
            let uri = entity.identity().uri();
            if entities.contains_key(uri) || !incoming.insert(uri) {
                return Err(StorageError::permanent(format!(
                    "duplicate identity: {uri}"
                )));
            }
        }

        for entity in batch {
            entities.insert(entity.identity().uri().to_string(), entity.clone());
        }
        debug!("inserted {} entities", batch.len());
        Ok(())
    }

    async fn find_one(
        &self,
        identity: &EntityIdentity,
    ) -> Result<Option<CanonicalEntity>, StorageError> {
        Ok(self.entities.read().await.get(identity.uri()).cloned())
    }

    async fn replace_one(
        &self,
        identity: &EntityIdentity,
        entity: &CanonicalEntity,
    ) -> Result<bool, StorageError> {
        let mut entities = self.entities.write().await;
        if !entities.contains_key(identity.uri()) {
            return Ok(false);
        }
        entities.insert(identity.uri().to_string(), entity.clone());
        Ok(true)
    }

    async fn delete_many(&self, identities: &[EntityIdentity]) -> Result<usize, StorageError> {
        let mut entities = self.entities.write().await;
        let mut removed = 0;
        for identity in identities {
            if entities.remove(identity.uri()).is_some() {
                removed += 1;
            }
        }
        debug!("deleted {removed} entities");
        Ok(removed)
    }

    async fn count(&self) -> Result<usize, StorageError> {
        Ok(self.entities.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Dialect;
    use serde_json::json;

    fn entity(name: &str) -> CanonicalEntity {
        let identity = EntityIdentity::from_triple("http://x/meta", "0.3", name).unwrap();
        let document = json!({
            "meta": "http://onto-ns.com/meta/0.3/EntitySchema",
            "properties": {"label": {"type": "string"}}
        });
        CanonicalEntity::normalize(document.as_object().unwrap(), Dialect::PropertyMap, identity)
    }

    #[tokio::test]
    async fn insert_then_find() {
        let store = InMemoryStore::new();
        let cat = entity("Cat");
        store.insert_batch(std::slice::from_ref(&cat)).await.unwrap();

        let found = store.find_one(cat.identity()).await.unwrap();
        assert_eq!(found, Some(cat));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_insert_fails_whole_batch() {
        let store = InMemoryStore::new();
        let cat = entity("Cat");
        store.insert_batch(std::slice::from_ref(&cat)).await.unwrap();

        let dog = entity("Dog");
        let result = store.insert_batch(&[dog.clone(), cat.clone()]).await;
        assert!(matches!(result, Err(StorageError::Permanent { .. })));

        // Nothing from the failed batch landed.
        assert_eq!(store.find_one(dog.identity()).await.unwrap(), None);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn existence_check_reports_duplicates_once() {
        let store = InMemoryStore::new();
        let cat = entity("Cat");
        store.insert_batch(std::slice::from_ref(&cat)).await.unwrap();

        let present = store
            .find_by_identities(&[cat.identity().clone(), cat.identity().clone()])
            .await
            .unwrap();
        assert_eq!(present.len(), 1);
    }

    #[tokio::test]
    async fn replace_requires_existing_entity() {
        let store = InMemoryStore::new();
        let cat = entity("Cat");

        let replaced = store.replace_one(cat.identity(), &cat).await.unwrap();
        assert!(!replaced);
        assert_eq!(store.count().await.unwrap(), 0);

        store.insert_batch(std::slice::from_ref(&cat)).await.unwrap();
        let replaced = store.replace_one(cat.identity(), &cat).await.unwrap();
        assert!(replaced);
    }

    #[tokio::test]
    async fn delete_many_reports_removed_count() {
        let store = InMemoryStore::new();
        let cat = entity("Cat");
        let dog = entity("Dog");
        store.insert_batch(&[cat.clone(), dog.clone()]).await.unwrap();

        let missing = entity("Fox");
        let removed = store
            .delete_many(&[
                cat.identity().clone(),
                dog.identity().clone(),
                missing.identity().clone(),
            ])
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
