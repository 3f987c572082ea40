//! Catalog service: validation, conflict detection, and writes.
//!
//! [`EntityService`] coordinates the full write path: every submitted
//! document is validated (failures aggregated per item before any store
//! call), batches are checked for identity collisions in one round trip,
//! and inserts happen as a single bulk operation, all or nothing.
//!
//! Validation and normalization are pure and synchronous; the only points
//! where an operation can block are the store calls themselves. The
//! existence check and the insert are sequential, non-atomic steps: two
//! callers racing overlapping identities can both pass the check, in which
//! case the loser's bulk insert fails with the store's own uniqueness
//! error (a `StorageError`, not a retroactive conflict).

pub mod context;

pub use context::RequestContext;

use crate::config::CatalogConfig;
use crate::entity::CanonicalEntity;
use crate::error::{
    BatchValidationError, ConflictError, ItemFailure, ServiceError, ServiceResult,
};
use crate::identity::EntityIdentity;
use crate::schema::DialectValidator;
use crate::storage::EntityStore;
use log::{debug, info, warn};
use serde_json::Value;

/// Outcome of a replace-or-create batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// At least one entity was newly created; carries the created identities
    /// (existing ones were replaced in place)
    Created(Vec<EntityIdentity>),
    /// Every submitted entity already existed and was replaced
    Replaced,
}

/// The catalog core over a pluggable entity store.
#[derive(Debug, Clone)]
pub struct EntityService<S: EntityStore> {
    validator: DialectValidator,
    store: S,
}

impl<S: EntityStore> EntityService<S> {
    /// Create a service with the default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, CatalogConfig::default())
    }

    /// Create a service with an explicit configuration.
    pub fn with_config(store: S, config: CatalogConfig) -> Self {
        Self {
            validator: DialectValidator::new(config),
            store,
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The dialect validator this service runs documents through.
    pub fn validator(&self) -> &DialectValidator {
        &self.validator
    }

    /// Create a batch of entities.
    ///
    /// All documents are validated first; a batch containing any invalid
    /// document is rejected without touching the store. Identities already
    /// present reject the entire batch with a [`ConflictError`] naming every
    /// colliding identity; no partial insert occurs. On success the created
    /// identities are returned in submission order.
    pub async fn create_batch(
        &self,
        documents: &[Value],
        context: &RequestContext,
    ) -> ServiceResult<Vec<EntityIdentity>> {
        let entities = self.validate_batch(documents, context)?;
        if entities.is_empty() {
            return Ok(Vec::new());
        }

        let identities: Vec<EntityIdentity> =
            entities.iter().map(|e| e.identity().clone()).collect();

        let existing = self.store.find_by_identities(&identities).await?;
        if !existing.is_empty() {
            warn!(
                "create rejected, identities already exist: [{}] request_id={}",
                join(&existing),
                context.request_id
            );
            return Err(ConflictError {
                identities: existing,
            }
            .into());
        }

        self.store.insert_batch(&entities).await?;
        info!(
            "created {} entities: [{}] request_id={}",
            identities.len(),
            join(&identities),
            context.request_id
        );
        Ok(identities)
    }

    /// Fetch one entity by identity.
    pub async fn fetch(
        &self,
        identity: &EntityIdentity,
        context: &RequestContext,
    ) -> ServiceResult<CanonicalEntity> {
        debug!(
            "fetching entity: {} request_id={}",
            identity, context.request_id
        );
        self.store
            .find_one(identity)
            .await?
            .ok_or_else(|| ServiceError::not_found(identity.uri()))
    }

    /// Replace and/or create a batch of entities.
    ///
    /// Validation is identical to [`create_batch`](Self::create_batch).
    /// Entities whose identity is not yet stored are created in one bulk
    /// insert; the rest replace their stored counterparts in place.
    pub async fn replace_batch(
        &self,
        documents: &[Value],
        context: &RequestContext,
    ) -> ServiceResult<ReplaceOutcome> {
        let entities = self.validate_batch(documents, context)?;
        if entities.is_empty() {
            return Ok(ReplaceOutcome::Created(Vec::new()));
        }

        let identities: Vec<EntityIdentity> =
            entities.iter().map(|e| e.identity().clone()).collect();
        let existing = self.store.find_by_identities(&identities).await?;

        let (to_replace, to_create): (Vec<&CanonicalEntity>, Vec<&CanonicalEntity>) = entities
            .iter()
            .partition(|entity| existing.contains(entity.identity()));

        let created: Vec<CanonicalEntity> = to_create.into_iter().cloned().collect();
        if !created.is_empty() {
            self.store.insert_batch(&created).await?;
        }

        let replaced = to_replace.len();
        for entity in to_replace {
            self.store.replace_one(entity.identity(), entity).await?;
        }

        info!(
            "replaced {replaced} and created {} entities request_id={}",
            created.len(),
            context.request_id
        );

        if created.is_empty() {
            Ok(ReplaceOutcome::Replaced)
        } else {
            Ok(ReplaceOutcome::Created(
                created.iter().map(|e| e.identity().clone()).collect(),
            ))
        }
    }

    /// Delete entities by identity URI.
    ///
    /// Malformed URIs are rejected up front, aggregated the same way
    /// document validation failures are; nothing is deleted when any input
    /// is invalid. Returns the identities that were submitted for deletion.
    pub async fn delete(
        &self,
        uris: &[String],
        context: &RequestContext,
    ) -> ServiceResult<Vec<EntityIdentity>> {
        if uris.is_empty() {
            return Err(ServiceError::NoIdentities);
        }

        let mut identities = Vec::with_capacity(uris.len());
        let mut failures = Vec::new();
        for (index, uri) in uris.iter().enumerate() {
            match EntityIdentity::from_uri(uri.clone()) {
                Ok(identity) => identities.push(identity),
                Err(error) => failures.push(ItemFailure {
                    index,
                    error: error.into(),
                }),
            }
        }
        if !failures.is_empty() {
            return Err(BatchValidationError { failures }.into());
        }

        let removed = self.store.delete_many(&identities).await?;
        info!(
            "deleted {removed} entities: [{}] request_id={}",
            join(&identities),
            context.request_id
        );
        Ok(identities)
    }

    /// Validate every document in the batch, aggregating failures.
    ///
    /// No store call is made for a batch containing any invalid item.
    fn validate_batch(
        &self,
        documents: &[Value],
        context: &RequestContext,
    ) -> Result<Vec<CanonicalEntity>, BatchValidationError> {
        let mut entities = Vec::with_capacity(documents.len());
        let mut failures = Vec::new();

        for (index, document) in documents.iter().enumerate() {
            match self.validator.validate(document) {
                Ok((entity, dialect)) => {
                    debug!(
                        "validated {} as {dialect} request_id={}",
                        entity.identity(),
                        context.request_id
                    );
                    entities.push(entity);
                }
                Err(error) => {
                    debug!(
                        "document #{index} failed validation: {error} request_id={}",
                        context.request_id
                    );
                    failures.push(ItemFailure { index, error });
                }
            }
        }

        if failures.is_empty() {
            Ok(entities)
        } else {
            Err(BatchValidationError { failures })
        }
    }
}

fn join(identities: &[EntityIdentity]) -> String {
    identities
        .iter()
        .map(|identity| identity.uri().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::storage::InMemoryStore;
    use serde_json::json;

    fn service() -> EntityService<InMemoryStore> {
        EntityService::new(InMemoryStore::new())
    }

    fn document(name: &str) -> Value {
        json!({
            "namespace": "http://x/meta",
            "version": "0.3",
            "name": name,
            "meta": "http://onto-ns.com/meta/0.3/EntitySchema",
            "dimensions": {},
            "properties": {"name": {"type": "string"}}
        })
    }

    #[tokio::test]
    async fn creates_a_valid_batch() {
        let service = service();
        let context = RequestContext::with_generated_id();

        let created = service
            .create_batch(&[document("Cat"), document("Dog")], &context)
            .await
            .unwrap();
        assert_eq!(created.len(), 2);
        assert_eq!(created[0].uri(), "http://x/meta/0.3/Cat");
        assert_eq!(service.store().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn empty_batch_creates_nothing() {
        let service = service();
        let context = RequestContext::with_generated_id();
        let created = service.create_batch(&[], &context).await.unwrap();
        assert!(created.is_empty());
    }

    #[tokio::test]
    async fn invalid_item_rejects_whole_batch_before_any_store_call() {
        let service = service();
        let context = RequestContext::with_generated_id();

        let mut broken = document("Dog");
        broken.as_object_mut().unwrap().remove("namespace");

        let result = service
            .create_batch(&[document("Cat"), broken], &context)
            .await;
        match result {
            Err(ServiceError::Validation(batch)) => {
                assert_eq!(batch.failures.len(), 1);
                assert_eq!(batch.failures[0].index, 1);
                assert!(matches!(
                    batch.failures[0].error,
                    ValidationError::Identity(_)
                ));
            }
            other => panic!("expected Validation, got: {other:?}"),
        }
        // The valid document was not created either.
        assert_eq!(service.store().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn conflict_rejects_whole_batch_and_names_colliders() {
        let service = service();
        let context = RequestContext::with_generated_id();

        service
            .create_batch(&[document("Dog")], &context)
            .await
            .unwrap();

        let result = service
            .create_batch(
                &[document("Cat"), document("Dog"), document("Fox")],
                &context,
            )
            .await;
        match result {
            Err(ServiceError::Conflict(conflict)) => {
                assert_eq!(conflict.identities.len(), 1);
                assert_eq!(conflict.identities[0].uri(), "http://x/meta/0.3/Dog");
            }
            other => panic!("expected Conflict, got: {other:?}"),
        }
        // None of the three were created.
        assert_eq!(service.store().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn fetch_returns_not_found_for_unknown_identity() {
        let service = service();
        let context = RequestContext::with_generated_id();
        let identity = EntityIdentity::from_uri("http://x/meta/0.3/Ghost").unwrap();

        let result = service.fetch(&identity, &context).await;
        assert!(matches!(result, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn replace_batch_reports_created_and_replaced() {
        let service = service();
        let context = RequestContext::with_generated_id();

        service
            .create_batch(&[document("Cat")], &context)
            .await
            .unwrap();

        let outcome = service
            .replace_batch(&[document("Cat"), document("Dog")], &context)
            .await
            .unwrap();
        match outcome {
            ReplaceOutcome::Created(created) => {
                assert_eq!(created.len(), 1);
                assert_eq!(created[0].uri(), "http://x/meta/0.3/Dog");
            }
            other => panic!("expected Created, got: {other:?}"),
        }

        let outcome = service
            .replace_batch(&[document("Cat")], &context)
            .await
            .unwrap();
        assert_eq!(outcome, ReplaceOutcome::Replaced);
    }

    #[tokio::test]
    async fn delete_requires_identities_and_validates_them() {
        let service = service();
        let context = RequestContext::with_generated_id();

        assert!(matches!(
            service.delete(&[], &context).await,
            Err(ServiceError::NoIdentities)
        ));

        let result = service
            .delete(&["ftp://x/meta/0.3/Cat".to_string()], &context)
            .await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn delete_removes_existing_entities() {
        let service = service();
        let context = RequestContext::with_generated_id();

        service
            .create_batch(&[document("Cat")], &context)
            .await
            .unwrap();
        let deleted = service
            .delete(&["http://x/meta/0.3/Cat".to_string()], &context)
            .await
            .unwrap();
        assert_eq!(deleted.len(), 1);
        assert_eq!(service.store().count().await.unwrap(), 0);
    }
}
