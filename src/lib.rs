//! Metadata catalog core for entity schema definitions.
//!
//! Validates submitted entity documents against two accepted wire dialects,
//! derives and cross-checks their canonical identities, and performs
//! conflict-aware batch writes over a pluggable document store.
//!
//! # Core Components
//!
//! - [`EntityService`] - Coordinates validation, conflict detection, and writes
//! - [`DialectValidator`] - Resolves which of the two dialects a document matches
//! - [`EntityStore`] - Trait for implementing storage backends
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use entity_catalog::{EntityService, RequestContext};
//! use entity_catalog::storage::InMemoryStore;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = EntityService::new(InMemoryStore::new());
//! let context = RequestContext::with_generated_id();
//!
//! let document = json!({
//!     "namespace": "http://onto-ns.com/meta",
//!     "version": "0.3",
//!     "name": "Material",
//!     "meta": "http://onto-ns.com/meta/0.3/EntitySchema",
//!     "dimensions": {},
//!     "properties": {"formula": {"type": "string", "description": "Chemical formula."}}
//! });
//! let created = service.create_batch(&[document], &context).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod entity;
pub mod error;
pub mod identity;
pub mod interop;
pub mod schema;
pub mod service;
pub mod storage;

// Re-export commonly used types for convenience
pub use config::CatalogConfig;
pub use entity::{CanonicalEntity, DimensionRecord, PropertyRecord};
pub use error::{
    ConflictError, ErrorKind, ErrorResponse, IdentityError, SchemaReferenceError, ServiceError,
    ServiceResult, ValidationError,
};
pub use identity::EntityIdentity;
pub use schema::{Dialect, DialectValidator, PropertyType};
pub use service::{EntityService, ReplaceOutcome, RequestContext};
pub use storage::{EntityStore, StorageError};
