//! Capability seam for a legacy native entity representation.
//!
//! Some deployments carry a native-library entity format alongside the JSON
//! wire shapes. The core never depends on it; anything that can convert
//! canonical entities to and from that format plugs in behind [`NativeCodec`],
//! so its absence has no effect on correctness.

use crate::entity::CanonicalEntity;

/// Converts canonical entities to and from a native representation.
pub trait NativeCodec: Send + Sync {
    /// The error type returned by conversions.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Encode a canonical entity into the native format.
    fn to_native(&self, entity: &CanonicalEntity) -> Result<Vec<u8>, Self::Error>;

    /// Decode a canonical entity from the native format.
    fn from_native(&self, bytes: &[u8]) -> Result<CanonicalEntity, Self::Error>;
}
