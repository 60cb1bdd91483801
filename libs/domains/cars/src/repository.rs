use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CarResult;
use crate::models::{Car, CarPatch, CreateCar, ImageRef};

/// Repository trait for Car listing persistence
///
/// This trait defines the data access interface for listings.
/// Implementations can use different storage backends (MongoDB, etc.)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarRepository: Send + Sync {
    /// Persist a new listing built from the DTO, the uploaded image
    /// references, and the owner identity. Assigns id and timestamps.
    async fn create(
        &self,
        input: CreateCar,
        images: Vec<ImageRef>,
        created_by: Uuid,
    ) -> CarResult<Car>;

    /// Get a listing by ID
    async fn get_by_id(&self, id: Uuid) -> CarResult<Option<Car>>;

    /// List every listing created by the given owner
    async fn list_by_owner(&self, owner_id: Uuid) -> CarResult<Vec<Car>>;

    /// Find a listing by `(id, created_by)`; the ownership-scoped lookup
    /// gating every mutation
    async fn find_owned(&self, id: Uuid, owner_id: Uuid) -> CarResult<Option<Car>>;

    /// Case-insensitive keyword match across title, description, and tags.
    /// An empty keyword matches everything.
    async fn search(&self, keyword: &str) -> CarResult<Vec<Car>>;

    /// Apply a partial merge to an existing listing
    async fn update(&self, id: Uuid, patch: CarPatch) -> CarResult<Car>;

    /// Delete a listing by ID
    async fn delete(&self, id: Uuid) -> CarResult<bool>;
}
