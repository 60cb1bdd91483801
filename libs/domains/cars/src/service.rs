//! Car Listing Service - Business logic layer

use std::sync::Arc;

use futures_util::future::try_join_all;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CarError, CarResult};
use crate::models::{Car, CreateCar, ImageRef, UpdateCar, MAX_IMAGES_PER_CAR};
use crate::repository::CarRepository;
use crate::storage::ImageStore;

/// Car listing service providing business logic operations
///
/// The service layer handles validation, ownership rules, and orchestrates
/// the repository together with the external image store. Image batches are
/// fanned out concurrently and awaited as a unit; there is no compensating
/// rollback between the upload and persistence steps (a failure in the
/// window leaves uploaded images unreferenced).
pub struct CarService<R: CarRepository, S: ImageStore> {
    repository: Arc<R>,
    storage: Arc<S>,
}

impl<R: CarRepository, S: ImageStore> CarService<R, S> {
    /// Create a new CarService with the given repository and image store
    pub fn new(repository: R, storage: S) -> Self {
        Self {
            repository: Arc::new(repository),
            storage: Arc::new(storage),
        }
    }

    /// Create a new listing owned by `owner_id`
    ///
    /// All validation runs before the first external call. Uploads are
    /// issued concurrently; the first failure aborts the operation and
    /// nothing is persisted.
    #[instrument(skip(self, input), fields(car_title = %input.title, provider = %self.storage.name()))]
    pub async fn add_listing(&self, input: CreateCar, owner_id: Uuid) -> CarResult<Car> {
        if input.title.trim().is_empty() || input.description.trim().is_empty() {
            return Err(CarError::Validation(
                "title and description are required".to_string(),
            ));
        }
        if input.images.is_empty() {
            return Err(CarError::Validation(
                "at least one image is required".to_string(),
            ));
        }
        if input.images.len() > MAX_IMAGES_PER_CAR {
            return Err(CarError::Validation(
                "a maximum of 10 images is allowed".to_string(),
            ));
        }
        input
            .validate()
            .map_err(|e| CarError::Validation(e.to_string()))?;

        let images = self.upload_batch(&input.images).await?;

        self.repository.create(input, images, owner_id).await
    }

    /// List every listing owned by `owner_id`, newest first
    #[instrument(skip(self))]
    pub async fn list_by_owner(&self, owner_id: Uuid) -> CarResult<Vec<Car>> {
        self.repository.list_by_owner(owner_id).await
    }

    /// Global keyword search across all owners
    ///
    /// Matches case-insensitively against title, description, and tags.
    /// An empty keyword matches every listing.
    #[instrument(skip(self))]
    pub async fn search(&self, keyword: &str) -> CarResult<Vec<Car>> {
        self.repository.search(keyword).await
    }

    /// Fetch a single listing by id; no ownership check
    #[instrument(skip(self))]
    pub async fn get_car(&self, id: Uuid) -> CarResult<Car> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(CarError::NotFound(id))
    }

    /// Update a listing owned by `owner_id`
    ///
    /// When `input.images` is present the new payloads are uploaded first
    /// and the stored set is replaced wholesale; the images they displace
    /// are left in the store untouched.
    #[instrument(skip(self, input))]
    pub async fn update_listing(
        &self,
        id: Uuid,
        input: UpdateCar,
        owner_id: Uuid,
    ) -> CarResult<Car> {
        if let Some(ref images) = input.images {
            if images.is_empty() {
                return Err(CarError::Validation(
                    "at least one image is required".to_string(),
                ));
            }
            if images.len() > MAX_IMAGES_PER_CAR {
                return Err(CarError::Validation(
                    "a maximum of 10 images is allowed".to_string(),
                ));
            }
        }
        input
            .validate()
            .map_err(|e| CarError::Validation(e.to_string()))?;

        if self.repository.find_owned(id, owner_id).await?.is_none() {
            return Err(CarError::NotOwned(id));
        }

        let images = match input.images {
            Some(ref payloads) => Some(self.upload_batch(payloads).await?),
            None => None,
        };

        self.repository.update(id, input.into_patch(images)).await
    }

    /// Delete a listing owned by `owner_id`, removing its stored images
    ///
    /// Image deletions are issued concurrently; a single failure aborts the
    /// operation before the document is removed, so callers must not assume
    /// the listing is gone when this returns an error.
    #[instrument(skip(self))]
    pub async fn delete_listing(&self, id: Uuid, owner_id: Uuid) -> CarResult<()> {
        let car = self
            .repository
            .find_owned(id, owner_id)
            .await?
            .ok_or(CarError::NotOwned(id))?;

        try_join_all(car.images.iter().map(|image| self.storage.delete(image))).await?;

        self.repository.delete(id).await?;
        Ok(())
    }

    /// Fan out one upload per payload and await the whole batch
    async fn upload_batch(&self, payloads: &[String]) -> CarResult<Vec<ImageRef>> {
        try_join_all(payloads.iter().map(|payload| self.storage.upload(payload))).await
    }
}

impl<R: CarRepository, S: ImageStore> Clone for CarService<R, S> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            storage: Arc::clone(&self.storage),
        }
    }
}
