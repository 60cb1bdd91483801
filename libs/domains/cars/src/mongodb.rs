//! MongoDB implementation of CarRepository

use async_trait::async_trait;
use mongodb::{
    bson::{doc, to_bson, Bson},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{CarError, CarResult};
use crate::models::{Car, CarPatch, CreateCar, ImageRef};
use crate::repository::CarRepository;

/// MongoDB implementation of the CarRepository
pub struct MongoCarRepository {
    collection: Collection<Car>,
}

impl MongoCarRepository {
    /// Create a new MongoCarRepository
    ///
    /// # Arguments
    /// * `db` - MongoDB database instance
    pub fn new(db: Database) -> Self {
        let collection = db.collection::<Car>("cars");
        Self { collection }
    }

    /// Create a new MongoCarRepository with a custom collection name
    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        let collection = db.collection::<Car>(collection_name);
        Self { collection }
    }

    /// Initialize indexes for optimal query performance
    pub async fn init_indexes(&self) -> CarResult<()> {
        let indexes = vec![
            // Ownership lookups back every mutation
            IndexModel::builder()
                .keys(doc! { "created_by": 1, "created_at": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_created_by".to_string())
                        .build(),
                )
                .build(),
            // Tag matches in keyword search
            IndexModel::builder()
                .keys(doc! { "tags": 1 })
                .options(IndexOptions::builder().name("idx_tags".to_string()).build())
                .build(),
            // Newest-first listing order
            IndexModel::builder()
                .keys(doc! { "created_at": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_created_at".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Car indexes created successfully");
        Ok(())
    }

    /// Get the underlying collection for advanced operations
    pub fn collection(&self) -> &Collection<Car> {
        &self.collection
    }

    /// Build the keyword-search filter: case-insensitive match against
    /// title, description, or any tag. An empty keyword matches every
    /// document.
    fn keyword_filter(keyword: &str) -> mongodb::bson::Document {
        doc! {
            "$or": [
                { "title": { "$regex": keyword, "$options": "i" } },
                { "description": { "$regex": keyword, "$options": "i" } },
                { "tags": { "$regex": keyword, "$options": "i" } },
            ]
        }
    }

    /// Build the `(id, created_by)` filter used by the ownership-scoped
    /// lookup
    fn owned_filter(id: Uuid, owner_id: Uuid) -> mongodb::bson::Document {
        doc! {
            "_id": to_bson(&id).unwrap_or(Bson::Null),
            "created_by": to_bson(&owner_id).unwrap_or(Bson::Null),
        }
    }
}

#[async_trait]
impl CarRepository for MongoCarRepository {
    #[instrument(skip(self, input, images), fields(car_title = %input.title))]
    async fn create(
        &self,
        input: CreateCar,
        images: Vec<ImageRef>,
        created_by: Uuid,
    ) -> CarResult<Car> {
        let car = Car::new(input, images, created_by);

        self.collection.insert_one(&car).await?;

        tracing::info!(car_id = %car.id, "Car created successfully");
        Ok(car)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> CarResult<Option<Car>> {
        let filter = doc! { "_id": to_bson(&id).unwrap_or(Bson::Null) };
        let car = self.collection.find_one(filter).await?;
        Ok(car)
    }

    #[instrument(skip(self))]
    async fn list_by_owner(&self, owner_id: Uuid) -> CarResult<Vec<Car>> {
        use futures_util::TryStreamExt;

        let filter = doc! { "created_by": to_bson(&owner_id).unwrap_or(Bson::Null) };

        let options = mongodb::options::FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self.collection.find(filter).with_options(options).await?;
        let cars: Vec<Car> = cursor.try_collect().await?;

        Ok(cars)
    }

    #[instrument(skip(self))]
    async fn find_owned(&self, id: Uuid, owner_id: Uuid) -> CarResult<Option<Car>> {
        let car = self
            .collection
            .find_one(Self::owned_filter(id, owner_id))
            .await?;
        Ok(car)
    }

    #[instrument(skip(self))]
    async fn search(&self, keyword: &str) -> CarResult<Vec<Car>> {
        use futures_util::TryStreamExt;

        let options = mongodb::options::FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self
            .collection
            .find(Self::keyword_filter(keyword))
            .with_options(options)
            .await?;
        let cars: Vec<Car> = cursor.try_collect().await?;

        Ok(cars)
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: Uuid, patch: CarPatch) -> CarResult<Car> {
        // First, get the existing listing
        let filter = doc! { "_id": to_bson(&id).unwrap_or(Bson::Null) };
        let existing = self
            .collection
            .find_one(filter.clone())
            .await?
            .ok_or(CarError::NotFound(id))?;

        // Apply the partial merge
        let mut updated = existing;
        updated.apply_patch(patch);

        // Replace the document
        self.collection.replace_one(filter, &updated).await?;

        tracing::info!(car_id = %id, "Car updated successfully");
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> CarResult<bool> {
        let filter = doc! { "_id": to_bson(&id).unwrap_or(Bson::Null) };
        let result = self.collection.delete_one(filter).await?;

        if result.deleted_count == 0 {
            return Err(CarError::NotFound(id));
        }

        tracing::info!(car_id = %id, "Car deleted successfully");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_filter_covers_all_searchable_fields() {
        let filter = MongoCarRepository::keyword_filter("sedan");
        let branches = filter.get_array("$or").unwrap();

        assert_eq!(branches.len(), 3);
        let fields: Vec<&str> = branches
            .iter()
            .map(|b| b.as_document().unwrap().keys().next().unwrap().as_str())
            .collect();
        assert_eq!(fields, vec!["title", "description", "tags"]);
    }

    #[test]
    fn test_keyword_filter_is_case_insensitive() {
        let filter = MongoCarRepository::keyword_filter("Sedan");
        let first = filter.get_array("$or").unwrap()[0]
            .as_document()
            .unwrap()
            .get_document("title")
            .unwrap();

        assert_eq!(first.get_str("$regex").unwrap(), "Sedan");
        assert_eq!(first.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn test_empty_keyword_builds_match_all_regex() {
        // An empty $regex matches every document; the search contract
        // deliberately treats a missing keyword as "match all"
        let filter = MongoCarRepository::keyword_filter("");
        let first = filter.get_array("$or").unwrap()[0]
            .as_document()
            .unwrap()
            .get_document("title")
            .unwrap();

        assert_eq!(first.get_str("$regex").unwrap(), "");
    }

    #[test]
    fn test_owned_filter_scopes_by_id_and_owner() {
        let id = Uuid::now_v7();
        let owner = Uuid::now_v7();

        let filter = MongoCarRepository::owned_filter(id, owner);

        assert!(filter.contains_key("_id"));
        assert!(filter.contains_key("created_by"));
    }
}
