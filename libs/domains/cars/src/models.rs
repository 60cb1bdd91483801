use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Maximum number of images a listing may carry.
pub const MAX_IMAGES_PER_CAR: usize = 10;

/// Reference handle to an image held by the external storage provider.
///
/// `public_id` is what the provider needs to delete the image again;
/// `url` is the delivery URL clients render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImageRef {
    /// Provider-assigned identifier
    pub public_id: String,
    /// Delivery URL
    pub url: String,
}

/// Car listing entity - represents an advertisement stored in MongoDB
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Car {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Listing title
    pub title: String,
    /// Listing description
    pub description: String,
    /// Tags for search and organization
    #[serde(default)]
    pub tags: Vec<String>,
    /// Body style / vehicle kind (e.g. "sedan", "suv")
    #[serde(default)]
    pub car_type: String,
    /// Manufacturer name
    #[serde(default)]
    pub company: String,
    /// Selling dealer name
    #[serde(default)]
    pub dealer: String,
    /// Stored image references, 1 to 10 per listing
    pub images: Vec<ImageRef>,
    /// Owner identity; set at creation and never changed afterwards
    pub created_by: Uuid,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new listing
///
/// `images` carries the raw payloads (base64 data URIs); they are uploaded
/// to the storage provider before the listing is persisted.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCar {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub car_type: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub dealer: String,
    /// Raw image payloads, 1 to 10
    #[validate(length(min = 1, max = 10))]
    pub images: Vec<String>,
}

/// DTO for updating an existing listing
///
/// Every field is optional; a present `images` field replaces the whole
/// stored image set with freshly uploaded payloads.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCar {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub car_type: Option<String>,
    pub company: Option<String>,
    pub dealer: Option<String>,
    /// Raw image payloads replacing the stored set, 1 to 10
    #[validate(length(min = 1, max = 10))]
    pub images: Option<Vec<String>>,
}

/// An `UpdateCar` after image resolution: raw payloads have been exchanged
/// for stored references. This is what the repository applies as a partial
/// merge.
#[derive(Debug, Clone, Default)]
pub struct CarPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub car_type: Option<String>,
    pub company: Option<String>,
    pub dealer: Option<String>,
    pub images: Option<Vec<ImageRef>>,
}

impl UpdateCar {
    /// Convert into a patch, substituting the uploaded references for the
    /// raw payloads that were submitted.
    pub fn into_patch(self, images: Option<Vec<ImageRef>>) -> CarPatch {
        CarPatch {
            title: self.title,
            description: self.description,
            tags: self.tags,
            car_type: self.car_type,
            company: self.company,
            dealer: self.dealer,
            images,
        }
    }
}

/// Query parameters for the global keyword search
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Keyword matched case-insensitively against title, description, and
    /// tags. An empty or absent keyword matches every listing.
    #[serde(default)]
    pub keyword: String,
}

impl Car {
    /// Build a new listing from a CreateCar DTO and the uploaded references
    pub fn new(input: CreateCar, images: Vec<ImageRef>, created_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title: input.title,
            description: input.description,
            tags: input.tags,
            car_type: input.car_type,
            company: input.company,
            dealer: input.dealer,
            images,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial merge from a CarPatch
    pub fn apply_patch(&mut self, patch: CarPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(car_type) = patch.car_type {
            self.car_type = car_type;
        }
        if let Some(company) = patch.company {
            self.company = company;
        }
        if let Some(dealer) = patch.dealer {
            self.dealer = dealer;
        }
        if let Some(images) = patch.images {
            self.images = images;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> CreateCar {
        CreateCar {
            title: "2019 Audi A4".to_string(),
            description: "Single owner, full service history".to_string(),
            tags: vec!["sedan".to_string(), "audi".to_string()],
            car_type: "sedan".to_string(),
            company: "Audi".to_string(),
            dealer: "Main Street Motors".to_string(),
            images: vec!["data:image/jpeg;base64,AAAA".to_string()],
        }
    }

    fn sample_refs() -> Vec<ImageRef> {
        vec![ImageRef {
            public_id: "cars/abc123".to_string(),
            url: "https://images.example.com/cars/abc123.jpg".to_string(),
        }]
    }

    #[test]
    fn test_new_car_takes_owner_and_references() {
        let owner = Uuid::now_v7();
        let car = Car::new(sample_input(), sample_refs(), owner);

        assert_eq!(car.created_by, owner);
        assert_eq!(car.images, sample_refs());
        assert_eq!(car.title, "2019 Audi A4");
        assert_eq!(car.created_at, car.updated_at);
    }

    #[test]
    fn test_apply_patch_merges_partial_fields() {
        let owner = Uuid::now_v7();
        let mut car = Car::new(sample_input(), sample_refs(), owner);

        car.apply_patch(CarPatch {
            title: Some("2019 Audi A4 quattro".to_string()),
            ..Default::default()
        });

        assert_eq!(car.title, "2019 Audi A4 quattro");
        // Untouched fields survive the merge
        assert_eq!(car.description, "Single owner, full service history");
        assert_eq!(car.images, sample_refs());
        assert_eq!(car.created_by, owner);
        assert!(car.updated_at >= car.created_at);
    }

    #[test]
    fn test_apply_patch_replaces_image_set() {
        let mut car = Car::new(sample_input(), sample_refs(), Uuid::now_v7());

        let replacement = vec![
            ImageRef {
                public_id: "cars/new1".to_string(),
                url: "https://images.example.com/cars/new1.jpg".to_string(),
            },
            ImageRef {
                public_id: "cars/new2".to_string(),
                url: "https://images.example.com/cars/new2.jpg".to_string(),
            },
        ];
        car.apply_patch(CarPatch {
            images: Some(replacement.clone()),
            ..Default::default()
        });

        assert_eq!(car.images, replacement);
    }

    #[test]
    fn test_create_car_validation_bounds() {
        let mut input = sample_input();
        assert!(input.validate().is_ok());

        input.images = vec![];
        assert!(input.validate().is_err());

        input.images = vec!["data:image/png;base64,AA".to_string(); 11];
        assert!(input.validate().is_err());

        input.images = vec!["data:image/png;base64,AA".to_string(); 10];
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_update_car_into_patch_swaps_payloads_for_references() {
        let update = UpdateCar {
            title: Some("new title".to_string()),
            images: Some(vec!["data:image/png;base64,AA".to_string()]),
            ..Default::default()
        };

        let patch = update.into_patch(Some(sample_refs()));

        assert_eq!(patch.title.as_deref(), Some("new title"));
        assert_eq!(patch.images, Some(sample_refs()));
    }
}
