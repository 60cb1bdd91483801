//! Cars Domain
//!
//! This module provides a complete domain implementation for managing car
//! listings using MongoDB, with images held by an external storage provider.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business logic, validation, ownership rules
//! └──────┬──────┘
//!        │
//! ┌──────▼─────────────▼──────┐
//! │ Repository  │   Storage   │  ← Data access + image upload fan-out
//! └──────┬─────────────┬──────┘
//!        │             │
//! ┌──────▼──────┐ ┌────▼──────┐
//! │   MongoDB   │ │ Cloudinary│
//! └─────────────┘ └───────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_cars::{
//!     handlers,
//!     mongodb::MongoCarRepository,
//!     service::CarService,
//!     storage::CloudinaryStorage,
//! };
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create a MongoDB client
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("carhub");
//!
//! // Create a repository, the image store, and the service
//! let repository = MongoCarRepository::new(db);
//! let storage = CloudinaryStorage::from_env()?;
//! let service = CarService::new(repository, storage);
//!
//! // Create Axum router
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;
pub mod storage;

// Re-export commonly used types
pub use error::{CarError, CarResult};
pub use handlers::ApiDoc;
pub use models::{Car, CarPatch, CreateCar, ImageRef, SearchQuery, UpdateCar, MAX_IMAGES_PER_CAR};
pub use mongodb::MongoCarRepository;
pub use repository::CarRepository;
pub use service::CarService;
pub use storage::{CloudinaryConfig, CloudinaryStorage, ImageStore};
