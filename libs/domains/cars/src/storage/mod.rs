//! Image storage provider implementations.
//!
//! This module contains the `ImageStore` trait and the Cloudinary
//! implementation used in production.

mod cloudinary;

pub use cloudinary::{CloudinaryConfig, CloudinaryStorage};

use crate::error::CarResult;
use crate::models::ImageRef;
use async_trait::async_trait;

/// Trait for external image storage providers.
///
/// Calls are independent of each other; the service fans a whole batch out
/// concurrently and awaits it as a unit. Retrying a failed `upload` is safe,
/// and `delete` of an already-removed reference must not be treated as
/// fatal by implementations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Upload one raw payload, returning the stored reference.
    async fn upload(&self, payload: &str) -> CarResult<ImageRef>;

    /// Delete one stored reference.
    async fn delete(&self, image: &ImageRef) -> CarResult<()>;

    /// Get the provider name for logging.
    fn name(&self) -> &'static str;
}
