//! Cloudinary image storage implementation.

use super::ImageStore;
use crate::error::{CarError, CarResult};
use crate::models::ImageRef;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use tracing::debug;

/// Cloudinary API configuration.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    /// Cloud name identifying the account.
    pub cloud_name: String,
    /// API key.
    pub api_key: String,
    /// API secret used for request signing.
    pub api_secret: String,
    /// API base URL (defaults to production).
    pub api_url: String,
}

impl CloudinaryConfig {
    /// Create a new Cloudinary configuration.
    pub fn new(cloud_name: String, api_key: String, api_secret: String) -> Self {
        Self {
            cloud_name,
            api_key,
            api_secret,
            api_url: "https://api.cloudinary.com/v1_1".to_string(),
        }
    }

    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, CarError> {
        let cloud_name = std::env::var("CLOUDINARY_CLOUD_NAME")
            .map_err(|_| CarError::Config("CLOUDINARY_CLOUD_NAME not set".to_string()))?;
        let api_key = std::env::var("CLOUDINARY_API_KEY")
            .map_err(|_| CarError::Config("CLOUDINARY_API_KEY not set".to_string()))?;
        let api_secret = std::env::var("CLOUDINARY_API_SECRET")
            .map_err(|_| CarError::Config("CLOUDINARY_API_SECRET not set".to_string()))?;

        Ok(Self::new(cloud_name, api_key, api_secret))
    }
}

/// Cloudinary image storage provider.
#[derive(Clone)]
pub struct CloudinaryStorage {
    config: CloudinaryConfig,
    client: Client,
}

impl CloudinaryStorage {
    /// Create a new Cloudinary provider.
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Create a provider from environment variables.
    pub fn from_env() -> Result<Self, CarError> {
        let config = CloudinaryConfig::from_env()?;
        Ok(Self::new(config))
    }

    /// Compute the request signature: SHA-256 over the sorted
    /// `key=value` pairs joined with `&`, with the API secret appended.
    fn api_signature(params: &[(&str, &str)], secret: &str) -> String {
        let mut pairs: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        pairs.sort();

        let to_sign = format!("{}{}", pairs.join("&"), secret);
        let digest = Sha256::digest(to_sign.as_bytes());

        digest.iter().fold(String::with_capacity(64), |mut hex, b| {
            let _ = write!(hex, "{:02x}", b);
            hex
        })
    }

    /// Extract the provider's error message from a failed response.
    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<CloudinaryErrorBody>().await {
            Ok(body) => body.error.message,
            Err(_) => format!("unexpected status {}", status),
        }
    }
}

// Cloudinary API response structures

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorBody {
    error: CloudinaryErrorDetail,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorDetail {
    message: String,
}

#[async_trait]
impl ImageStore for CloudinaryStorage {
    async fn upload(&self, payload: &str) -> CarResult<ImageRef> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = Self::api_signature(&[("timestamp", &timestamp)], &self.config.api_secret);

        let url = format!(
            "{}/{}/image/upload",
            self.config.api_url, self.config.cloud_name
        );
        let form = [
            ("file", payload),
            ("api_key", &self.config.api_key),
            ("timestamp", &timestamp),
            ("signature", &signature),
            ("signature_algorithm", "sha256"),
        ];

        let response = self.client.post(&url).form(&form).send().await?;

        if !response.status().is_success() {
            return Err(CarError::Storage(Self::error_message(response).await));
        }

        let uploaded: UploadResponse = response.json().await?;
        debug!(public_id = %uploaded.public_id, "Image uploaded");

        Ok(ImageRef {
            public_id: uploaded.public_id,
            url: uploaded.secure_url,
        })
    }

    async fn delete(&self, image: &ImageRef) -> CarResult<()> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = Self::api_signature(
            &[
                ("public_id", &image.public_id),
                ("timestamp", &timestamp),
            ],
            &self.config.api_secret,
        );

        let url = format!(
            "{}/{}/image/destroy",
            self.config.api_url, self.config.cloud_name
        );
        let form = [
            ("public_id", image.public_id.as_str()),
            ("api_key", &self.config.api_key),
            ("timestamp", &timestamp),
            ("signature", &signature),
            ("signature_algorithm", "sha256"),
        ];

        let response = self.client.post(&url).form(&form).send().await?;

        if !response.status().is_success() {
            return Err(CarError::Storage(Self::error_message(response).await));
        }

        let destroyed: DestroyResponse = response.json().await?;
        debug!(public_id = %image.public_id, result = %destroyed.result, "Image destroy requested");

        // "not found" means the reference was already gone; deleting an
        // already-removed handle is not an error
        match destroyed.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(CarError::Storage(format!(
                "unexpected destroy result: {}",
                other
            ))),
        }
    }

    fn name(&self) -> &'static str {
        "cloudinary"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_signature_is_sorted_and_deterministic() {
        let forward =
            CloudinaryStorage::api_signature(&[("public_id", "x"), ("timestamp", "1")], "secret");
        let reversed =
            CloudinaryStorage::api_signature(&[("timestamp", "1"), ("public_id", "x")], "secret");

        assert_eq!(forward, reversed);
        assert_eq!(forward.len(), 64);
        assert!(forward.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_api_signature_depends_on_secret() {
        let one = CloudinaryStorage::api_signature(&[("timestamp", "1")], "secret_a");
        let two = CloudinaryStorage::api_signature(&[("timestamp", "1")], "secret_b");

        assert_ne!(one, two);
    }

    #[test]
    fn test_config_from_env() {
        temp_env::with_vars(
            [
                ("CLOUDINARY_CLOUD_NAME", Some("carhub")),
                ("CLOUDINARY_API_KEY", Some("key123")),
                ("CLOUDINARY_API_SECRET", Some("shhh")),
            ],
            || {
                let config = CloudinaryConfig::from_env().unwrap();
                assert_eq!(config.cloud_name, "carhub");
                assert_eq!(config.api_key, "key123");
                assert_eq!(config.api_secret, "shhh");
                assert_eq!(config.api_url, "https://api.cloudinary.com/v1_1");
            },
        );
    }

    #[test]
    fn test_config_from_env_missing_secret() {
        temp_env::with_vars(
            [
                ("CLOUDINARY_CLOUD_NAME", Some("carhub")),
                ("CLOUDINARY_API_KEY", Some("key123")),
                ("CLOUDINARY_API_SECRET", None),
            ],
            || {
                let result = CloudinaryConfig::from_env();
                assert!(matches!(result, Err(CarError::Config(_))));
            },
        );
    }
}
