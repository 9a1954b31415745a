//! Object Storage
//!
//! Blob storage for product images, addressed by bucket and key.

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, Url};
use rustc_hash::FxHashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::warn;

/// Errors that can occur when storing objects.
#[derive(Debug, Error)]
pub enum ObjectStorageError {
    /// An HTTP transport error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL cannot address objects.
    #[error("invalid object storage url: {0}")]
    InvalidUrl(String),

    /// The storage service rejected the upload.
    #[error("upload of {bucket}/{key} rejected: {reason}")]
    Rejected {
        bucket: String,
        key: String,
        reason: String,
    },
}

#[automock]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` under `bucket/key`, replacing any existing object.
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ObjectStorageError>;

    /// Public URL an uploaded object is served from.
    fn public_url(&self, bucket: &str, key: &str) -> String;
}

/// Connection settings for a REST object storage service.
#[derive(Debug, Clone)]
pub struct RestObjectStorageConfig {
    /// Backend base URL.
    pub url: String,

    /// API key sent as both `apikey` and bearer token.
    pub api_key: String,
}

/// HTTP client for a storage service exposing `/storage/v1/object`.
#[derive(Debug, Clone)]
pub struct RestObjectStorage {
    config: RestObjectStorageConfig,
    http: Client,
}

impl RestObjectStorage {
    #[must_use]
    pub fn new(config: RestObjectStorageConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn base(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    /// `<base>/<route..>/<bucket>/<key..>` with every segment percent-encoded.
    fn object_url(&self, route: &[&str], bucket: &str, key: &str) -> Result<Url, ObjectStorageError> {
        let mut url = Url::parse(self.base())
            .map_err(|error| ObjectStorageError::InvalidUrl(format!("{}: {error}", self.base())))?;

        url.path_segments_mut()
            .map_err(|()| ObjectStorageError::InvalidUrl(self.base().to_string()))?
            .pop_if_empty()
            .extend(route)
            .push(bucket)
            .extend(key.split('/'));

        Ok(url)
    }
}

#[async_trait]
impl ObjectStorage for RestObjectStorage {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ObjectStorageError> {
        let url = self.object_url(&["storage", "v1", "object"], bucket, key)?;

        let response = self
            .http
            .post(url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .header("Content-Type", content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(ObjectStorageError::Rejected {
                bucket: bucket.to_string(),
                key: key.to_string(),
                reason: format!("status {status}: {text}"),
            });
        }

        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        self.object_url(&["storage", "v1", "object", "public"], bucket, key)
            .map_or_else(
                |error| {
                    warn!(%error, "falling back to an unencoded public url");

                    format!("{}/storage/v1/object/public/{bucket}/{key}", self.base())
                },
                String::from,
            )
    }
}

/// An uploaded object held by [`InMemoryObjectStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Object storage kept in process memory.
#[derive(Debug, Default)]
pub struct InMemoryObjectStorage {
    objects: RwLock<FxHashMap<(String, String), StoredObject>>,
}

impl InMemoryObjectStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The object stored under `bucket/key`, if any.
    pub async fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .read()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ObjectStorageError> {
        self.objects.write().await.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );

        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("memory://{bucket}/{key}")
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn in_memory_upload_replaces_existing_object() -> TestResult {
        let storage = InMemoryObjectStorage::new();

        storage
            .upload("products", "1/cajon.png", vec![1, 2], "image/png")
            .await?;
        storage
            .upload("products", "1/cajon.png", vec![3], "image/webp")
            .await?;

        assert_eq!(
            storage.object("products", "1/cajon.png").await,
            Some(StoredObject {
                bytes: vec![3],
                content_type: "image/webp".to_string(),
            })
        );

        Ok(())
    }

    #[test]
    fn rest_public_url_points_at_public_route() {
        let storage = RestObjectStorage::new(RestObjectStorageConfig {
            url: "https://shop.example.co".to_string(),
            api_key: "key".to_string(),
        });

        assert_eq!(
            storage.public_url("products", "4/snare.jpg"),
            "https://shop.example.co/storage/v1/object/public/products/4/snare.jpg"
        );
    }

    #[test]
    fn rest_object_urls_encode_file_names() -> TestResult {
        let storage = RestObjectStorage::new(RestObjectStorageConfig {
            url: "https://shop.example.co/".to_string(),
            api_key: "key".to_string(),
        });

        let upload = storage.object_url(&["storage", "v1", "object"], "products", "3/my photo#1?.png")?;

        assert_eq!(upload.path(), "/storage/v1/object/products/3/my%20photo%231%3F.png");
        assert_eq!(upload.query(), None);
        assert_eq!(upload.fragment(), None);
        assert_eq!(
            storage.public_url("products", "3/a b.png"),
            "https://shop.example.co/storage/v1/object/public/products/3/a%20b.png"
        );

        Ok(())
    }

    #[test]
    fn rest_object_url_rejects_unparseable_base() {
        let storage = RestObjectStorage::new(RestObjectStorageConfig {
            url: "not a url".to_string(),
            api_key: "key".to_string(),
        });

        assert!(matches!(
            storage.object_url(&["storage"], "products", "1/a.png"),
            Err(ObjectStorageError::InvalidUrl(_))
        ));
    }
}
