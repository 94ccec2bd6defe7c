//! `object_store` backed object source

use super::ObjectSource;
use crate::envelope::ObjectRef;
use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// How stores are created for buckets that have not been seen yet
#[derive(Debug, Clone)]
pub enum StoreFactory {
    /// AWS S3, credentials and defaults from the environment
    S3 {
        region: Option<String>,
        endpoint_url: Option<String>,
    },
    /// Local directory; each bucket is a subdirectory of `root`
    Local { root: PathBuf },
    /// Only explicitly registered stores are used
    Registered,
}

/// Object source that resolves each bucket to an `ObjectStore`
///
/// Stores are built once per bucket and reused across invocations.
#[derive(Debug)]
pub struct ObjectStoreSource {
    factory: StoreFactory,
    stores: RwLock<HashMap<String, Arc<dyn ObjectStore>>>,
}

impl ObjectStoreSource {
    /// Create a source with the given store factory
    pub fn new(factory: StoreFactory) -> Self {
        Self {
            factory,
            stores: RwLock::new(HashMap::new()),
        }
    }

    /// S3 source configured from the environment
    pub fn s3(region: Option<String>, endpoint_url: Option<String>) -> Self {
        Self::new(StoreFactory::S3 {
            region,
            endpoint_url,
        })
    }

    /// Local directory source
    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self::new(StoreFactory::Local { root: root.into() })
    }

    /// Source with no factory; buckets must be registered
    pub fn registered() -> Self {
        Self::new(StoreFactory::Registered)
    }

    /// Register a store for a bucket
    #[must_use]
    pub fn with_store(mut self, bucket: impl Into<String>, store: Arc<dyn ObjectStore>) -> Self {
        self.stores.get_mut().insert(bucket.into(), store);
        self
    }

    /// Get the store factory
    pub fn factory(&self) -> &StoreFactory {
        &self.factory
    }

    /// Resolve the store for a bucket, building it on first use
    async fn store_for(&self, bucket: &str) -> Result<Arc<dyn ObjectStore>> {
        if let Some(store) = self.stores.read().await.get(bucket) {
            return Ok(Arc::clone(store));
        }

        let store = self.build_store(bucket)?;
        let mut stores = self.stores.write().await;
        let store = stores.entry(bucket.to_string()).or_insert(store);
        Ok(Arc::clone(store))
    }

    fn build_store(&self, bucket: &str) -> Result<Arc<dyn ObjectStore>> {
        match &self.factory {
            StoreFactory::S3 {
                region,
                endpoint_url,
            } => {
                let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
                if let Some(region) = region {
                    builder = builder.with_region(region);
                }
                if let Some(endpoint) = endpoint_url {
                    builder = builder
                        .with_endpoint(endpoint)
                        .with_allow_http(endpoint.starts_with("http://"));
                }

                let store = builder
                    .build()
                    .map_err(|e| Error::config(format!("Failed to create S3 client: {e}")))?;
                tracing::debug!(bucket, "Created S3 store");
                Ok(Arc::new(store))
            }
            StoreFactory::Local { root } => {
                let dir = root.join(bucket);
                let store = LocalFileSystem::new_with_prefix(&dir).map_err(|e| {
                    Error::config(format!(
                        "Failed to open local bucket {}: {e}",
                        dir.display()
                    ))
                })?;
                tracing::debug!(bucket, path = %dir.display(), "Created local store");
                Ok(Arc::new(store))
            }
            StoreFactory::Registered => Err(Error::config(format!(
                "No object store registered for bucket '{bucket}'"
            ))),
        }
    }
}

#[async_trait]
impl ObjectSource for ObjectStoreSource {
    async fn fetch(&self, obj: &ObjectRef) -> Result<Bytes> {
        let store = self
            .store_for(&obj.bucket)
            .await
            .map_err(|e| Error::fetch(&obj.bucket, &obj.key, e.to_string()))?;

        let path = object_path(obj)?;
        let result = store
            .get(&path)
            .await
            .map_err(|e| Error::fetch(&obj.bucket, &obj.key, e.to_string()))?;

        result
            .bytes()
            .await
            .map_err(|e| Error::fetch(&obj.bucket, &obj.key, e.to_string()))
    }
}

/// Store path for an object key, taken verbatim
///
/// Keys that the store cannot address as-is (empty segments, leading or
/// trailing `/`, `.` or `..` segments) fail instead of resolving to a
/// different object.
fn object_path(obj: &ObjectRef) -> Result<ObjectPath> {
    let path = ObjectPath::parse(&obj.key)
        .map_err(|e| Error::fetch(&obj.bucket, &obj.key, format!("unsupported object key: {e}")))?;
    let raw: &str = path.as_ref();
    if raw != obj.key {
        return Err(Error::fetch(
            &obj.bucket,
            &obj.key,
            "unsupported object key: leading or trailing '/'",
        ));
    }
    Ok(path)
}
