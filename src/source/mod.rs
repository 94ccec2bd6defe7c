//! Object source module
//!
//! Retrieves price bar files from object storage.
//!
//! # Overview
//!
//! This module provides:
//! - `ObjectSource` - Trait for fetching an object's full contents
//! - `ObjectStoreSource` - `object_store` backed source (S3, local directory, in-memory)
//! - `fetch_rows` - Fetch, UTF-8 decode and CSV decode one object

mod store;

pub use store::{ObjectStoreSource, StoreFactory};

use crate::decode::{CsvDecoder, CsvRow};
use crate::envelope::ObjectRef;
use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;

/// Trait for retrieving whole objects
#[async_trait]
pub trait ObjectSource: Send + Sync {
    /// Fetch the full contents of an object
    async fn fetch(&self, obj: &ObjectRef) -> Result<Bytes>;
}

/// Fetch an object and decode it into CSV rows
///
/// The whole object is buffered before decoding. Any retrieval, UTF-8 or
/// CSV failure is reported as [`Error::Fetch`].
pub async fn fetch_rows(
    source: &dyn ObjectSource,
    decoder: &CsvDecoder,
    obj: &ObjectRef,
) -> Result<Vec<CsvRow>> {
    let data = source.fetch(obj).await.map_err(|e| match e {
        Error::Fetch { .. } => e,
        other => Error::fetch(&obj.bucket, &obj.key, other.to_string()),
    })?;

    let text = std::str::from_utf8(&data)
        .map_err(|e| Error::fetch(&obj.bucket, &obj.key, format!("invalid UTF-8: {e}")))?;

    decoder
        .decode(text)
        .map_err(|e| Error::fetch(&obj.bucket, &obj.key, e.to_string()))
}
