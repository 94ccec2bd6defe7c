//! In-memory table

use super::BarTable;
use crate::error::Result;
use crate::record::BarRecord;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Table held in process memory, ordered by composite key
#[derive(Debug, Default)]
pub struct MemoryTable {
    name: String,
    items: RwLock<BTreeMap<(String, String), BarRecord>>,
    writes: AtomicUsize,
}

impl MemoryTable {
    /// Create an empty table
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Get a record by partition and sort key
    pub async fn get(&self, partition_key: &str, row_key: &str) -> Option<BarRecord> {
        let items = self.items.read().await;
        items
            .get(&(partition_key.to_string(), row_key.to_string()))
            .cloned()
    }

    /// All records, in key order
    pub async fn records(&self) -> Vec<BarRecord> {
        self.items.read().await.values().cloned().collect()
    }

    /// Number of distinct items stored
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Whether the table is empty
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Number of accepted writes, including overwrites
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl BarTable for MemoryTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> &str {
        "memory"
    }

    async fn put(&self, record: &BarRecord) -> Result<()> {
        let key = (record.symbol_timestamp.clone(), record.row_key.clone());
        self.items.write().await.insert(key, record.clone());
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
