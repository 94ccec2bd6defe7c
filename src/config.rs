//! Configuration for the ingest pipeline
//!
//! Configuration is loaded from YAML. Every field has a default, so an
//! empty file (or no file) gives a DynamoDB table named `stocks-data` fed
//! from S3. Command-line flags override file values.
//!
//! ```yaml
//! table:
//!   backend: duckdb
//!   name: stocks-data
//!   duckdb_path: ./bars.duckdb
//! source:
//!   root: ./buckets
//!   delimiter: ";"
//!   trim: true
//! ```

use crate::decode::{CsvDecoder, DecoderConfig};
use crate::error::{Error, Result, ResultExt};
use crate::pipeline::IngestPipeline;
use crate::source::{ObjectSource, ObjectStoreSource};
use crate::table::{BarTable, DuckDbTable, DynamoTable, MemoryTable};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default destination table name
pub const DEFAULT_TABLE_NAME: &str = "stocks-data";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Destination table
    #[serde(default)]
    pub table: TableConfig,

    /// Object storage
    #[serde(default)]
    pub source: SourceConfig,
}

// ============================================================================
// Table Config
// ============================================================================

/// Table backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TableBackend {
    /// Amazon DynamoDB
    #[default]
    Dynamodb,
    /// Local DuckDB database
    Duckdb,
    /// In-process memory (dry run)
    Memory,
}

/// Destination table configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// Table backend
    #[serde(default)]
    pub backend: TableBackend,

    /// Table name
    #[serde(default = "default_table_name")]
    pub name: String,

    /// DuckDB database file (in-memory when unset)
    #[serde(default)]
    pub duckdb_path: Option<PathBuf>,

    /// AWS region override
    #[serde(default)]
    pub region: Option<String>,

    /// Endpoint override (e.g. DynamoDB Local)
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

fn default_table_name() -> String {
    DEFAULT_TABLE_NAME.to_string()
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            backend: TableBackend::default(),
            name: default_table_name(),
            duckdb_path: None,
            region: None,
            endpoint_url: None,
        }
    }
}

// ============================================================================
// Source Config
// ============================================================================

/// Object storage and file format configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Local directory holding one subdirectory per bucket (S3 when unset)
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// AWS region override
    #[serde(default)]
    pub region: Option<String>,

    /// Endpoint override (e.g. MinIO)
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// CSV field delimiter
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Trim whitespace around CSV headers and values
    #[serde(default)]
    pub trim: bool,
}

fn default_delimiter() -> char {
    ','
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            root: None,
            region: None,
            endpoint_url: None,
            delimiter: default_delimiter(),
            trim: false,
        }
    }
}

impl SourceConfig {
    /// CSV decoder settings
    pub fn decoder_config(&self) -> Result<DecoderConfig> {
        let delimiter = u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                Error::config(format!(
                    "source.delimiter must be a single ASCII character, got '{}'",
                    self.delimiter
                ))
            })?;
        Ok(DecoderConfig::with_delimiter(delimiter).with_trim(self.trim))
    }
}

// ============================================================================
// Overrides
// ============================================================================

/// Values given on the command line, applied over the file config
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub table_backend: Option<TableBackend>,
    pub table_name: Option<String>,
    pub duckdb_path: Option<PathBuf>,
    pub source_root: Option<PathBuf>,
}

// ============================================================================
// Loading and Construction
// ============================================================================

impl IngestConfig {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(backend) = overrides.table_backend {
            self.table.backend = backend;
        }
        if let Some(name) = overrides.table_name {
            self.table.name = name;
        }
        if let Some(path) = overrides.duckdb_path {
            self.table.duckdb_path = Some(path);
        }
        if let Some(root) = overrides.source_root {
            self.source.root = Some(root);
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.table.name.trim().is_empty() {
            return Err(Error::config("table.name cannot be empty"));
        }
        self.source.decoder_config()?;
        if self.table.duckdb_path.is_some() && self.table.backend != TableBackend::Duckdb {
            tracing::warn!(
                backend = ?self.table.backend,
                "table.duckdb_path is ignored for this backend"
            );
        }
        Ok(())
    }

    /// Build the object source
    pub fn build_source(&self) -> Arc<dyn ObjectSource> {
        match &self.source.root {
            Some(root) => Arc::new(ObjectStoreSource::local(root)),
            None => Arc::new(ObjectStoreSource::s3(
                self.source.region.clone(),
                self.source.endpoint_url.clone(),
            )),
        }
    }

    /// Build the destination table
    pub async fn build_table(&self) -> Result<Arc<dyn BarTable>> {
        let name = self.table.name.clone();
        let table: Arc<dyn BarTable> = match self.table.backend {
            TableBackend::Dynamodb => Arc::new(
                DynamoTable::from_env(
                    name,
                    self.table.region.clone(),
                    self.table.endpoint_url.clone(),
                )
                .await,
            ),
            TableBackend::Duckdb => match &self.table.duckdb_path {
                Some(path) => Arc::new(DuckDbTable::open(path, name)?),
                None => Arc::new(DuckDbTable::in_memory(name)?),
            },
            TableBackend::Memory => Arc::new(MemoryTable::new(name)),
        };
        Ok(table)
    }

    /// Build the pipeline with its clients
    pub async fn build_pipeline(&self) -> Result<IngestPipeline> {
        self.validate()?;
        let decoder = CsvDecoder::with_config(self.source.decoder_config()?);
        let source = self.build_source();
        let table = self.build_table().await?;
        tracing::debug!(
            table = table.name(),
            backend = table.label(),
            local_source = self.source.root.is_some(),
            "Pipeline configured"
        );
        Ok(IngestPipeline::new(source, table).with_decoder(decoder))
    }
}
