//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::IngestConfig;
use crate::envelope::ObjectRef;
use crate::error::{Error, Result};
use crate::keys::extract_symbol_timestamp;
use crate::pipeline::{IngestPipeline, MessageOutcome};
use serde_json::{json, Value};
use std::io::Read;
use std::path::Path;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Handle { event } => self.handle(event.as_deref()).await,
            Commands::Ingest { bucket, key } => self.ingest(bucket, key).await,
            Commands::ParseKey { key } => Self::parse_key(key),
            Commands::Serve { port } => {
                let pipeline = self.pipeline().await?;
                crate::cli::serve(pipeline, *port).await
            }
        }
    }

    /// Load configuration and apply flag overrides
    fn load_config(&self) -> Result<IngestConfig> {
        let config = match &self.cli.config {
            Some(path) => IngestConfig::load(path)?,
            None => IngestConfig::default(),
        };
        Ok(config.with_overrides(self.cli.overrides()))
    }

    async fn pipeline(&self) -> Result<IngestPipeline> {
        self.load_config()?.build_pipeline().await
    }

    /// Process an invocation event
    async fn handle(&self, event_path: Option<&Path>) -> Result<()> {
        let event = read_event(event_path)?;
        let pipeline = self.pipeline().await?;

        let response = pipeline.handle_event(&event).await;
        println!("{}", serde_json::to_string(&response)?);
        Ok(())
    }

    /// Ingest one object
    async fn ingest(&self, bucket: &str, key: &str) -> Result<()> {
        let pipeline = self.pipeline().await?;
        let outcome = pipeline.ingest_object(&ObjectRef::new(bucket, key)).await;

        println!("{}", outcome_json(&outcome));
        match outcome.error() {
            Some(e) => Err(Error::Other(format!("Failed to ingest s3://{bucket}/{key}: {e}"))),
            None => Ok(()),
        }
    }

    /// Print how a key is split
    fn parse_key(key: &str) -> Result<()> {
        let parts = extract_symbol_timestamp(key)?;
        let output = json!({
            "symbol": parts.symbol,
            "timestamp": parts.timestamp,
            "partition_key": parts.partition_key(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

/// Read an event from a file, or stdin when no path is given
fn read_event(path: Option<&Path>) -> Result<Value> {
    let content = match path {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read event file '{}': {e}", path.display()))
        })?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(serde_json::from_str(&content)?)
}

/// JSON view of a message outcome
pub(crate) fn outcome_json(outcome: &MessageOutcome) -> Value {
    let status = match outcome {
        MessageOutcome::Ingested { .. } => "ingested",
        MessageOutcome::EnvelopeError { .. } => "envelope_error",
        MessageOutcome::KeyError { .. } => "key_error",
        MessageOutcome::FetchError { .. } => "fetch_error",
        MessageOutcome::WriteFailed { .. } => "write_failed",
    };

    json!({
        "status": status,
        "object": outcome.object(),
        "rows_written": outcome.rows_written(),
        "error": outcome.error().map(ToString::to_string),
    })
}
