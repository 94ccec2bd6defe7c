//! Batch transform pipeline
//!
//! Drives one invocation: for each queue message, locate the referenced
//! file, split its key into symbol and timestamp, decode its rows, and
//! upsert one record per row.
//!
//! # Overview
//!
//! The pipeline module provides:
//! - `IngestPipeline` - The batch driver, built from an injected source and table
//! - `MessageOutcome` - Typed result of each message
//! - `BatchSummary` / `InvocationResponse` - Totals and the invoker-facing reply
//!
//! Messages are processed one at a time, in batch order. A failing message is
//! logged and skipped. A failing row abandons the rest of its file, but rows
//! already written are not rolled back.

mod types;

pub use types::{BatchSummary, InvocationResponse, MessageOutcome, PartialWrite};

use types::BATCH_SOURCE;

use crate::decode::{CsvDecoder, CsvRow};
use crate::envelope::{ObjectRef, QueueBatch, QueueMessage};
use crate::keys::{extract_symbol_timestamp, KeyParts};
use crate::record::BarRecord;
use crate::source::{fetch_rows, ObjectSource};
use crate::table::BarTable;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Batch driver for price bar ingestion
#[derive(Clone)]
pub struct IngestPipeline {
    /// Object storage client
    source: Arc<dyn ObjectSource>,
    /// Destination table
    table: Arc<dyn BarTable>,
    /// CSV decoder
    decoder: CsvDecoder,
}

impl IngestPipeline {
    /// Create a pipeline from its clients
    pub fn new(source: Arc<dyn ObjectSource>, table: Arc<dyn BarTable>) -> Self {
        Self {
            source,
            table,
            decoder: CsvDecoder::new(),
        }
    }

    /// Set the CSV decoder
    #[must_use]
    pub fn with_decoder(mut self, decoder: CsvDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    /// Get the destination table
    pub fn table(&self) -> &Arc<dyn BarTable> {
        &self.table
    }

    /// Handle one invocation event
    ///
    /// Returns a 400 response without processing anything when the event
    /// carries no `Records` batch. Otherwise returns 200 with the totals,
    /// whether or not individual messages failed.
    pub async fn handle_event(&self, event: &Value) -> InvocationResponse {
        let Some(batch) = QueueBatch::from_event(event) else {
            tracing::warn!("Invocation event has no {BATCH_SOURCE} Records");
            return InvocationResponse::no_records();
        };

        let summary = self.process_batch(&batch).await;
        InvocationResponse::processed(&summary, self.table.label())
    }

    /// Process every message of a batch, in order
    pub async fn process_batch(&self, batch: &QueueBatch) -> BatchSummary {
        let start = Instant::now();
        let mut summary = BatchSummary::new();

        for raw in batch.messages() {
            let outcome = self.process_message(raw).await;
            summary.record(outcome);
        }

        summary.set_duration(start.elapsed().as_millis() as u64);
        tracing::info!(
            messages = batch.len(),
            files = summary.files_processed,
            rows = summary.rows_inserted,
            failed = summary.failed(),
            duration_ms = summary.duration_ms,
            "Batch complete"
        );

        summary
    }

    /// Process one raw queue message
    pub async fn process_message(&self, raw: &Value) -> MessageOutcome {
        let message = match QueueMessage::parse(raw) {
            Ok(message) => message,
            Err(error) => {
                tracing::error!(error = %error, "Error parsing queue record");
                return MessageOutcome::EnvelopeError { error };
            }
        };

        let object = match message.object_ref() {
            Ok(object) => object,
            Err(error) => {
                tracing::error!(
                    message_id = message.message_id.as_deref().unwrap_or_default(),
                    error = %error,
                    "Error parsing queue record"
                );
                return MessageOutcome::EnvelopeError { error };
            }
        };

        self.ingest_object(&object).await
    }

    /// Ingest one stored object
    pub async fn ingest_object(&self, object: &ObjectRef) -> MessageOutcome {
        let parts = match extract_symbol_timestamp(&object.key) {
            Ok(parts) => parts,
            Err(error) => {
                tracing::error!(
                    key = %object.key,
                    error = %error,
                    "Error extracting symbol/timestamp from key"
                );
                return MessageOutcome::KeyError {
                    object: object.clone(),
                    error,
                };
            }
        };

        let rows = match fetch_rows(self.source.as_ref(), &self.decoder, object).await {
            Ok(rows) => rows,
            Err(error) => {
                tracing::error!(key = %object.key, error = %error, "Error reading CSV");
                return MessageOutcome::FetchError {
                    object: object.clone(),
                    error,
                };
            }
        };

        match self.ingest_rows(&parts, &rows).await {
            Ok(count) => {
                tracing::info!(
                    bucket = %object.bucket,
                    key = %object.key,
                    rows = count,
                    "Processed {}, inserted {count} rows",
                    object.key
                );
                MessageOutcome::Ingested {
                    object: object.clone(),
                    rows: count,
                }
            }
            Err(PartialWrite {
                rows_written,
                error,
            }) => {
                tracing::error!(
                    key = %object.key,
                    rows_written,
                    error = %error,
                    "Error inserting rows"
                );
                MessageOutcome::WriteFailed {
                    object: object.clone(),
                    rows_written,
                    error,
                }
            }
        }
    }

    /// Build and upsert one record per row, in file order
    ///
    /// Stops at the first row that fails to build or write. The rows
    /// written before it stay in the table.
    pub async fn ingest_rows(
        &self,
        parts: &KeyParts,
        rows: &[CsvRow],
    ) -> std::result::Result<usize, PartialWrite> {
        let mut rows_written = 0;

        for (index, row) in rows.iter().enumerate() {
            let failed = move |error| PartialWrite {
                rows_written,
                error,
            };

            let record = BarRecord::from_row(parts, index, row).map_err(failed)?;
            self.table.put(&record).await.map_err(failed)?;
            rows_written += 1;
        }

        Ok(rows_written)
    }
}

#[cfg(test)]
mod tests;
