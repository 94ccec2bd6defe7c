//! Tests for pipeline module

use super::*;
use crate::envelope::ObjectWriteEvent;
use crate::error::{Error, ErrorKind, Result};
use crate::source::ObjectStoreSource;
use crate::table::MemoryTable;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};

const BUCKET: &str = "market-data";
const LYFT_KEY: &str = "stocks/LYFT/LYFT2025-11-17_15-26-55.csv";
const LYFT_CSV: &str = "date,open,close,high,low,volume\n\
                        2025-11-12,14.10,14.50,14.90,13.95,1000\n\
                        2025-11-13,14.50,14.20,14.80,14.00,1100\n\
                        2025-11-14,14.20,15.00,15.10,14.10,1200\n";

// ============================================================================
// Helpers
// ============================================================================

/// Table that rejects one write, by zero-based attempt number
struct FailingTable {
    inner: MemoryTable,
    fail_on: usize,
    attempts: AtomicUsize,
}

impl FailingTable {
    fn new(fail_on: usize) -> Self {
        Self {
            inner: MemoryTable::new("stocks-data"),
            fail_on,
            attempts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl BarTable for FailingTable {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn label(&self) -> &str {
        "memory"
    }

    async fn put(&self, record: &BarRecord) -> Result<()> {
        if self.attempts.fetch_add(1, Ordering::SeqCst) == self.fail_on {
            return Err(Error::write(self.name(), "throughput exceeded"));
        }
        self.inner.put(record).await
    }
}

async fn source_with(objects: &[(&str, &str)]) -> Arc<dyn ObjectSource> {
    let store = InMemory::new();
    for (key, body) in objects {
        store
            .put(&ObjectPath::parse(*key).unwrap(), Bytes::from(body.to_string()).into())
            .await
            .unwrap();
    }
    Arc::new(ObjectStoreSource::registered().with_store(BUCKET, Arc::new(store)))
}

fn body_for(key: &str) -> String {
    ObjectWriteEvent::for_object(&ObjectRef::new(BUCKET, key))
        .to_body()
        .unwrap()
}

fn event_for(keys: &[&str]) -> Value {
    QueueBatch::from_bodies(keys.iter().map(|k| body_for(k))).to_event()
}

// ============================================================================
// Happy Path Tests
// ============================================================================

#[tokio::test]
async fn test_three_row_file() {
    let table = Arc::new(MemoryTable::new("stocks-data"));
    let pipeline = IngestPipeline::new(source_with(&[(LYFT_KEY, LYFT_CSV)]).await, table.clone());

    let response = pipeline.handle_event(&event_for(&[LYFT_KEY])).await;
    assert_eq!(
        response,
        InvocationResponse {
            status_code: 200,
            message: "Processed 1 files with 3 rows into memory".to_string(),
        }
    );

    let keys: Vec<_> = table
        .records()
        .await
        .into_iter()
        .map(|r| (r.symbol_timestamp, r.row_key))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("LYFT_2025-11-17_15-26-55".to_string(), "2025-11-12_0".to_string()),
            ("LYFT_2025-11-17_15-26-55".to_string(), "2025-11-13_1".to_string()),
            ("LYFT_2025-11-17_15-26-55".to_string(), "2025-11-14_2".to_string()),
        ]
    );
    assert_eq!(table.write_count(), 3);
}

#[tokio::test]
async fn test_record_fields_written() {
    let table = Arc::new(MemoryTable::new("stocks-data"));
    let pipeline = IngestPipeline::new(source_with(&[(LYFT_KEY, LYFT_CSV)]).await, table.clone());

    pipeline.ingest_object(&ObjectRef::new(BUCKET, LYFT_KEY)).await;

    let record = table
        .get("LYFT_2025-11-17_15-26-55", "2025-11-14_2")
        .await
        .unwrap();
    assert_eq!(record.symbol, "LYFT");
    assert_eq!(record.timestamp, "2025-11-17_15-26-55");
    assert_eq!(record.date, "2025-11-14");
    assert_eq!(record.close.to_string(), "15.00");
    assert_eq!(record.volume, 1200);
}

#[tokio::test]
async fn test_header_only_file_counts_as_processed() {
    let key = "stocks/AAPL/AAPL20240102.csv";
    let table = Arc::new(MemoryTable::new("stocks-data"));
    let source = source_with(&[(key, "date,open,close,high,low,volume\n")]).await;
    let pipeline = IngestPipeline::new(source, table.clone());

    let summary = pipeline
        .process_batch(&QueueBatch::from_bodies([body_for(key)]))
        .await;
    assert_eq!(summary.files_processed, 1);
    assert_eq!(summary.rows_inserted, 0);
    assert!(table.is_empty().await);
}

// ============================================================================
// Envelope Tests
// ============================================================================

#[tokio::test]
async fn test_empty_batch() {
    let pipeline = IngestPipeline::new(
        source_with(&[]).await,
        Arc::new(MemoryTable::new("stocks-data")),
    );

    let response = pipeline.handle_event(&json!({ "Records": [] })).await;
    assert!(response.is_ok());
    assert_eq!(response.message, "Processed 0 files with 0 rows into memory");
}

#[tokio::test]
async fn test_missing_batch_field() {
    let table = Arc::new(MemoryTable::new("stocks-data"));
    let pipeline = IngestPipeline::new(source_with(&[]).await, table.clone());

    let response = pipeline.handle_event(&json!({ "detail": {} })).await;
    assert_eq!(response.status_code, 400);
    assert_eq!(response.message, "No SQS Records");
    assert_eq!(table.write_count(), 0);
}

#[tokio::test]
async fn test_malformed_message_is_skipped() {
    let table = Arc::new(MemoryTable::new("stocks-data"));
    let pipeline = IngestPipeline::new(source_with(&[(LYFT_KEY, LYFT_CSV)]).await, table.clone());

    let event = json!({
        "Records": [
            { "body": "not json" },
            { "messageId": "no-body" },
            { "body": body_for(LYFT_KEY) }
        ]
    });
    let batch = QueueBatch::from_event(&event).unwrap();
    let summary = pipeline.process_batch(&batch).await;

    assert_eq!(summary.files_processed, 1);
    assert_eq!(summary.rows_inserted, 3);
    assert_eq!(summary.failed(), 2);
    assert!(matches!(summary.outcomes[0], MessageOutcome::EnvelopeError { .. }));
    assert!(matches!(summary.outcomes[1], MessageOutcome::EnvelopeError { .. }));
    assert!(summary.outcomes[0].object().is_none());
    assert!(summary.outcomes[2].is_success());
}

// ============================================================================
// Stage Failure Tests
// ============================================================================

#[tokio::test]
async fn test_bad_key_is_skipped() {
    let pipeline = IngestPipeline::new(
        source_with(&[("LYFT2025.csv", LYFT_CSV)]).await,
        Arc::new(MemoryTable::new("stocks-data")),
    );

    let outcome = pipeline
        .ingest_object(&ObjectRef::new(BUCKET, "LYFT2025.csv"))
        .await;
    assert!(matches!(outcome, MessageOutcome::KeyError { .. }));
    assert_eq!(outcome.error().unwrap().kind(), ErrorKind::KeyFormat);
}

#[tokio::test]
async fn test_missing_object_is_skipped() {
    let pipeline = IngestPipeline::new(
        source_with(&[]).await,
        Arc::new(MemoryTable::new("stocks-data")),
    );

    let outcome = pipeline.ingest_object(&ObjectRef::new(BUCKET, LYFT_KEY)).await;
    assert!(matches!(outcome, MessageOutcome::FetchError { .. }));
    assert_eq!(outcome.error().unwrap().kind(), ErrorKind::Fetch);
    assert_eq!(outcome.object().unwrap().key, LYFT_KEY);
}

#[tokio::test]
async fn test_bad_volume_aborts_only_that_file() {
    let bad_key = "stocks/GME/GME2025-11-17_15-26-55.csv";
    let bad_csv = "date,open,close,high,low,volume\n\
                   2025-11-12,20,21,22,19,500\n\
                   2025-11-13,21,22,23,20,not-a-number\n\
                   2025-11-14,22,23,24,21,700\n";

    let table = Arc::new(MemoryTable::new("stocks-data"));
    let source = source_with(&[(bad_key, bad_csv), (LYFT_KEY, LYFT_CSV)]).await;
    let pipeline = IngestPipeline::new(source, table.clone());

    let batch = QueueBatch::from_bodies([body_for(bad_key), body_for(LYFT_KEY)]);
    let summary = pipeline.process_batch(&batch).await;

    assert_eq!(summary.files_processed, 1);
    assert_eq!(summary.rows_inserted, 3);

    match &summary.outcomes[0] {
        MessageOutcome::WriteFailed {
            rows_written,
            error,
            ..
        } => {
            assert_eq!(*rows_written, 1);
            assert_eq!(error.kind(), ErrorKind::RowCoercion);
        }
        other => panic!("expected WriteFailed, got {other:?}"),
    }

    // The row before the bad one stands; the rows after it were never written
    let partition = "GME_2025-11-17_15-26-55";
    assert!(table.get(partition, "2025-11-12_0").await.is_some());
    assert!(table.get(partition, "2025-11-14_2").await.is_none());
    assert_eq!(table.len().await, 4);
}

#[tokio::test]
async fn test_missing_column_aborts_file() {
    let key = "stocks/F/F2025.csv";
    let table = Arc::new(MemoryTable::new("stocks-data"));
    let source = source_with(&[(key, "date,open,close,high,volume\n2025-01-02,1,2,3,4\n")]).await;
    let pipeline = IngestPipeline::new(source, table.clone());

    let outcome = pipeline.ingest_object(&ObjectRef::new(BUCKET, key)).await;
    assert_eq!(outcome.error().unwrap().kind(), ErrorKind::MissingColumn);
    assert_eq!(outcome.rows_written(), 0);
    assert!(table.is_empty().await);
}

#[tokio::test]
async fn test_write_failure_keeps_earlier_rows() {
    let table = Arc::new(FailingTable::new(1));
    let pipeline = IngestPipeline::new(source_with(&[(LYFT_KEY, LYFT_CSV)]).await, table.clone());

    let response = pipeline.handle_event(&event_for(&[LYFT_KEY])).await;
    assert_eq!(response.message, "Processed 0 files with 0 rows into memory");

    // No rollback: row 0 was accepted before row 1 was rejected
    assert_eq!(table.inner.len().await, 1);
    assert!(table
        .inner
        .get("LYFT_2025-11-17_15-26-55", "2025-11-12_0")
        .await
        .is_some());

    let outcome = pipeline.ingest_object(&ObjectRef::new(BUCKET, LYFT_KEY)).await;
    assert!(outcome.is_success(), "later attempts are not rejected");
}

#[tokio::test]
async fn test_write_failure_outcome() {
    let table = Arc::new(FailingTable::new(2));
    let pipeline = IngestPipeline::new(source_with(&[(LYFT_KEY, LYFT_CSV)]).await, table);

    let outcome = pipeline.ingest_object(&ObjectRef::new(BUCKET, LYFT_KEY)).await;
    assert!(matches!(outcome, MessageOutcome::WriteFailed { rows_written: 2, .. }));
    assert_eq!(outcome.error().unwrap().kind(), ErrorKind::Write);
    assert_eq!(outcome.rows_inserted(), 0);
    assert_eq!(outcome.rows_written(), 2);
}

// ============================================================================
// Reprocessing Tests
// ============================================================================

#[tokio::test]
async fn test_reprocessing_overwrites_same_keys() {
    let table = Arc::new(MemoryTable::new("stocks-data"));
    let pipeline = IngestPipeline::new(source_with(&[(LYFT_KEY, LYFT_CSV)]).await, table.clone());

    let event = event_for(&[LYFT_KEY, LYFT_KEY]);
    let response = pipeline.handle_event(&event).await;
    assert_eq!(response.message, "Processed 2 files with 6 rows into memory");

    assert_eq!(table.len().await, 3);
    assert_eq!(table.write_count(), 6);
}

#[tokio::test]
async fn test_reprocessing_changed_content_replaces_values() {
    let table = Arc::new(MemoryTable::new("stocks-data"));
    let first = IngestPipeline::new(source_with(&[(LYFT_KEY, LYFT_CSV)]).await, table.clone());
    first.ingest_object(&ObjectRef::new(BUCKET, LYFT_KEY)).await;

    let changed = "date,open,close,high,low,volume\n2025-11-12,1,1,1,1,42\n";
    let second = IngestPipeline::new(source_with(&[(LYFT_KEY, changed)]).await, table.clone());
    second.ingest_object(&ObjectRef::new(BUCKET, LYFT_KEY)).await;

    let record = table
        .get("LYFT_2025-11-17_15-26-55", "2025-11-12_0")
        .await
        .unwrap();
    assert_eq!(record.volume, 42);
    // Rows beyond the new file's length are left as they were
    assert_eq!(table.len().await, 3);
}

// ============================================================================
// Summary Tests
// ============================================================================

#[test]
fn test_summary_record() {
    let mut summary = BatchSummary::new();
    summary.record(MessageOutcome::Ingested {
        object: ObjectRef::new("b", "k"),
        rows: 5,
    });
    summary.record(MessageOutcome::WriteFailed {
        object: ObjectRef::new("b", "k2"),
        rows_written: 2,
        error: Error::write("t", "m"),
    });
    summary.record(MessageOutcome::EnvelopeError {
        error: Error::envelope("bad"),
    });

    assert_eq!(summary.files_processed, 1);
    assert_eq!(summary.rows_inserted, 5);
    assert_eq!(summary.failed(), 2);
}

#[test]
fn test_response_serialization() {
    let response = InvocationResponse::no_records();
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json, json!({ "statusCode": 400, "message": "No SQS Records" }));
}
