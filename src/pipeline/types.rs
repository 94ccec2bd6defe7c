//! Pipeline types
//!
//! Per-message outcomes, batch summaries and the invocation response.

use crate::envelope::ObjectRef;
use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Name of the queue service in client-error responses
pub const BATCH_SOURCE: &str = "SQS";

/// Result of processing one queue message
#[derive(Debug)]
pub enum MessageOutcome {
    /// Every row of the file was written
    Ingested {
        object: ObjectRef,
        rows: usize,
    },
    /// The message body could not be read as an object-write notification
    EnvelopeError { error: Error },
    /// The object key does not follow the naming convention
    KeyError { object: ObjectRef, error: Error },
    /// The object could not be retrieved or decoded
    FetchError { object: ObjectRef, error: Error },
    /// A row failed to coerce or write; earlier rows of the file stand
    WriteFailed {
        object: ObjectRef,
        rows_written: usize,
        error: Error,
    },
}

impl MessageOutcome {
    /// Whether the whole file was ingested
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ingested { .. })
    }

    /// The failure, if any
    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Ingested { .. } => None,
            Self::EnvelopeError { error }
            | Self::KeyError { error, .. }
            | Self::FetchError { error, .. }
            | Self::WriteFailed { error, .. } => Some(error),
        }
    }

    /// The object the message referred to, when it could be read
    pub fn object(&self) -> Option<&ObjectRef> {
        match self {
            Self::EnvelopeError { .. } => None,
            Self::Ingested { object, .. }
            | Self::KeyError { object, .. }
            | Self::FetchError { object, .. }
            | Self::WriteFailed { object, .. } => Some(object),
        }
    }

    /// Rows counted toward the summary (only for fully ingested files)
    pub fn rows_inserted(&self) -> usize {
        match self {
            Self::Ingested { rows, .. } => *rows,
            _ => 0,
        }
    }

    /// Rows accepted by the table, including those of a failed file
    pub fn rows_written(&self) -> usize {
        match self {
            Self::Ingested { rows, .. } => *rows,
            Self::WriteFailed { rows_written, .. } => *rows_written,
            _ => 0,
        }
    }
}

/// A file whose row sequence stopped partway
#[derive(Debug)]
pub struct PartialWrite {
    /// Rows accepted before the failure
    pub rows_written: usize,
    /// The row failure
    pub error: Error,
}

/// Totals for one batch
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Files whose rows were all written
    pub files_processed: usize,
    /// Rows written for those files
    pub rows_inserted: usize,
    /// Outcome of every message, in batch order
    pub outcomes: Vec<MessageOutcome>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl BatchSummary {
    /// Create an empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message outcome to the totals
    pub fn record(&mut self, outcome: MessageOutcome) {
        if outcome.is_success() {
            self.files_processed += 1;
            self.rows_inserted += outcome.rows_inserted();
        }
        self.outcomes.push(outcome);
    }

    /// Number of messages that failed
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_success()).count()
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

/// Response returned to the invoker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub message: String,
}

impl InvocationResponse {
    /// Client error: the event carried no batch of messages
    pub fn no_records() -> Self {
        Self {
            status_code: 400,
            message: format!("No {BATCH_SOURCE} Records"),
        }
    }

    /// Normal completion, even when some messages failed
    pub fn processed(summary: &BatchSummary, table_label: &str) -> Self {
        Self {
            status_code: 200,
            message: format!(
                "Processed {} files with {} rows into {table_label}",
                summary.files_processed, summary.rows_inserted
            ),
        }
    }

    /// Whether this is a success response
    pub fn is_ok(&self) -> bool {
        self.status_code == 200
    }
}
