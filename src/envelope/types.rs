//! Envelope types

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Top-level field holding the batch of queue messages
pub const BATCH_FIELD: &str = "Records";

/// A batch of queue messages from one invocation
///
/// Messages are kept as raw JSON so that one malformed message does not
/// prevent the rest of the batch from being read.
#[derive(Debug, Clone, Default)]
pub struct QueueBatch {
    messages: Vec<Value>,
}

impl QueueBatch {
    /// Read the batch out of an invocation event
    ///
    /// Returns `None` when the event has no `Records` array.
    pub fn from_event(event: &Value) -> Option<Self> {
        let messages = event.get(BATCH_FIELD)?.as_array()?.clone();
        Some(Self { messages })
    }

    /// Build a batch from message bodies (used by the CLI and tests)
    pub fn from_bodies<I, S>(bodies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let messages = bodies
            .into_iter()
            .map(|body| json!({ "body": body.into() }))
            .collect();
        Self { messages }
    }

    /// Raw messages in batch order
    pub fn messages(&self) -> &[Value] {
        &self.messages
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the batch has no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Convert back into an invocation event
    pub fn to_event(&self) -> Value {
        json!({ BATCH_FIELD: self.messages })
    }
}

/// One queue message
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueMessage {
    /// Queue message id (for logging)
    #[serde(default)]
    pub message_id: Option<String>,
    /// Message body: an object-write notification as a JSON string
    pub body: String,
}

impl QueueMessage {
    /// Parse a raw queue message
    pub fn parse(raw: &Value) -> Result<Self> {
        Self::deserialize(raw).map_err(|e| Error::envelope(format!("invalid queue message: {e}")))
    }

    /// Decode the body and return the referenced object
    pub fn object_ref(&self) -> Result<ObjectRef> {
        let event: ObjectWriteEvent = serde_json::from_str(&self.body)
            .map_err(|e| Error::envelope(format!("invalid message body: {e}")))?;
        event.first_object()
    }
}

/// Object-storage write notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectWriteEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<ObjectWriteRecord>,
}

/// One write record within a notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectWriteRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Entity {
    pub bucket: BucketEntity,
    pub object: ObjectEntity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketEntity {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectEntity {
    pub key: String,
}

impl ObjectWriteEvent {
    /// Create a single-record notification for an object
    pub fn for_object(obj: &ObjectRef) -> Self {
        Self {
            records: vec![ObjectWriteRecord {
                s3: S3Entity {
                    bucket: BucketEntity {
                        name: obj.bucket.clone(),
                    },
                    object: ObjectEntity {
                        key: obj.key.clone(),
                    },
                },
            }],
        }
    }

    /// The object named by the first record; later records are ignored
    pub fn first_object(&self) -> Result<ObjectRef> {
        let record = self
            .records
            .first()
            .ok_or_else(|| Error::envelope("notification has no records"))?;
        Ok(ObjectRef::new(
            &record.s3.bucket.name,
            &record.s3.object.key,
        ))
    }

    /// Serialize as a queue message body
    pub fn to_body(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Reference to one stored object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

impl ObjectRef {
    /// Create an object reference
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}
