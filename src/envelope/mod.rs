//! Queue notification envelopes
//!
//! An invocation receives a batch of queue messages. Each message body is a
//! JSON string describing one object-storage write:
//!
//! ```json
//! {"Records": [{"body": "{\"Records\":[{\"s3\":{\"bucket\":{\"name\":\"b\"},\"object\":{\"key\":\"k\"}}}]}"}]}
//! ```
//!
//! Only the first record of a message body is read.

mod types;

pub use types::{ObjectRef, ObjectWriteEvent, QueueBatch, QueueMessage, BATCH_FIELD};
