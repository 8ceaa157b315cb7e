//! Event — an immutable record of a committed form submission.

use serde::{Deserialize, Serialize};

use crate::batch::ValidatedBatch;
use crate::time::{Timestamp, now};

/// Emitted after every field of a validated batch has been stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamsCommitted {
    pub schema: String,
    pub namespace: String,
    /// Storage keys written, in schema order.
    pub keys: Vec<String>,
    pub timestamp: Timestamp,
}

impl ParamsCommitted {
    /// Describe the commit of `batch`, stamped with the current time.
    #[must_use]
    pub fn from_batch(batch: &ValidatedBatch) -> Self {
        Self {
            schema: batch.schema().to_string(),
            namespace: batch.namespace().to_string(),
            keys: batch
                .fields()
                .iter()
                .map(|field| field.key().to_string())
                .collect(),
            timestamp: now(),
        }
    }
}
