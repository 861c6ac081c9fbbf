//! Exchange — the record of one completed support turn.
//!
//! An `Exchange` is created exactly once per successful turn and appended
//! to the conversation memory. It is immutable after creation: the log
//! never edits or removes entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed (query, response) pair with the knowledge topics that
/// informed the answer.
///
/// The serialized field names (`query`, `response`, `timestamp`,
/// `context_used`) are the export contract for conversation logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    /// What the customer asked.
    pub query: String,

    /// What the agent answered.
    pub response: String,

    /// When the exchange completed.
    pub timestamp: DateTime<Utc>,

    /// Topics of the knowledge documents used for this answer, in
    /// ranking order. Empty when the answer used general knowledge only.
    pub context_used: Vec<String>,
}

impl Exchange {
    /// Create an exchange stamped with the current time.
    pub fn new(
        query: impl Into<String>,
        response: impl Into<String>,
        context_used: Vec<String>,
    ) -> Self {
        Self {
            query: query.into(),
            response: response.into(),
            timestamp: Utc::now(),
            context_used,
        }
    }
}
