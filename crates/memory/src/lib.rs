//! Conversation memory for deskwren.
//!
//! An append-only, chronological log of completed exchanges. The log only
//! grows within a session — there is no eviction, so memory use grows
//! with conversation length; the whole log is exportable as JSON at any
//! point. The prompt's "recent window" is a borrowed suffix view, not a
//! separate store.

use std::collections::HashMap;
use std::path::Path;

use deskwren_core::error::MemoryError;
use deskwren_core::Exchange;
use tracing::debug;

/// Ordered log of exchanges; insertion order is chronological order.
#[derive(Debug, Default)]
pub struct ConversationMemory {
    exchanges: Vec<Exchange>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed exchange. Only called after a successful
    /// generation, so every stored exchange has a real response.
    pub fn append(&mut self, exchange: Exchange) {
        self.exchanges.push(exchange);
    }

    /// The last `n` exchanges in chronological order, or fewer if the
    /// log is shorter.
    pub fn recent_window(&self, n: usize) -> &[Exchange] {
        let start = self.exchanges.len().saturating_sub(n);
        &self.exchanges[start..]
    }

    /// The full ordered log.
    pub fn all(&self) -> &[Exchange] {
        &self.exchanges
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    /// How many exchanges used each topic, across the whole log.
    pub fn usage_counts(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for exchange in &self.exchanges {
            for topic in &exchange.context_used {
                *counts.entry(topic.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Serialize the full log to `path` as pretty-printed JSON, written
    /// wholesale (not appended).
    pub fn export_to(&self, path: &Path) -> Result<(), MemoryError> {
        let json = serde_json::to_string_pretty(&self.exchanges)?;
        std::fs::write(path, json).map_err(|e| MemoryError::ExportFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), exchanges = self.exchanges.len(), "Conversation log exported");
        Ok(())
    }
}
