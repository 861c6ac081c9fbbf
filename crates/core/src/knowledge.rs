//! Knowledge value types — documents and ranked retrieval results.

use serde::{Deserialize, Serialize};

/// A single knowledge document: one text file loaded from the knowledge
/// directory. Identity is the topic (the file stem); content is opaque
/// text. Documents are replaced wholesale on reload, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Unique key, derived from the source file's base name.
    pub topic: String,

    /// Full text of the document.
    pub content: String,
}

impl Document {
    pub fn new(topic: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            content: content.into(),
        }
    }
}

/// A document paired with its relevance score for one query.
///
/// Computed fresh per query and never cached — the knowledge store may be
/// reloaded between turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedDocument {
    pub topic: String,
    pub content: String,

    /// Count of query tokens (with repetition) found as substrings of the
    /// document's lowercased content. Always at least 1 in ranker output;
    /// zero-score documents are excluded entirely.
    pub relevance: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_identity_is_topic() {
        let doc = Document::new("shipping", "Free shipping on orders over $50.");
        assert_eq!(doc.topic, "shipping");
        assert!(doc.content.contains("$50"));
    }

    #[test]
    fn ranked_document_serialization() {
        let ranked = RankedDocument {
            topic: "returns".into(),
            content: "30-day return policy.".into(),
            relevance: 2,
        };
        let json = serde_json::to_string(&ranked).unwrap();
        assert!(json.contains("\"relevance\":2"));
    }
}
