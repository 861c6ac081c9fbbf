//! Lexical relevance ranking.
//!
//! A document's score is the number of query tokens — lowercased, split
//! on whitespace, duplicates retained — that occur as substrings anywhere
//! in the document's lowercased content. Substring containment is
//! intentional looseness ("ship" matches "shipping") and must be
//! preserved; there is no stemming and no word-boundary matching.

use deskwren_core::knowledge::RankedDocument;

use crate::store::KnowledgeStore;

/// Score every document in `store` against `query` and return the top
/// `top_k`, ordered by descending score.
///
/// Zero-score documents are excluded entirely, so the result may be
/// shorter than `top_k` or empty — the caller treats an empty result as
/// "no relevant knowledge". Equal scores keep the store's lexical topic
/// order (the sort is stable).
pub fn rank(query: &str, store: &KnowledgeStore, top_k: usize) -> Vec<RankedDocument> {
    let query_lower = query.to_lowercase();
    let tokens: Vec<&str> = query_lower.split_whitespace().collect();

    let mut ranked: Vec<RankedDocument> = store
        .iter()
        .filter_map(|doc| {
            let content_lower = doc.content.to_lowercase();
            let relevance = tokens
                .iter()
                .filter(|token| content_lower.contains(**token))
                .count();
            (relevance > 0).then(|| RankedDocument {
                topic: doc.topic.clone(),
                content: doc.content.clone(),
                relevance,
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.relevance.cmp(&a.relevance));
    ranked.truncate(top_k);
    ranked
}
