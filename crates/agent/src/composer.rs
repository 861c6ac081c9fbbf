//! Prompt composition.
//!
//! `compose` assembles the single generation request string from the
//! retrieved documents, the recent exchange window, and the new query.
//! It is pure: identical inputs always produce identical output, which is
//! what makes the rest of the turn testable — the generation call is the
//! only non-deterministic step in the system.

use deskwren_core::knowledge::RankedDocument;
use deskwren_core::Exchange;

/// Marker used when retrieval found nothing relevant.
const NO_KNOWLEDGE_MARKER: &str = "No specific information found. Use general knowledge.";

/// Marker used when there is no prior conversation.
const CONVERSATION_START_MARKER: &str = "This is the start of the conversation.";

/// Assemble the prompt: knowledge section, recent-conversation section,
/// then the customer question with the fixed answering instruction.
pub fn compose(query: &str, documents: &[RankedDocument], recent: &[Exchange]) -> String {
    let knowledge = if documents.is_empty() {
        NO_KNOWLEDGE_MARKER.to_string()
    } else {
        documents
            .iter()
            .map(|doc| format!("Topic: {}\n{}", doc.topic, doc.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    let history = if recent.is_empty() {
        CONVERSATION_START_MARKER.to_string()
    } else {
        recent
            .iter()
            .map(|ex| format!("Customer: {}\nAgent: {}", ex.query, ex.response))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "You are a helpful customer support agent.\n\
         \n\
         KNOWLEDGE BASE (use this to answer):\n\
         {knowledge}\n\
         \n\
         RECENT CONVERSATION:\n\
         {history}\n\
         \n\
         CUSTOMER QUESTION: {query}\n\
         \n\
         Provide a helpful, accurate response (2-3 sentences).\n\
         Use the knowledge base information when available.\n\
         If you don't have enough information, say so and offer to escalate."
    )
}
