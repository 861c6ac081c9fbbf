//! Knowledge subsystem for deskwren.
//!
//! [`store::KnowledgeStore`] loads topic documents from a directory of
//! plain-text files; [`ranker::rank`] scores them against a query by
//! lexical term overlap. No embeddings, no semantic similarity — retrieval
//! is deliberately a substring-containment count, which keeps the whole
//! pipeline deterministic and testable.

pub mod ranker;
pub mod store;

pub use ranker::rank;
pub use store::KnowledgeStore;
