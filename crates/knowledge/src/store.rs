//! Directory-backed knowledge store.
//!
//! One `.txt` file per topic: the file stem is the topic key, the full
//! text is the document content. The store is read-only between reloads;
//! a reload replaces the whole mapping, never merges.
//!
//! Access failures degrade to an empty (or partial) store with a warning
//! rather than failing the agent — it stays useful through general,
//! non-retrieved answers.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use deskwren_core::knowledge::Document;
use tracing::{debug, warn};

/// In-memory mapping of topic → document, rebuilt from a directory.
///
/// Backed by a `BTreeMap`, so iteration order is lexical by topic. That
/// makes document enumeration deterministic and gives the ranker a stable
/// tie-break order.
pub struct KnowledgeStore {
    dir: PathBuf,
    documents: BTreeMap<String, Document>,
}

impl KnowledgeStore {
    /// Load all `.txt` documents from `dir`.
    ///
    /// Creates the directory if it does not exist and returns an empty
    /// store. An unreadable directory also yields an empty store; an
    /// unreadable file is skipped. Both paths log a warning.
    pub fn load(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let documents = read_documents(&dir);
        debug!(dir = %dir.display(), topics = documents.len(), "Knowledge store loaded");
        Self { dir, documents }
    }

    /// Re-read the backing directory, replacing the store's contents
    /// wholesale. Safe between turns only; never called mid-turn.
    pub fn reload(&mut self) {
        self.documents = read_documents(&self.dir);
        debug!(dir = %self.dir.display(), topics = self.documents.len(), "Knowledge store reloaded");
    }

    /// The directory this store reads from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn get(&self, topic: &str) -> Option<&Document> {
        self.documents.get(topic)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Topics in lexical order.
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    /// Documents in lexical topic order.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }
}

/// Enumerate `dir` and build the topic mapping.
///
/// Paths are sorted before insertion, so if two entries ever map to the
/// same stem, the lexically-last one wins — deterministically.
fn read_documents(dir: &Path) -> BTreeMap<String, Document> {
    if !dir.exists() {
        if let Err(e) = std::fs::create_dir_all(dir) {
            warn!(dir = %dir.display(), error = %e, "Cannot create knowledge directory, starting empty");
            return BTreeMap::new();
        }
        debug!(dir = %dir.display(), "Created knowledge directory");
        return BTreeMap::new();
    }

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Cannot read knowledge directory, starting empty");
            return BTreeMap::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    paths.sort();

    let mut documents = BTreeMap::new();
    for path in paths {
        let Some(topic) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                documents.insert(topic.to_string(), Document::new(topic, content));
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Skipping unreadable knowledge file");
            }
        }
    }

    documents
}
