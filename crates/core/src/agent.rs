//! Agent state types — the per-turn phase machine and session statistics.

use serde::{Deserialize, Serialize};

/// The phase of the current turn.
///
/// Every turn walks `Idle → Retrieving → Composing → Generating →
/// Recording → Idle`; the controller is back in `Idle` before the next
/// query is accepted, whether the turn succeeded or failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    /// Waiting for the next query.
    #[default]
    Idle,
    /// Ranking knowledge documents against the query.
    Retrieving,
    /// Assembling the prompt.
    Composing,
    /// Waiting on the generation capability.
    Generating,
    /// Appending the exchange to memory.
    Recording,
}

impl TurnPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnPhase::Idle => "idle",
            TurnPhase::Retrieving => "retrieving",
            TurnPhase::Composing => "composing",
            TurnPhase::Generating => "generating",
            TurnPhase::Recording => "recording",
        }
    }
}

/// Session statistics, as reported by the `stats` command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentStats {
    /// Completed exchanges this session.
    pub total_exchanges: usize,

    /// Documents currently loaded in the knowledge store.
    pub knowledge_topics: usize,

    /// Most-used knowledge topics, (topic, use count), sorted by count
    /// descending then topic ascending.
    pub top_topics: Vec<(String, usize)>,
}
