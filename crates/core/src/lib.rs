//! # deskwren Core
//!
//! Domain types, traits, and error definitions for the deskwren support
//! agent. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The generation capability is defined as a trait here; the concrete
//! Anthropic implementation lives in `deskwren-providers`. All crates
//! depend inward on core, which keeps the dependency graph clean and lets
//! the agent be tested against scripted providers.

pub mod agent;
pub mod error;
pub mod exchange;
pub mod knowledge;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use agent::{AgentStats, TurnPhase};
pub use error::{Error, Result};
pub use exchange::Exchange;
pub use knowledge::{Document, RankedDocument};
pub use provider::{GenerationRequest, GenerationResponse, Provider, Usage};
