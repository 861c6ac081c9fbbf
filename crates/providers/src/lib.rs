//! Generation provider implementations for deskwren.
//!
//! All providers implement the `deskwren_core::Provider` trait. The
//! agent owns exactly one provider handle for its whole lifetime.

pub mod anthropic;

pub use anthropic::AnthropicProvider;
