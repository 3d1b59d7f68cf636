//! Anthropic Messages API as a [`NarrativeApi`](crate::services::narrative_api::NarrativeApi).
//!
//! [`NarrativeConfig`] carries the credentials and model settings;
//! [`AnthropicClient`] sends the rendered record report and returns the
//! generated text.

pub mod client;
mod config;

pub use client::AnthropicClient;
pub use config::NarrativeConfig;
