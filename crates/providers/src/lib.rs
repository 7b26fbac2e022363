//! LLM Provider implementations for BridgeTutor.
//!
//! All providers implement the `bridgetutor_core::Provider` trait.
//! [`router::from_config`] builds the one named in the configuration.

pub mod openai_compat;
pub mod router;

pub use openai_compat::OpenAiCompatProvider;
