//! # BridgeTutor Core
//!
//! Domain types, traits, and error definitions shared by every BridgeTutor
//! crate. This crate has **no framework dependencies**: it defines the
//! vocabulary (messages, the provider seam, the error taxonomy) that the
//! provider, tutor and CLI crates implement against.
//!
//! ## Design Philosophy
//!
//! The external text-generation service is a trait here. Implementations live
//! in `bridgetutor-providers`, which keeps the tutor logic testable against
//! scripted providers and keeps the dependency graph pointing inward.

pub mod error;
pub mod message;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use error::{ProviderError, TutorError};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
