//! The (source, target) pair a session teaches across.

use bridgetutor_core::TutorError;
use serde::{Deserialize, Serialize};

/// The field the learner knows and the field they want to learn.
///
/// Both names are trimmed and must be non-empty; nothing else is checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainPair {
    source: String,
    target: String,
}

impl DomainPair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Result<Self, TutorError> {
        let source = source.into().trim().to_string();
        let target = target.into().trim().to_string();

        if source.is_empty() {
            return Err(TutorError::InvalidInput("source domain must not be empty".into()));
        }
        if target.is_empty() {
            return Err(TutorError::InvalidInput("target domain must not be empty".into()));
        }

        Ok(Self { source, target })
    }

    /// The domain the learner is proficient in.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The domain the learner is exploring.
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl std::fmt::Display for DomainPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.source, self.target)
    }
}
