//! The tutoring layer of BridgeTutor.
//!
//! A [`TutorSession`] owns everything one learner accumulates:
//!
//! 1. **Explain**: a question goes to a target-domain expert prompt, and the
//!    answer is rewritten in terms of the learner's source domain
//!    ([`ExplanationPipeline`]).
//! 2. **Assess**: a five-question multiple-choice quiz is generated at the
//!    current difficulty, scored, and the difficulty ratchets up by one level
//!    whenever the learner scores 80% or better ([`AssessmentEngine`]).
//!
//! Sessions are plain owned values. Two learners get two sessions; nothing is
//! shared except the stateless provider behind an `Arc`.

pub mod assessment;
pub mod domain;
pub mod explanation;
pub mod generation;
pub mod history;
pub mod prompts;
pub mod quiz;
pub mod session;

#[cfg(test)]
mod test_helpers;

pub use assessment::{AssessmentEngine, AssessmentState, Evaluation, QuestionReview};
pub use domain::DomainPair;
pub use explanation::ExplanationPipeline;
pub use generation::GenerationSettings;
pub use history::{ConversationHistory, CONTEXT_WINDOW_TURNS};
pub use quiz::{AnswerSet, ChoiceKey, Difficulty, Question, QuestionOptions, Quiz, QUIZ_SIZE};
pub use session::TutorSession;
pub use bridgetutor_config::AdapterStyle;
