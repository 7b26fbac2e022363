//! One learner's tutoring session.

use std::sync::Arc;

use bridgetutor_config::{AdapterStyle, AppConfig};
use bridgetutor_core::provider::Provider;
use bridgetutor_core::TutorError;

use crate::assessment::{AssessmentEngine, AssessmentState, Evaluation};
use crate::domain::DomainPair;
use crate::explanation::ExplanationPipeline;
use crate::generation::GenerationSettings;
use crate::history::ConversationHistory;
use crate::quiz::{AnswerSet, Difficulty, Quiz};

/// The full tutor state for one learner: domain pair, conversation history,
/// current difficulty and quiz history.
///
/// Every mutating operation takes `&mut self`, so a session cannot be
/// driven by two callers at once. Serve each learner their own session.
pub struct TutorSession {
    domains: DomainPair,
    explanation: ExplanationPipeline,
    assessment: AssessmentEngine,
}

impl TutorSession {
    pub fn new(provider: Arc<dyn Provider>, settings: GenerationSettings, domains: DomainPair) -> Self {
        Self {
            explanation: ExplanationPipeline::new(provider.clone(), settings.clone(), domains.clone()),
            assessment: AssessmentEngine::new(provider, settings, domains.clone()),
            domains,
        }
    }

    /// Build a session with the model, token limit and adapter style from `config`.
    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig, domains: DomainPair) -> Self {
        let settings = GenerationSettings {
            model: config.default_model.clone(),
            max_tokens: config.max_tokens,
        };
        Self::new(provider, settings, domains).with_adapter_style(config.tutor.adapter_style)
    }

    pub fn with_adapter_style(mut self, style: AdapterStyle) -> Self {
        self.explanation = self.explanation.with_style(style);
        self
    }

    pub fn domains(&self) -> &DomainPair {
        &self.domains
    }

    pub fn history(&self) -> &ConversationHistory {
        self.explanation.history()
    }

    pub fn current_difficulty(&self) -> Difficulty {
        self.assessment.difficulty()
    }

    pub fn test_history(&self) -> &[Quiz] {
        self.assessment.test_history()
    }

    pub fn assessment_state(&self) -> &AssessmentState {
        self.assessment.state()
    }

    pub fn active_quiz(&self) -> Option<&Quiz> {
        self.assessment.active_quiz()
    }

    /// See [`ExplanationPipeline::get_explanation`].
    pub async fn get_explanation(&mut self, query: &str) -> Result<String, TutorError> {
        self.explanation.get_explanation(query).await
    }

    /// See [`AssessmentEngine::generate`].
    pub async fn generate_quiz(&mut self) -> Result<Quiz, TutorError> {
        self.assessment.generate().await
    }

    /// See [`AssessmentEngine::evaluate`].
    pub fn evaluate(&mut self, quiz: &Quiz, answers: &AnswerSet) -> Result<Evaluation, TutorError> {
        self.assessment.evaluate(quiz, answers)
    }

    /// See [`AssessmentEngine::evaluate_active`].
    pub fn evaluate_active(&mut self, answers: &AnswerSet) -> Result<Evaluation, TutorError> {
        self.assessment.evaluate_active(answers)
    }

    /// Discard the active quiz so a new one can be generated.
    pub fn reset_quiz(&mut self) {
        self.assessment.reset_quiz();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{quiz_json, ScriptedProvider};

    #[tokio::test]
    async fn explanation_and_quiz_share_one_session() {
        let provider = Arc::new(ScriptedProvider::texts(&[
            "raw",
            "adapted",
            &quiz_json(1, ["A", "B", "C", "D", "A"]),
        ]));
        let mut session = TutorSession::new(
            provider.clone(),
            GenerationSettings::new("gpt-4"),
            DomainPair::new("Physics", "Biology").unwrap(),
        );

        session.get_explanation("What is ATP?").await.unwrap();
        assert_eq!(session.history().len(), 2);

        let quiz = session.generate_quiz().await.unwrap();
        let eval = session.evaluate(&quiz, &quiz.answer_key()).unwrap();
        assert_eq!(eval.score, 100.0);
        assert_eq!(session.current_difficulty().level(), 2);
        assert_eq!(session.test_history().len(), 1);

        // Quiz generation does not touch the conversation.
        assert_eq!(session.history().len(), 2);
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn sessions_are_independent() {
        let provider = Arc::new(ScriptedProvider::texts(&[&quiz_json(1, ["A"; 5])]));
        let domains = DomainPair::new("Law", "Finance").unwrap();
        let mut alice = TutorSession::new(provider.clone(), GenerationSettings::new("gpt-4"), domains.clone());
        let bob = TutorSession::new(provider, GenerationSettings::new("gpt-4"), domains);

        let quiz = alice.generate_quiz().await.unwrap();
        alice.evaluate_active(&quiz.answer_key()).unwrap();

        assert_eq!(alice.current_difficulty().level(), 2);
        assert_eq!(bob.current_difficulty().level(), 1);
        assert!(bob.test_history().is_empty());
        assert!(bob.active_quiz().is_none());
    }

    #[tokio::test]
    async fn from_config_applies_model_and_style() {
        let mut config = AppConfig::default();
        config.default_model = "gpt-4o".into();
        config.max_tokens = Some(800);
        config.tutor.adapter_style = AdapterStyle::ProgrammingLanguage;

        let provider = Arc::new(ScriptedProvider::texts(&["raw", "adapted"]));
        let mut session = TutorSession::from_config(
            provider.clone(),
            &config,
            DomainPair::new("Go", "Rust").unwrap(),
        );
        session.get_explanation("What are lifetimes?").await.unwrap();

        let requests = provider.requests();
        assert!(requests.iter().all(|r| r.model == "gpt-4o" && r.max_tokens == Some(800)));
        assert!(requests[1].messages[0].content.contains("Go developers"));
    }

    #[test]
    fn reset_returns_to_no_active_quiz() {
        let provider = Arc::new(ScriptedProvider::texts(&[]));
        let mut session = TutorSession::new(
            provider,
            GenerationSettings::new("gpt-4"),
            DomainPair::new("Art", "Math").unwrap(),
        );
        session.reset_quiz();
        assert!(matches!(session.assessment_state(), AssessmentState::NoActiveQuiz));
    }
}
