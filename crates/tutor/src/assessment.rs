//! The adaptive assessment engine.
//!
//! ```text
//!   NoActiveQuiz ──generate──▶ QuizActive ──evaluate──▶ Scored
//!        ▲                      │    ▲                   │
//!        │                      └gen─┘                   │
//!        └──────────────── reset_quiz ◀──────────────────┘   (generate also allowed)
//! ```
//!
//! Difficulty starts at 1 and only moves up: a score of at least
//! [`PROMOTION_THRESHOLD`] raises it by exactly one level, capped at 5.

use std::sync::Arc;

use bridgetutor_core::message::Message;
use bridgetutor_core::provider::Provider;
use bridgetutor_core::TutorError;
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::DomainPair;
use crate::generation::{complete_text, GenerationSettings};
use crate::prompts;
use crate::quiz::{AnswerSet, ChoiceKey, Difficulty, Quiz};

/// Minimum score (percent, inclusive) that raises the difficulty.
pub const PROMOTION_THRESHOLD: f64 = 80.0;

/// Whether `score` earns a harder next quiz.
pub fn should_increase(score: f64) -> bool {
    score >= PROMOTION_THRESHOLD
}

/// Where the engine is in its quiz cycle.
#[derive(Debug, Clone, Default)]
pub enum AssessmentState {
    #[default]
    NoActiveQuiz,
    /// A quiz is waiting for answers.
    QuizActive(Quiz),
    /// The quiz was scored; it stays available until the caller resets.
    Scored { quiz: Quiz, evaluation: Evaluation },
}

impl AssessmentState {
    pub fn name(&self) -> &'static str {
        match self {
            AssessmentState::NoActiveQuiz => "no_active_quiz",
            AssessmentState::QuizActive(_) => "quiz_active",
            AssessmentState::Scored { .. } => "scored",
        }
    }
}

/// Per-question outcome, for showing results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionReview {
    pub index: usize,
    pub chosen: String,
    pub correct_answer: ChoiceKey,
    pub is_correct: bool,
    pub explanation: String,
    pub source_domain_connection: String,
}

/// The result of scoring one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Percentage in `0.0..=100.0`, unrounded.
    pub score: f64,
    pub correct: usize,
    pub total: usize,
    pub should_increase: bool,
    pub difficulty_before: Difficulty,
    pub difficulty_after: Difficulty,
    pub reviews: Vec<QuestionReview>,
}

impl Evaluation {
    pub fn difficulty_changed(&self) -> bool {
        self.difficulty_before != self.difficulty_after
    }
}

/// Generates quizzes at the tracked difficulty and scores submissions.
pub struct AssessmentEngine {
    provider: Arc<dyn Provider>,
    settings: GenerationSettings,
    domains: DomainPair,
    difficulty: Difficulty,
    test_history: Vec<Quiz>,
    state: AssessmentState,
}

impl AssessmentEngine {
    pub fn new(provider: Arc<dyn Provider>, settings: GenerationSettings, domains: DomainPair) -> Self {
        Self {
            provider,
            settings,
            domains,
            difficulty: Difficulty::MIN,
            test_history: Vec::new(),
            state: AssessmentState::NoActiveQuiz,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn state(&self) -> &AssessmentState {
        &self.state
    }

    /// The quiz being answered or just scored.
    pub fn active_quiz(&self) -> Option<&Quiz> {
        match &self.state {
            AssessmentState::NoActiveQuiz => None,
            AssessmentState::QuizActive(quiz) | AssessmentState::Scored { quiz, .. } => Some(quiz),
        }
    }

    pub fn last_evaluation(&self) -> Option<&Evaluation> {
        match &self.state {
            AssessmentState::Scored { evaluation, .. } => Some(evaluation),
            _ => None,
        }
    }

    /// Every quiz generated so far, oldest first.
    pub fn test_history(&self) -> &[Quiz] {
        &self.test_history
    }

    /// Ask the provider for a new quiz at the current difficulty.
    ///
    /// Supersedes any active quiz. On failure nothing changes.
    pub async fn generate(&mut self) -> Result<Quiz, TutorError> {
        let messages = vec![
            Message::system(prompts::quiz_generator_prompt(
                self.domains.source(),
                self.domains.target(),
                self.difficulty,
            )),
            Message::user(prompts::QUIZ_REQUEST),
        ];

        let text = complete_text(&self.provider, &self.settings, "quiz", messages).await?;

        let quiz = Quiz::parse(&text).inspect_err(|e| warn!(error = %e, "Rejected quiz response"))?;

        // The tracked level drives scoring; the quiz's own label is advisory.
        if quiz.difficulty() != self.difficulty {
            warn!(
                requested = %self.difficulty,
                returned = %quiz.difficulty(),
                "Quiz labelled with a different difficulty"
            );
        }

        self.test_history.push(quiz.clone());
        self.transition(AssessmentState::QuizActive(quiz.clone()));
        Ok(quiz)
    }

    /// Score `answers` against `quiz` and adjust the difficulty.
    ///
    /// Every question needs a non-blank answer; otherwise this fails with
    /// `IncompleteSubmission` and nothing changes. Keys that do not name a
    /// question are `InvalidInput`.
    pub fn evaluate(&mut self, quiz: &Quiz, answers: &AnswerSet) -> Result<Evaluation, TutorError> {
        let total = quiz.questions().len();

        let answered = answers.answered_within(total);
        if answered < total {
            return Err(TutorError::IncompleteSubmission {
                answered,
                expected: total,
            });
        }

        let strays = answers.stray_keys(total);
        if !strays.is_empty() {
            return Err(TutorError::InvalidInput(format!(
                "answers for unknown questions: {}",
                strays.join(", ")
            )));
        }

        let reviews: Vec<QuestionReview> = quiz
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let chosen = answers.get(index).unwrap_or_default().to_string();
                QuestionReview {
                    index,
                    is_correct: chosen == question.correct_answer().as_str(),
                    chosen,
                    correct_answer: question.correct_answer(),
                    explanation: question.explanation().to_string(),
                    source_domain_connection: question.source_domain_connection().to_string(),
                }
            })
            .collect();

        let correct = reviews.iter().filter(|r| r.is_correct).count();
        let score = (correct as f64 * 100.0) / total as f64;
        let should_increase = should_increase(score);

        let difficulty_before = self.difficulty;
        if should_increase {
            self.difficulty = self.difficulty.step_up();
        }

        let evaluation = Evaluation {
            score,
            correct,
            total,
            should_increase,
            difficulty_before,
            difficulty_after: self.difficulty,
            reviews,
        };

        info!(
            score,
            correct,
            total,
            difficulty_before = %difficulty_before,
            difficulty_after = %self.difficulty,
            "Quiz evaluated"
        );

        self.transition(AssessmentState::Scored {
            quiz: quiz.clone(),
            evaluation: evaluation.clone(),
        });
        Ok(evaluation)
    }

    /// Score the quiz that is waiting for answers.
    ///
    /// A quiz that was already scored is closed for submission.
    pub fn evaluate_active(&mut self, answers: &AnswerSet) -> Result<Evaluation, TutorError> {
        let quiz = match &self.state {
            AssessmentState::QuizActive(quiz) => quiz.clone(),
            _ => return Err(TutorError::NoActiveQuiz),
        };
        self.evaluate(&quiz, answers)
    }

    /// Drop the active quiz, ready for a fresh one.
    pub fn reset_quiz(&mut self) {
        self.transition(AssessmentState::NoActiveQuiz);
    }

    fn transition(&mut self, next: AssessmentState) {
        info!(from = self.state.name(), to = next.name(), "Assessment state change");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{quiz_json, ScriptedProvider};
    use bridgetutor_core::error::ProviderError;
    use bridgetutor_core::message::Role;

    fn engine_with(provider: Arc<ScriptedProvider>) -> AssessmentEngine {
        AssessmentEngine::new(
            provider,
            GenerationSettings::new("gpt-4"),
            DomainPair::new("Physics", "Biology").unwrap(),
        )
    }

    fn engine_at(level: u8) -> AssessmentEngine {
        let mut engine = engine_with(Arc::new(ScriptedProvider::texts(&[])));
        engine.difficulty = Difficulty::new(level).unwrap();
        engine
    }

    fn sample_quiz() -> Quiz {
        Quiz::parse(&quiz_json(1, ["A", "B", "C", "D", "A"])).unwrap()
    }

    /// Answers with the first `n` questions right and the rest wrong.
    fn answers_with_correct(quiz: &Quiz, n: usize) -> AnswerSet {
        let mut answers = AnswerSet::new();
        for (i, q) in quiz.questions().iter().enumerate() {
            let key = q.correct_answer();
            let chosen = if i < n {
                key
            } else {
                ChoiceKey::ALL.into_iter().find(|k| *k != key).unwrap()
            };
            answers.answer(i, chosen.as_str());
        }
        answers
    }

    #[test]
    fn threshold_is_inclusive() {
        assert!(!should_increase(79.999));
        assert!(should_increase(80.0));
        assert!(should_increase(100.0));
        assert!(!should_increase(0.0));
    }

    #[test]
    fn starts_without_a_quiz_at_level_one() {
        let engine = engine_at(1);
        assert!(matches!(engine.state(), AssessmentState::NoActiveQuiz));
        assert_eq!(engine.difficulty(), Difficulty::MIN);
        assert!(engine.active_quiz().is_none());
        assert!(engine.test_history().is_empty());
    }

    #[test]
    fn four_of_five_at_level_one_promotes() {
        let mut engine = engine_at(1);
        let quiz = sample_quiz();
        let eval = engine.evaluate(&quiz, &answers_with_correct(&quiz, 4)).unwrap();

        assert_eq!(eval.score, 80.0);
        assert!(eval.should_increase);
        assert_eq!(engine.difficulty().level(), 2);
        assert!(eval.difficulty_changed());
    }

    #[test]
    fn perfect_score_at_level_five_stays_at_five() {
        let mut engine = engine_at(5);
        let quiz = sample_quiz();
        let eval = engine.evaluate(&quiz, &quiz.answer_key()).unwrap();

        assert_eq!(eval.score, 100.0);
        assert!(eval.should_increase);
        assert_eq!(engine.difficulty(), Difficulty::MAX);
        assert!(!eval.difficulty_changed());
    }

    #[test]
    fn low_scores_never_change_difficulty() {
        for n in 0..=3 {
            let mut engine = engine_at(3);
            let quiz = sample_quiz();
            let eval = engine.evaluate(&quiz, &answers_with_correct(&quiz, n)).unwrap();
            assert_eq!(eval.score, n as f64 * 20.0);
            assert!(!eval.should_increase);
            assert_eq!(engine.difficulty().level(), 3);
        }
    }

    #[test]
    fn difficulty_rises_at_most_one_per_evaluation() {
        let mut engine = engine_at(1);
        let quiz = sample_quiz();
        let mut previous = engine.difficulty().level();
        for _ in 0..10 {
            engine.evaluate(&quiz, &quiz.answer_key()).unwrap();
            let now = engine.difficulty().level();
            assert!(now <= 5);
            assert!(now - previous <= 1);
            previous = now;
        }
        assert_eq!(previous, 5);
    }

    #[test]
    fn incomplete_submission_is_rejected_without_state_change() {
        let mut engine = engine_at(2);
        let quiz = sample_quiz();
        let mut answers = AnswerSet::new();
        answers.answer(0, "A").answer(1, "B").answer(2, "C");

        let err = engine.evaluate(&quiz, &answers).unwrap_err();
        assert!(matches!(
            err,
            TutorError::IncompleteSubmission {
                answered: 3,
                expected: 5
            }
        ));
        assert_eq!(engine.difficulty().level(), 2);
        assert!(matches!(engine.state(), AssessmentState::NoActiveQuiz));
    }

    #[test]
    fn blank_answers_count_as_unanswered() {
        let mut engine = engine_at(1);
        let quiz = sample_quiz();
        let mut answers = quiz.answer_key();
        answers.answer(4, "");
        assert!(matches!(
            engine.evaluate(&quiz, &answers),
            Err(TutorError::IncompleteSubmission { answered: 4, .. })
        ));
    }

    #[test]
    fn stray_answer_keys_are_invalid_input() {
        let mut engine = engine_at(1);
        let quiz = sample_quiz();
        let mut answers = quiz.answer_key();
        answers.answer(5, "A");
        assert!(matches!(
            engine.evaluate(&quiz, &answers),
            Err(TutorError::InvalidInput(_))
        ));
        assert_eq!(engine.difficulty().level(), 1);
    }

    #[test]
    fn answer_comparison_is_case_sensitive() {
        let mut engine = engine_at(1);
        let quiz = sample_quiz();
        let mut answers = quiz.answer_key();
        answers.answer(0, "a");
        let eval = engine.evaluate(&quiz, &answers).unwrap();
        assert_eq!(eval.correct, 4);
        assert!(!eval.reviews[0].is_correct);
        assert_eq!(eval.reviews[0].chosen, "a");
        assert_eq!(eval.reviews[0].correct_answer, ChoiceKey::A);
        assert_eq!(eval.reviews[0].explanation, "Explanation 1");
    }

    #[tokio::test]
    async fn generate_activates_and_records_quiz() {
        let provider = Arc::new(ScriptedProvider::texts(&[&quiz_json(1, ["A", "B", "C", "D", "A"])]));
        let mut engine = engine_with(provider.clone());

        let quiz = engine.generate().await.unwrap();
        assert_eq!(quiz.questions().len(), 5);
        assert_eq!(engine.test_history().len(), 1);
        assert!(matches!(engine.state(), AssessmentState::QuizActive(_)));
        assert_eq!(engine.active_quiz(), Some(&quiz));

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.model, "gpt-4");
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].role, Role::System);
        assert!(req.messages[0].content.contains("learning Biology"));
        assert!(req.messages[0].content.contains("difficulty level 1"));
        assert_eq!(req.messages[1].content, prompts::QUIZ_REQUEST);
    }

    #[tokio::test]
    async fn malformed_quiz_leaves_state_untouched() {
        let provider = Arc::new(ScriptedProvider::texts(&["Here are five questions: ..."]));
        let mut engine = engine_with(provider);

        let err = engine.generate().await.unwrap_err();
        assert!(matches!(err, TutorError::MalformedResponse(_)));
        assert!(engine.test_history().is_empty());
        assert!(matches!(engine.state(), AssessmentState::NoActiveQuiz));
    }

    #[tokio::test]
    async fn mislabelled_difficulty_is_accepted_and_tracking_continues() {
        let provider = Arc::new(ScriptedProvider::texts(&[
            &quiz_json(1, ["A"; 5]),
            &quiz_json(1, ["B"; 5]),
        ]));
        let mut engine = engine_with(provider);

        let first = engine.generate().await.unwrap();
        engine.evaluate_active(&first.answer_key()).unwrap();
        assert_eq!(engine.difficulty().level(), 2);

        // Asked for level 2, labelled level 1.
        let second = engine.generate().await.unwrap();
        assert_eq!(second.difficulty().level(), 1);
        assert!(matches!(engine.state(), AssessmentState::QuizActive(_)));
        assert_eq!(engine.test_history().len(), 2);

        let eval = engine.evaluate_active(&second.answer_key()).unwrap();
        assert_eq!(eval.difficulty_before.level(), 2);
        assert_eq!(eval.difficulty_after.level(), 3);
    }

    #[tokio::test]
    async fn provider_failure_is_external_service_error() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(ProviderError::RateLimited {
            retry_after_secs: 5,
        })]));
        let mut engine = engine_with(provider.clone());

        let err = engine.generate().await.unwrap_err();
        assert!(matches!(
            err,
            TutorError::ExternalService(ProviderError::RateLimited { .. })
        ));
        assert_eq!(provider.call_count(), 1);
        assert!(engine.test_history().is_empty());
    }

    #[tokio::test]
    async fn full_cycle_through_every_state() {
        let provider = Arc::new(ScriptedProvider::texts(&[
            &quiz_json(1, ["A", "B", "C", "D", "A"]),
            &quiz_json(2, ["D", "D", "D", "D", "D"]),
        ]));
        let mut engine = engine_with(provider.clone());

        // Nothing to evaluate yet.
        assert!(matches!(
            engine.evaluate_active(&AnswerSet::new()),
            Err(TutorError::NoActiveQuiz)
        ));

        let quiz = engine.generate().await.unwrap();
        let eval = engine.evaluate_active(&quiz.answer_key()).unwrap();
        assert_eq!(eval.score, 100.0);
        assert!(matches!(engine.state(), AssessmentState::Scored { .. }));
        assert_eq!(engine.active_quiz(), Some(&quiz));
        assert_eq!(engine.last_evaluation(), Some(&eval));

        // A scored quiz cannot be submitted again.
        assert!(matches!(
            engine.evaluate_active(&quiz.answer_key()),
            Err(TutorError::NoActiveQuiz)
        ));
        assert_eq!(engine.difficulty().level(), 2);

        engine.reset_quiz();
        assert!(engine.active_quiz().is_none());

        let next = engine.generate().await.unwrap();
        assert_eq!(next.difficulty().level(), 2);
        assert_eq!(engine.test_history().len(), 2);
        assert!(provider.requests()[1].messages[0].content.contains("difficulty level 2"));
    }

    #[tokio::test]
    async fn generate_supersedes_an_unanswered_quiz() {
        let provider = Arc::new(ScriptedProvider::texts(&[
            &quiz_json(1, ["A"; 5]),
            &quiz_json(1, ["B"; 5]),
        ]));
        let mut engine = engine_with(provider);

        let first = engine.generate().await.unwrap();
        let second = engine.generate().await.unwrap();
        assert_ne!(first, second);
        assert_eq!(engine.active_quiz(), Some(&second));
        assert_eq!(engine.test_history(), [first, second]);
    }
}
