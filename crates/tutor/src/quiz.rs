//! Quiz data model and its strict wire parsing.
//!
//! The quiz generator answers with JSON text. It is deserialized into private
//! wire structs and converted into [`Quiz`] through `TryFrom`, which is where
//! every structural rule is enforced. Nothing is repaired: a response that
//! breaks a rule is rejected as a whole.

use std::collections::BTreeMap;

use bridgetutor_core::TutorError;
use serde::{Deserialize, Serialize};

/// Number of questions in every quiz.
pub const QUIZ_SIZE: usize = 5;

// ── Difficulty ────────────────────────────────────────────────────────────

/// Quiz difficulty, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: Difficulty = Difficulty(1);
    pub const MAX: Difficulty = Difficulty(5);

    /// `None` when `level` is outside `1..=5`.
    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0)
            .contains(&level)
            .then_some(Self(level))
    }

    pub fn level(self) -> u8 {
        self.0
    }

    /// One level harder, saturating at [`Difficulty::MAX`].
    pub fn step_up(self) -> Self {
        if self < Self::MAX { Self(self.0 + 1) } else { self }
    }

    pub fn is_max(self) -> bool {
        self == Self::MAX
    }

    /// What questions at this level concentrate on.
    pub fn focus(self) -> &'static str {
        match self.0 {
            1 => "basic concepts and terminology",
            2 => "fundamental principles and simple applications",
            3 => "intermediate concepts and practical scenarios",
            4 => "advanced topics and complex applications",
            _ => "expert-level concepts and nuanced understanding",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::MIN
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level).ok_or_else(|| format!("difficulty level {level} is outside 1..=5"))
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> u8 {
        d.0
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Choices ───────────────────────────────────────────────────────────────

/// One of the four answer keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChoiceKey {
    A,
    B,
    C,
    D,
}

impl ChoiceKey {
    /// Display order.
    pub const ALL: [ChoiceKey; 4] = [ChoiceKey::A, ChoiceKey::B, ChoiceKey::C, ChoiceKey::D];

    pub fn as_str(self) -> &'static str {
        match self {
            ChoiceKey::A => "A",
            ChoiceKey::B => "B",
            ChoiceKey::C => "C",
            ChoiceKey::D => "D",
        }
    }
}

impl std::str::FromStr for ChoiceKey {
    type Err = String;

    /// Case-sensitive: `"a"` is not a key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(ChoiceKey::A),
            "B" => Ok(ChoiceKey::B),
            "C" => Ok(ChoiceKey::C),
            "D" => Ok(ChoiceKey::D),
            other => Err(format!("'{other}' is not one of A, B, C, D")),
        }
    }
}

impl std::fmt::Display for ChoiceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exactly four options keyed `A`..`D`. Any other key is a parse error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuestionOptions {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
    #[serde(rename = "D")]
    pub d: String,
}

impl QuestionOptions {
    pub fn get(&self, key: ChoiceKey) -> &str {
        match key {
            ChoiceKey::A => &self.a,
            ChoiceKey::B => &self.b,
            ChoiceKey::C => &self.c,
            ChoiceKey::D => &self.d,
        }
    }

    /// Options in display order.
    pub fn iter(&self) -> impl Iterator<Item = (ChoiceKey, &str)> {
        ChoiceKey::ALL.into_iter().map(move |key| (key, self.get(key)))
    }
}

// ── Question / Quiz ───────────────────────────────────────────────────────

/// A validated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireQuestion")]
pub struct Question {
    #[serde(rename = "question")]
    text: String,
    options: QuestionOptions,
    correct_answer: ChoiceKey,
    explanation: String,
    #[serde(rename = "source_field_connection")]
    source_domain_connection: String,
}

impl Question {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &QuestionOptions {
        &self.options
    }

    pub fn correct_answer(&self) -> ChoiceKey {
        self.correct_answer
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn source_domain_connection(&self) -> &str {
        &self.source_domain_connection
    }
}

/// A validated quiz of exactly [`QUIZ_SIZE`] questions.
///
/// Immutable once built. Serializes back to the same JSON shape it was
/// parsed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireQuiz")]
pub struct Quiz {
    difficulty_level: Difficulty,
    questions: Vec<Question>,
    total_questions: usize,
}

impl Quiz {
    /// Parse the quiz generator's response text.
    ///
    /// Surrounding whitespace is ignored; anything else that is not the
    /// expected JSON object fails with `MalformedResponse`.
    pub fn parse(text: &str) -> Result<Self, TutorError> {
        serde_json::from_str(text.trim()).map_err(|e| TutorError::MalformedResponse(e.to_string()))
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty_level
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    /// The answer set that gets every question right.
    pub fn answer_key(&self) -> AnswerSet {
        let mut answers = AnswerSet::new();
        for (i, q) in self.questions.iter().enumerate() {
            answers.answer(i, q.correct_answer.as_str());
        }
        answers
    }
}

// ── Wire format ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct WireQuestion {
    question: String,
    options: QuestionOptions,
    correct_answer: String,
    explanation: String,
    source_field_connection: String,
}

#[derive(Deserialize)]
struct WireQuiz {
    questions: Vec<WireQuestion>,
    difficulty_level: i64,
    total_questions: i64,
}

impl TryFrom<WireQuestion> for Question {
    type Error = String;

    fn try_from(wire: WireQuestion) -> Result<Self, Self::Error> {
        if wire.question.trim().is_empty() {
            return Err("question text is empty".into());
        }
        if let Some((key, _)) = wire.options.iter().find(|(_, text)| text.trim().is_empty()) {
            return Err(format!("option {key} is empty"));
        }
        let correct_answer = wire
            .correct_answer
            .parse::<ChoiceKey>()
            .map_err(|e| format!("correct_answer {e}"))?;

        Ok(Self {
            text: wire.question,
            options: wire.options,
            correct_answer,
            explanation: wire.explanation,
            source_domain_connection: wire.source_field_connection,
        })
    }
}

impl TryFrom<WireQuiz> for Quiz {
    type Error = String;

    fn try_from(wire: WireQuiz) -> Result<Self, Self::Error> {
        let difficulty_level = u8::try_from(wire.difficulty_level)
            .ok()
            .and_then(Difficulty::new)
            .ok_or_else(|| format!("difficulty_level {} is outside 1..=5", wire.difficulty_level))?;

        if wire.questions.len() != QUIZ_SIZE {
            return Err(format!(
                "expected {QUIZ_SIZE} questions, got {}",
                wire.questions.len()
            ));
        }

        if wire.total_questions != QUIZ_SIZE as i64 {
            return Err(format!(
                "total_questions is {}, expected {QUIZ_SIZE}",
                wire.total_questions
            ));
        }

        let questions = wire
            .questions
            .into_iter()
            .enumerate()
            .map(|(i, q)| Question::try_from(q).map_err(|e| format!("question {}: {e}", i + 1)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            difficulty_level,
            questions,
            total_questions: QUIZ_SIZE,
        })
    }
}

// ── Answers ───────────────────────────────────────────────────────────────

/// The learner's choices, keyed by the question's 0-based index as a string.
///
/// Values are kept verbatim so that evaluation can compare them exactly
/// against the correct key (`"a"` does not match `"A"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<String, String>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or replace) the choice for question `index`.
    pub fn answer(&mut self, index: usize, choice: impl Into<String>) -> &mut Self {
        self.0.insert(index.to_string(), choice.into());
        self
    }

    /// The choice recorded for question `index`, if any.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(&index.to_string()).map(String::as_str)
    }

    /// Number of questions with a non-blank choice among `0..total`.
    pub fn answered_within(&self, total: usize) -> usize {
        (0..total)
            .filter(|&i| self.get(i).is_some_and(|c| !c.trim().is_empty()))
            .count()
    }

    /// Keys that do not name a question in `0..total`.
    pub fn stray_keys(&self, total: usize) -> Vec<&str> {
        self.0
            .keys()
            .filter(|k| k.parse::<usize>().map_or(true, |i| i >= total || k.as_str() != i.to_string()))
            .map(String::as_str)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, String>> for AnswerSet {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}
