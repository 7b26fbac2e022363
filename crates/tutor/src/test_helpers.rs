//! Shared test helpers: a scripted provider and quiz fixtures.

use bridgetutor_core::error::ProviderError;
use bridgetutor_core::message::Message;
use bridgetutor_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A mock provider that plays back a script of replies in order.
///
/// Every request is recorded so tests can inspect what was sent.
/// Panics if more calls are made than replies provided.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A provider that answers each call with the next text.
    pub fn texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let call = requests.len();
        requests.push(request);

        let reply = self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            panic!("ScriptedProvider: no more replies (call #{call})")
        })?;

        Ok(ProviderResponse {
            message: Message::assistant(reply),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: "mock-model".into(),
            metadata: serde_json::Map::new(),
        })
    }
}

/// A well-formed quiz in the generator's JSON shape.
pub fn quiz_value(difficulty: i64, correct: [&str; 5]) -> serde_json::Value {
    let questions: Vec<serde_json::Value> = correct
        .iter()
        .enumerate()
        .map(|(i, answer)| {
            let n = i + 1;
            serde_json::json!({
                "question": format!("Question {n}?"),
                "options": {
                    "A": format!("Option {n}A"),
                    "B": format!("Option {n}B"),
                    "C": format!("Option {n}C"),
                    "D": format!("Option {n}D"),
                },
                "correct_answer": answer,
                "explanation": format!("Explanation {n}"),
                "source_field_connection": format!("Connection {n}"),
            })
        })
        .collect();

    serde_json::json!({
        "questions": questions,
        "difficulty_level": difficulty,
        "total_questions": 5,
    })
}

pub fn quiz_json(difficulty: i64, correct: [&str; 5]) -> String {
    quiz_value(difficulty, correct).to_string()
}
