//! The two-pass explanation pipeline.
//!
//! 1. **generate**: the target-domain expert answers the question.
//! 2. **adapt**: the answer is rewritten for someone from the source domain.
//!
//! Both passes see the same context window (the last four turns, taken
//! before the new question). The exchange is only recorded once both
//! passes have succeeded.

use std::sync::Arc;

use bridgetutor_config::AdapterStyle;
use bridgetutor_core::message::Message;
use bridgetutor_core::provider::Provider;
use bridgetutor_core::TutorError;
use tracing::info;

use crate::domain::DomainPair;
use crate::generation::{complete_text, GenerationSettings};
use crate::history::ConversationHistory;
use crate::prompts;

pub struct ExplanationPipeline {
    provider: Arc<dyn Provider>,
    settings: GenerationSettings,
    domains: DomainPair,
    style: AdapterStyle,
    history: ConversationHistory,
}

impl ExplanationPipeline {
    pub fn new(provider: Arc<dyn Provider>, settings: GenerationSettings, domains: DomainPair) -> Self {
        Self {
            provider,
            settings,
            domains,
            style: AdapterStyle::default(),
            history: ConversationHistory::new(),
        }
    }

    /// Choose how the adapt step frames its rewrite.
    pub fn with_style(mut self, style: AdapterStyle) -> Self {
        self.style = style;
        self
    }

    pub fn style(&self) -> AdapterStyle {
        self.style
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Answer `query` in the target domain, adapted to the source domain.
    pub async fn get_explanation(&mut self, query: &str) -> Result<String, TutorError> {
        if query.trim().is_empty() {
            return Err(TutorError::InvalidInput("query must not be empty".into()));
        }

        let context = self.history.window().to_vec();

        let target_explanation = self.generate(query, &context).await?;
        let adapted = self.adapt(&target_explanation, &context).await?;

        self.history.record_exchange(query, adapted.clone());
        info!(
            domains = %self.domains,
            history_len = self.history.len(),
            "Explanation delivered"
        );
        Ok(adapted)
    }

    async fn generate(&self, query: &str, context: &[Message]) -> Result<String, TutorError> {
        let messages = Self::with_context(
            prompts::expert_prompt(self.domains.target()),
            context,
            query.to_string(),
        );
        complete_text(&self.provider, &self.settings, "generate", messages).await
    }

    async fn adapt(&self, target_explanation: &str, context: &[Message]) -> Result<String, TutorError> {
        let messages = Self::with_context(
            prompts::adapter_prompt(self.style, self.domains.source(), self.domains.target()),
            context,
            prompts::adaptation_request(self.domains.source(), target_explanation),
        );
        complete_text(&self.provider, &self.settings, "adapt", messages).await
    }

    /// `[system, ..context, user]`
    fn with_context(system: String, context: &[Message], user: String) -> Vec<Message> {
        let mut messages = Vec::with_capacity(context.len() + 2);
        messages.push(Message::system(system));
        messages.extend(context.iter().cloned());
        messages.push(Message::user(user));
        messages
    }
}
