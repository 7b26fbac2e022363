//! One round-trip to the text-generation service.

use std::sync::Arc;

use bridgetutor_core::message::Message;
use bridgetutor_core::provider::{Provider, ProviderRequest, DEFAULT_TEMPERATURE};
use bridgetutor_core::TutorError;
use tracing::{debug, warn};

/// Model settings shared by every request a session makes.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub max_tokens: Option<u32>,
}

impl GenerationSettings {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_tokens: None,
        }
    }

    fn request(&self, messages: Vec<Message>) -> ProviderRequest {
        ProviderRequest {
            model: self.model.clone(),
            messages,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: self.max_tokens,
        }
    }
}

/// Send `messages` and return the completion text.
///
/// A provider failure becomes `TutorError::ExternalService` unchanged; there
/// is no retry.
pub(crate) async fn complete_text(
    provider: &Arc<dyn Provider>,
    settings: &GenerationSettings,
    step: &'static str,
    messages: Vec<Message>,
) -> Result<String, TutorError> {
    debug!(
        step,
        provider = provider.name(),
        model = %settings.model,
        messages = messages.len(),
        "Requesting completion"
    );

    let response = provider
        .complete(settings.request(messages))
        .await
        .map_err(|e| {
            warn!(step, error = %e, "Completion failed");
            TutorError::ExternalService(e)
        })?;

    Ok(response.message.content)
}
