//! Picks the provider named by `default_provider` and wires its credentials.
//!
//! Every supported backend speaks the OpenAI wire format, so selection is a
//! matter of base URL and key.

use std::sync::Arc;

use bridgetutor_config::AppConfig;
use bridgetutor_core::provider::Provider;

use crate::openai_compat::OpenAiCompatProvider;

/// Build the configured default provider.
///
/// A `[providers.<name>]` entry supplies the key and URL when present;
/// otherwise the global `api_key` and the well-known URL for that name apply.
pub fn from_config(config: &AppConfig) -> Arc<dyn Provider> {
    let name = config.default_provider.as_str();
    let entry = config.providers.get(name);

    let api_key = entry
        .and_then(|p| p.api_key.clone())
        .or_else(|| config.api_key.clone())
        .unwrap_or_default();

    let base_url = entry
        .and_then(|p| p.api_url.clone())
        .unwrap_or_else(|| default_base_url(name));

    tracing::debug!(provider = name, base_url = %base_url, "Provider selected");
    Arc::new(OpenAiCompatProvider::new(name, base_url, api_key))
}

/// Base URL for well-known OpenAI-compatible services.
fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openai" => "https://api.openai.com/v1".into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}
