pub mod chat;
pub mod doctor;
pub mod onboard;
pub mod quiz;

use bridgetutor_config::{AppConfig, ConfigError};
use bridgetutor_tutor::{DomainPair, TutorSession};
use tracing::info;

/// `--source` / `--target` as given on the command line.
pub struct DomainArgs {
    pub source: Option<String>,
    pub target: Option<String>,
}

impl DomainArgs {
    /// Command-line values win over `[tutor]` in the config file.
    pub fn resolve(self, config: &AppConfig) -> Result<DomainPair, Box<dyn std::error::Error>> {
        let source = self
            .source
            .or_else(|| config.tutor.source_domain.clone())
            .ok_or("No source domain — pass --source or set tutor.source_domain in config.toml")?;
        let target = self
            .target
            .or_else(|| config.tutor.target_domain.clone())
            .ok_or("No target domain — pass --target or set tutor.target_domain in config.toml")?;
        Ok(DomainPair::new(source, target)?)
    }
}

/// Load config, check credentials and build a session for `domains`.
///
/// A missing API key stops here with setup instructions.
pub fn build_session(
    domains: DomainArgs,
) -> Result<(AppConfig, TutorSession), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Err(ConfigError::MissingApiKey) = config.require_api_key() {
        print_missing_key_help();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let domains = domains.resolve(&config)?;
    let provider = bridgetutor_providers::router::from_config(&config);
    info!(
        provider = %config.default_provider,
        model = %config.default_model,
        domains = %domains,
        "Session ready"
    );
    let session = TutorSession::from_config(provider, &config, domains);
    Ok((config, session))
}

fn print_missing_key_help() {
    eprintln!();
    eprintln!("  ERROR: No API key configured!");
    eprintln!();
    eprintln!("  Set one of these environment variables:");
    eprintln!("    export BRIDGETUTOR_API_KEY='sk-...'");
    eprintln!("    export OPENAI_API_KEY='sk-...'");
    eprintln!();
    eprintln!("  Or add it to your config file:");
    eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
    eprintln!();
}
