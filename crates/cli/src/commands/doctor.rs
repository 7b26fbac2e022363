//! `bridgetutor doctor` — Diagnose config and provider connectivity.

use bridgetutor_config::AppConfig;
use tracing::debug;

/// Where the configured model stands in the provider's model list.
#[derive(Debug, PartialEq, Eq)]
enum ModelCheck {
    Listed,
    Missing { available: usize },
    /// The provider returned no list (some compatible servers don't).
    Unknown,
}

fn check_model(model: &str, available: &[String]) -> ModelCheck {
    if available.is_empty() {
        ModelCheck::Unknown
    } else if available.iter().any(|m| m == model) {
        ModelCheck::Listed
    } else {
        ModelCheck::Missing {
            available: available.len(),
        }
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 BridgeTutor Doctor — System Diagnostics");
    println!("=========================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file found");
    } else {
        println!("  ⚠️  No config file — run `bridgetutor onboard` (defaults in use)");
        issues += 1;
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  1 blocking issue found. Fix the config and re-run.");
            return Ok(());
        }
    };

    match config.require_api_key() {
        Ok(_) => println!("  ✅ API key configured for '{}'", config.default_provider),
        Err(e) => {
            println!("  ❌ {e}");
            issues += 1;
        }
    }

    match (&config.tutor.source_domain, &config.tutor.target_domain) {
        (Some(source), Some(target)) => println!("  ✅ Default domains: {source} → {target}"),
        _ => println!("  ℹ️  No default domains — pass --source and --target"),
    }

    let provider = bridgetutor_providers::router::from_config(&config);
    match provider.health_check().await {
        Ok(true) => println!("  ✅ Provider '{}' reachable", provider.name()),
        Ok(false) => {
            println!("  ❌ Provider '{}' responded but reported unhealthy", provider.name());
            issues += 1;
        }
        Err(e) => {
            println!("  ❌ Provider '{}' unreachable: {e}", provider.name());
            issues += 1;
        }
    }

    match provider.list_models().await {
        Ok(models) => {
            debug!(count = models.len(), "Models listed");
            match check_model(&config.default_model, &models) {
                ModelCheck::Listed => println!("  ✅ Model '{}' available", config.default_model),
                ModelCheck::Missing { available } => {
                    println!(
                        "  ⚠️  Model '{}' not among the {available} models the provider lists",
                        config.default_model
                    );
                    issues += 1;
                }
                ModelCheck::Unknown => {
                    println!("  ℹ️  Provider did not list models; '{}' unchecked", config.default_model)
                }
            }
        }
        Err(e) => println!("  ℹ️  Could not list models: {e}"),
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn models(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn configured_model_found_in_list() {
        assert_eq!(check_model("gpt-4", &models(&["gpt-4o", "gpt-4"])), ModelCheck::Listed);
    }

    #[test]
    fn configured_model_missing_from_list() {
        assert_eq!(
            check_model("gpt-5-turbo", &models(&["gpt-4o", "gpt-4"])),
            ModelCheck::Missing { available: 2 }
        );
    }

    #[test]
    fn empty_list_leaves_model_unchecked() {
        assert_eq!(check_model("gpt-4", &[]), ModelCheck::Unknown);
    }
}
