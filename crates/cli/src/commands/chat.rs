//! `bridgetutor chat` — Ask questions about the target field, answered in
//! terms of the source field.

use tracing::warn;

use crate::console::{self, Prompter};

use super::{DomainArgs, build_session};

pub async fn run(domains: DomainArgs, message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let (config, mut session) = build_session(domains)?;

    if let Some(msg) = message {
        eprint!("  Thinking...");
        let answer = session.get_explanation(&msg).await;
        eprint!("\r              \r");
        println!("{}", answer?);
        return Ok(());
    }

    println!();
    println!("  BridgeTutor — {}", session.domains());
    println!();
    println!("  Provider:  {}", config.default_provider);
    println!("  Model:     {}", config.default_model);
    println!();
    println!("  Ask anything about {}.", session.domains().target());
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut prompter = Prompter::new();
    while let Some(input) = prompter.ask("  You > ").await? {
        if input.is_empty() {
            continue;
        }
        if console::is_exit(&input) {
            break;
        }

        eprint!("  ...");
        match session.get_explanation(&input).await {
            Ok(answer) => {
                eprint!("\r     \r");
                println!();
                for line in answer.lines() {
                    println!("  Tutor > {line}");
                }
                println!();
            }
            Err(e) => {
                eprint!("\r     \r");
                warn!(error = %e, "Explanation failed");
                eprintln!("  [Error] {e}");
                println!();
            }
        }
    }

    println!();
    println!("  Goodbye! 👋");
    println!();
    Ok(())
}
