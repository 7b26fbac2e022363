//! `bridgetutor quiz` — Adaptive multiple-choice quizzes.
//!
//! Each round generates five questions at the current difficulty. Scoring
//! 80% or more makes the next round harder.

use bridgetutor_tutor::{AnswerSet, ChoiceKey, Evaluation, Quiz, TutorSession};
use tokio::io::AsyncBufRead;
use tracing::warn;

use crate::console::{self, Prompter};

use super::{DomainArgs, build_session};

pub async fn run(domains: DomainArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (_config, mut session) = build_session(domains)?;
    let mut prompter = Prompter::new();

    println!();
    println!("  BridgeTutor Quiz — {}", session.domains());
    println!("  Answer with A, B, C or D. Type 'exit' to stop.");

    loop {
        let Some(quiz) = generate_with_retry(&mut session, &mut prompter).await? else {
            break;
        };

        let Some(answers) = collect_answers(&mut prompter, &quiz).await? else {
            break;
        };

        let evaluation = session.evaluate_active(&answers)?;
        print_results(&session, &quiz, &evaluation);

        session.reset_quiz();
        match prompter.ask("\n  Take another quiz? (y/n) > ").await? {
            Some(reply) if console::is_yes(&reply) => continue,
            _ => break,
        }
    }

    println!();
    println!("  Quizzes taken: {}", session.test_history().len());
    println!("  Final difficulty: {}", session.current_difficulty());
    println!();
    Ok(())
}

/// Generate the next quiz, offering a retry after each failure.
///
/// `None` once the learner declines to try again. The session, and with it
/// the difficulty reached so far, survives every failed attempt.
async fn generate_with_retry<R: AsyncBufRead + Unpin>(
    session: &mut TutorSession,
    prompter: &mut Prompter<R>,
) -> std::io::Result<Option<Quiz>> {
    loop {
        println!();
        eprint!("  Generating a level {} quiz...", session.current_difficulty());
        let generated = session.generate_quiz().await;
        eprint!("\r                                   \r");

        match generated {
            Ok(quiz) => return Ok(Some(quiz)),
            Err(e) => {
                warn!(error = %e, "Quiz generation failed");
                eprintln!("  [Error] {e}");
                match prompter.ask("  Try again? (y/n) > ").await? {
                    Some(reply) if console::is_yes(&reply) => continue,
                    _ => return Ok(None),
                }
            }
        }
    }
}

/// Walk through every question. `None` if the learner quits early.
async fn collect_answers<R: AsyncBufRead + Unpin>(
    prompter: &mut Prompter<R>,
    quiz: &Quiz,
) -> Result<Option<AnswerSet>, Box<dyn std::error::Error>> {
    let mut answers = AnswerSet::new();

    for (index, question) in quiz.questions().iter().enumerate() {
        println!();
        println!("  Q{}. {}", index + 1, question.text());
        for (key, text) in question.options().iter() {
            println!("     {key}) {text}");
        }

        loop {
            let Some(input) = prompter.ask("  Your answer > ").await? else {
                return Ok(None);
            };
            if console::is_exit(&input) {
                return Ok(None);
            }
            match parse_choice(&input) {
                Some(choice) => {
                    answers.answer(index, choice.as_str());
                    break;
                }
                None => println!("  Please answer A, B, C or D."),
            }
        }
    }

    Ok(Some(answers))
}

/// Lowercase input is accepted at the prompt; scoring itself is exact.
fn parse_choice(input: &str) -> Option<ChoiceKey> {
    input.trim().to_ascii_uppercase().parse().ok()
}

fn print_results(session: &TutorSession, quiz: &Quiz, evaluation: &Evaluation) {
    println!();
    println!(
        "  Score: {:.1}% ({}/{})",
        evaluation.score, evaluation.correct, evaluation.total
    );

    if evaluation.difficulty_changed() {
        println!(
            "  🎉 Great work! Difficulty raised to {}.",
            evaluation.difficulty_after
        );
    } else if evaluation.should_increase {
        println!("  🎉 Great work! You are already at the highest difficulty.");
    } else {
        println!(
            "  Keep practising — difficulty stays at {}.",
            evaluation.difficulty_after
        );
    }

    for (review, question) in evaluation.reviews.iter().zip(quiz.questions()) {
        println!();
        let mark = if review.is_correct { "✅" } else { "❌" };
        println!("  {mark} Q{}. {}", review.index + 1, question.text());
        if !review.is_correct {
            println!(
                "     You chose {}; the answer is {}.",
                review.chosen, review.correct_answer
            );
        }
        println!("     {}", review.explanation);
        println!(
            "     From {}: {}",
            session.domains().source(),
            review.source_domain_connection
        );
    }
}
