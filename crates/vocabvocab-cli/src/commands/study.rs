use serde::Serialize;
use vocabvocab_core::{Database, Session, ViewOutcome, WordCard};

use super::open_session;

const ALL_LEARNED: &str = "All words learned!";

#[derive(Serialize)]
struct Progress {
    today_count: u32,
    daily_target: u32,
    current_streak: u32,
}

#[derive(Serialize)]
struct NextOutput<'a> {
    recorded: Option<ViewOutcome>,
    card: Option<&'a WordCard>,
    progress: Progress,
}

fn progress(session: &Session<Database>) -> Progress {
    let scheduler = session.scheduler();
    Progress {
        today_count: scheduler.today_word_count(),
        daily_target: scheduler.daily_target().get(),
        current_streak: scheduler.current_streak(),
    }
}

pub fn next(vocab: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(vocab)?;
    let step = session.advance(&mut rand::thread_rng());
    let progress = progress(&session);

    if json {
        let output = NextOutput {
            recorded: step.recorded,
            card: step.card.as_ref(),
            progress,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match &step.card {
        Some(card) => print!("{card}"),
        None => println!("{ALL_LEARNED}"),
    }
    println!();
    println!(
        "today {}/{}, streak {}",
        progress.today_count, progress.daily_target, progress.current_streak
    );
    if step.recorded.is_some_and(|r| r.streak_incremented) {
        println!("Daily target reached!");
    }
    Ok(())
}

pub fn show(vocab: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let session = open_session(vocab)?;
    let card = session.current_card(&mut rand::thread_rng());

    if json {
        println!("{}", serde_json::to_string_pretty(&card)?);
        return Ok(());
    }
    match card {
        Some(card) => print!("{card}"),
        None if session.scheduler().select_next().is_none() => println!("{ALL_LEARNED}"),
        None => println!("No word on screen. Run `vocabvocab-cli next` to start."),
    }
    Ok(())
}
