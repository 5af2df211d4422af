use super::open_scheduler;

pub fn run(vocab: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let scheduler = open_scheduler(vocab)?;
    let stats = scheduler.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("views:      {}", stats.total_views);
    println!(
        "words:      {} learned, {} in review ({} due), {} new, {} total",
        stats.learned_words,
        stats.scheduled_words,
        stats.due_words,
        stats.unseen_words,
        stats.vocabulary_size
    );
    println!("today:      {}/{}", stats.today_count, stats.daily_target);
    println!(
        "streak:     {} day(s) since {}",
        stats.current_streak, stats.streak_start_date
    );
    Ok(())
}
