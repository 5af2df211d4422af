pub mod config;
pub mod stats;
pub mod study;
pub mod target;

use vocabvocab_core::storage::data_dir;
use vocabvocab_core::{
    Config, CoreError, Database, Scheduler, Session, SystemClock, VocabSource, Vocabulary,
};

/// Load the vocabulary from `--vocab` or the configured source.
///
/// A relative configured path is resolved against the data directory; a
/// relative `--vocab` path is taken as given.
fn load_vocabulary(config: &Config, vocab: Option<&str>) -> Result<Vocabulary, CoreError> {
    let source = match vocab {
        Some(raw) => VocabSource::parse(raw)?,
        None => VocabSource::parse(&config.vocabulary.source)?.relative_to(&data_dir()?),
    };
    tracing::debug!(%source, "loading vocabulary");
    Ok(source.load_blocking()?)
}

fn scheduler_over(
    config: &Config,
    vocabulary: Vocabulary,
) -> Result<Scheduler<Database>, CoreError> {
    let db = Database::open()?;
    Ok(Scheduler::open(vocabulary, db, SystemClock).with_config(config.scheduling))
}

pub fn open_scheduler(vocab: Option<&str>) -> Result<Scheduler<Database>, CoreError> {
    let config = Config::load()?;
    let vocabulary = load_vocabulary(&config, vocab)?;
    scheduler_over(&config, vocabulary)
}

/// Scheduler without a vocabulary, for commands that only touch daily state.
pub fn open_tracker() -> Result<Scheduler<Database>, CoreError> {
    let config = Config::load()?;
    scheduler_over(&config, Vocabulary::default())
}

pub fn open_session(vocab: Option<&str>) -> Result<Session<Database>, CoreError> {
    let config = Config::load()?;
    let vocabulary = load_vocabulary(&config, vocab)?;
    let scheduler = scheduler_over(&config, vocabulary)?;
    Ok(Session::resume(scheduler).with_examples(config.examples))
}
