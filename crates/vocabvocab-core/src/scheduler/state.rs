//! Persisted learner state.
//!
//! Every collection lives under its own key so a corrupt value only costs
//! that collection; the others load normally.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::daily::{DailyCount, DailyTarget, DailyTracker, Streak};
use crate::error::StorageError;
use crate::storage::{keys, KvStore};

/// A pending review of one word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledEntry {
    pub word: String,
    /// View-counter value at which the review becomes due.
    pub due_position: u64,
    /// Repetition this review will be.
    pub repetition_count: u32,
}

/// Everything the scheduler owns, as loaded from or saved to a [`KvStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerState {
    pub words_viewed: Vec<String>,
    pub scheduled_words: Vec<ScheduledEntry>,
    pub learned_words: Vec<String>,
    pub total_views: u64,
    pub daily: DailyTracker,
}

impl SchedulerState {
    /// Load every key, resetting any that is missing, unreadable or corrupt.
    pub fn load<S: KvStore + ?Sized>(store: &S) -> Self {
        let words_viewed = load_key(store, keys::WORDS_VIEWED).unwrap_or_default();
        let scheduled_words = load_key(store, keys::SCHEDULED_WORDS).unwrap_or_default();
        let learned_words = load_key(store, keys::LEARNED_WORDS).unwrap_or_default();
        let total_views = load_key(store, keys::TOTAL_VIEWS).unwrap_or_default();

        let daily = DailyTracker::new(
            load_key::<DailyCount, _>(store, keys::DAILY_COUNT),
            load_key::<Streak, _>(store, keys::STREAK),
            load_key::<DailyTarget, _>(store, keys::DAILY_TARGET).unwrap_or_default(),
            load_key::<NaiveDate, _>(store, keys::TARGET_REACHED),
        );

        let mut state = Self {
            words_viewed,
            scheduled_words,
            learned_words,
            total_views,
            daily,
        };
        state.normalize();

        tracing::debug!(
            total_views = state.total_views,
            learned = state.learned_words.len(),
            scheduled = state.scheduled_words.len(),
            "loaded learner state"
        );
        state
    }

    /// Write every key in one [`KvStore::set_many`] batch.
    pub fn save<S: KvStore + ?Sized>(&self, store: &S) -> Result<(), StorageError> {
        let mut entries = vec![
            encode(keys::WORDS_VIEWED, &self.words_viewed)?,
            encode(keys::SCHEDULED_WORDS, &self.scheduled_words)?,
            encode(keys::LEARNED_WORDS, &self.learned_words)?,
            encode(keys::TOTAL_VIEWS, &self.total_views)?,
            encode(keys::DAILY_TARGET, &self.daily.target())?,
        ];
        if let Some(daily_count) = self.daily.daily_count() {
            entries.push(encode(keys::DAILY_COUNT, &daily_count)?);
        }
        if let Some(streak) = self.daily.streak() {
            entries.push(encode(keys::STREAK, &streak)?);
        }
        if let Some(reached) = self.daily.target_reached() {
            entries.push(encode(keys::TARGET_REACHED, &reached)?);
        }
        store.set_many(&entries)
    }

    /// Restore the one-entry-per-word and learned/scheduled exclusivity rules.
    fn normalize(&mut self) {
        let mut seen = HashSet::new();
        let before = self.learned_words.len();
        self.learned_words.retain(|w| seen.insert(w.clone()));
        if self.learned_words.len() != before {
            tracing::warn!(
                dropped = before - self.learned_words.len(),
                "duplicate learned words removed"
            );
        }

        let learned: HashSet<&str> = self.learned_words.iter().map(String::as_str).collect();
        let mut kept: Vec<ScheduledEntry> = Vec::with_capacity(self.scheduled_words.len());
        for entry in self.scheduled_words.drain(..) {
            if learned.contains(entry.word.as_str()) {
                tracing::warn!(word = %entry.word, "dropping schedule entry for learned word");
                continue;
            }
            if let Some(pos) = kept.iter().position(|e| e.word == entry.word) {
                tracing::warn!(word = %entry.word, "duplicate schedule entry replaced");
                kept.remove(pos);
            }
            kept.push(entry);
        }
        self.scheduled_words = kept;
    }
}

fn load_key<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KvStore + ?Sized,
{
    match store.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "corrupt stored value, resetting");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored value, resetting");
            None
        }
    }
}

fn encode<T>(key: &'static str, value: &T) -> Result<(&'static str, String), StorageError>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    Ok((key, json))
}
