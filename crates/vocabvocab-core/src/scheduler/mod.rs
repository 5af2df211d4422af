//! Spaced-repetition scheduler.
//!
//! The scheduler is a synchronous state machine over the view history, the
//! pending schedule, the learned set and the view counter. The counter is the
//! only notion of time used for due dates: a review "due at 30" becomes due
//! once 30 views have been completed.
//!
//! ## Per-word lifecycle
//!
//! ```text
//! Unseen -> Scheduled(1) -> Scheduled(2) -> ... -> Learned
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let state = SchedulerState::load(&db);
//! let mut scheduler = Scheduler::new(vocabulary, state, db, SystemClock);
//! if let Some(word) = scheduler.select_next().map(str::to_owned) {
//!     // ... learner reads the card ...
//!     scheduler.record_view(&word);
//! }
//! ```

mod interval;
mod state;

pub use interval::{review_interval, FirstInterval, INITIAL_INTERVAL, MAX_REPETITIONS};
pub use state::{ScheduledEntry, SchedulerState};

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::daily::{Clock, DailyTarget, SystemClock};
use crate::error::ValidationError;
use crate::storage::{KvStore, SchedulingConfig};
use crate::vocab::Vocabulary;

/// What scheduling did with a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RepetitionOutcome {
    /// Queued for another review.
    Scheduled {
        due_position: u64,
        repetition_count: u32,
    },
    /// Reached the repetition limit on this call.
    Learned,
    /// Already learned earlier; nothing changed.
    AlreadyLearned,
}

/// Result of [`Scheduler::record_view`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewOutcome {
    /// View-counter value after this view.
    pub position: u64,
    pub repetition: RepetitionOutcome,
    pub streak_incremented: bool,
}

/// Progress summary for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_views: u64,
    pub learned_words: usize,
    pub scheduled_words: usize,
    pub due_words: usize,
    pub unseen_words: usize,
    pub vocabulary_size: usize,
    pub today_count: u32,
    pub daily_target: u32,
    pub current_streak: u32,
    pub streak_start_date: NaiveDate,
    pub target_reached_today: bool,
}

/// Owns learner state and exposes the scheduling operations.
///
/// Every mutation is persisted to `store` once it is complete in memory. A
/// failed write is logged and otherwise ignored; the next successful save
/// brings the durable copy up to date.
pub struct Scheduler<S, C = SystemClock> {
    vocabulary: Vocabulary,
    state: SchedulerState,
    config: SchedulingConfig,
    store: S,
    clock: C,
}

impl<S: KvStore, C: Clock> Scheduler<S, C> {
    pub fn new(vocabulary: Vocabulary, state: SchedulerState, store: S, clock: C) -> Self {
        Self {
            vocabulary,
            state,
            config: SchedulingConfig::default(),
            store,
            clock,
        }
    }

    /// Load state from `store` and build a scheduler over it.
    pub fn open(vocabulary: Vocabulary, store: S, clock: C) -> Self {
        let state = SchedulerState::load(&store);
        Self::new(vocabulary, state, store, clock)
    }

    /// Override the interval/limit parameters.
    pub fn with_config(mut self, config: SchedulingConfig) -> Self {
        self.config = config;
        self
    }

    /// Times `word` has been repeated: the larger of its raw view count and
    /// the repetition number of its pending review.
    pub fn compute_repetitions(&self, word: &str) -> u32 {
        let viewed = self.state.words_viewed.iter().filter(|w| *w == word).count();
        let viewed = u32::try_from(viewed).unwrap_or(u32::MAX);
        let scheduled = self
            .scheduled_entry(word)
            .map(|e| e.repetition_count)
            .unwrap_or(0);
        viewed.max(scheduled)
    }

    /// Queue the next review of `word`, or mark it learned once it has been
    /// repeated `max_repetitions` times.
    pub fn schedule_for_repetition(&mut self, word: &str) -> RepetitionOutcome {
        let outcome = self.schedule(word);
        self.persist();
        outcome
    }

    fn schedule(&mut self, word: &str) -> RepetitionOutcome {
        if self.is_learned(word) {
            tracing::debug!(word, "already learned, not rescheduling");
            return RepetitionOutcome::AlreadyLearned;
        }

        let repetitions = self.compute_repetitions(word);
        self.state.scheduled_words.retain(|e| e.word != word);

        if repetitions >= self.config.max_repetitions {
            self.state.learned_words.push(word.to_string());
            tracing::info!(word, repetitions, "word learned");
            return RepetitionOutcome::Learned;
        }

        let interval = review_interval(
            self.config.initial_interval,
            repetitions,
            self.config.first_interval,
        );
        let entry = ScheduledEntry {
            word: word.to_string(),
            due_position: self.state.total_views.saturating_add(interval),
            repetition_count: repetitions + 1,
        };
        tracing::debug!(
            word,
            due_position = entry.due_position,
            repetition = entry.repetition_count,
            "scheduled review"
        );
        let outcome = RepetitionOutcome::Scheduled {
            due_position: entry.due_position,
            repetition_count: entry.repetition_count,
        };
        self.state.scheduled_words.push(entry);
        outcome
    }

    /// Choose the word to show next.
    ///
    /// 1. the most overdue review, ties in schedule order
    /// 2. the first never-seen vocabulary word
    /// 3. the soonest upcoming review, even if not yet due
    ///
    /// `None` means every word is learned.
    pub fn select_next(&self) -> Option<&str> {
        let position = self.state.total_views;

        if let Some(due) = self
            .state
            .scheduled_words
            .iter()
            .filter(|e| e.due_position <= position)
            .min_by_key(|e| e.due_position)
        {
            return Some(due.word.as_str());
        }

        let seen: HashSet<&str> = self
            .state
            .words_viewed
            .iter()
            .chain(&self.state.learned_words)
            .map(String::as_str)
            .collect();
        if let Some(word) = self.vocabulary.words().find(|w| !seen.contains(w)) {
            return Some(word);
        }

        self.state
            .scheduled_words
            .iter()
            .min_by_key(|e| e.due_position)
            .map(|e| e.word.as_str())
    }

    /// Report that `word` was shown and the learner moved on.
    ///
    /// Advances the view counter, appends to the history, updates the daily
    /// count and streak, schedules the word, then persists.
    pub fn record_view(&mut self, word: &str) -> ViewOutcome {
        self.state.total_views += 1;
        self.state.words_viewed.push(word.to_string());

        let today = self.clock.today();
        let streak_incremented = self.state.daily.record_view(today);
        let repetition = self.schedule(word);

        self.persist();

        ViewOutcome {
            position: self.state.total_views,
            repetition,
            streak_incremented,
        }
    }

    /// Set the daily target. Re-checks today's count against it right away.
    ///
    /// Returns `true` if the new target incremented the streak.
    pub fn set_daily_target(&mut self, target: DailyTarget) -> bool {
        let today = self.clock.today();
        let awarded = self.state.daily.set_target(target, today);
        self.persist();
        awarded
    }

    /// Parse and set the daily target; on rejection nothing changes.
    pub fn try_set_daily_target(&mut self, raw: &str) -> Result<DailyTarget, ValidationError> {
        let target: DailyTarget = raw.parse()?;
        self.set_daily_target(target);
        Ok(target)
    }

    pub fn daily_target(&self) -> DailyTarget {
        self.state.daily.target()
    }

    pub fn today_word_count(&self) -> u32 {
        self.state.daily.today_word_count(self.clock.today())
    }

    pub fn current_streak(&self) -> u32 {
        self.state.daily.current_streak()
    }

    pub fn streak_start_date(&self) -> NaiveDate {
        self.state.daily.streak_start_date(self.clock.today())
    }

    pub fn is_learned(&self, word: &str) -> bool {
        self.state.learned_words.iter().any(|w| w == word)
    }

    pub fn scheduled_entry(&self, word: &str) -> Option<&ScheduledEntry> {
        self.state.scheduled_words.iter().find(|e| e.word == word)
    }

    pub fn scheduled_entries(&self) -> &[ScheduledEntry] {
        &self.state.scheduled_words
    }

    pub fn learned_words(&self) -> &[String] {
        &self.state.learned_words
    }

    pub fn words_viewed(&self) -> &[String] {
        &self.state.words_viewed
    }

    pub fn total_views(&self) -> u64 {
        self.state.total_views
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &SchedulingConfig {
        &self.config
    }

    pub fn stats(&self) -> Stats {
        let today = self.clock.today();
        let position = self.state.total_views;
        let seen: HashSet<&str> = self
            .state
            .words_viewed
            .iter()
            .chain(&self.state.learned_words)
            .map(String::as_str)
            .collect();

        Stats {
            total_views: position,
            learned_words: self.state.learned_words.len(),
            scheduled_words: self.state.scheduled_words.len(),
            due_words: self
                .state
                .scheduled_words
                .iter()
                .filter(|e| e.due_position <= position)
                .count(),
            unseen_words: self.vocabulary.words().filter(|w| !seen.contains(w)).count(),
            vocabulary_size: self.vocabulary.len(),
            today_count: self.state.daily.today_word_count(today),
            daily_target: self.state.daily.target().get(),
            current_streak: self.state.daily.current_streak(),
            streak_start_date: self.state.daily.streak_start_date(today),
            target_reached_today: self.state.daily.reached_today(today),
        }
    }

    /// Save everything. Returns `false` (after logging) if the store refused.
    pub fn persist(&self) -> bool {
        match self.state.save(&self.store) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "failed to persist learner state");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daily::{DailyCount, DailyTracker, FixedClock, Streak};
    use crate::storage::{keys, MemoryStore};
    use crate::vocab::VocabItem;
    use std::rc::Rc;

    fn vocab(words: &[&str]) -> Vocabulary {
        Vocabulary::new(
            words
                .iter()
                .map(|w| VocabItem {
                    word: (*w).to_string(),
                    explanation: format!("{w} explained"),
                    explanation_translation: String::new(),
                    examples: Vec::new(),
                })
                .collect(),
        )
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn entry(word: &str, due: u64, reps: u32) -> ScheduledEntry {
        ScheduledEntry {
            word: word.into(),
            due_position: due,
            repetition_count: reps,
        }
    }

    fn scheduler_with(
        words: &[&str],
        state: SchedulerState,
    ) -> Scheduler<MemoryStore, FixedClock> {
        Scheduler::new(
            vocab(words),
            state,
            MemoryStore::new(),
            FixedClock::new(day("2023-06-01")),
        )
    }

    #[test]
    fn repetitions_start_at_zero() {
        let s = scheduler_with(&["a"], SchedulerState::default());
        assert_eq!(s.compute_repetitions("a"), 0);
    }

    #[test]
    fn repetitions_take_max_of_views_and_schedule() {
        let s = scheduler_with(
            &["a", "b"],
            SchedulerState {
                words_viewed: vec!["a".into(), "a".into(), "b".into()],
                scheduled_words: vec![entry("b", 40, 4)],
                total_views: 3,
                ..Default::default()
            },
        );
        assert_eq!(s.compute_repetitions("a"), 2);
        assert_eq!(s.compute_repetitions("b"), 4);
    }

    #[test]
    fn first_scheduling_without_history_uses_half_interval() {
        let mut s = scheduler_with(&["a"], SchedulerState::default());
        let outcome = s.schedule_for_repetition("a");
        assert_eq!(
            outcome,
            RepetitionOutcome::Scheduled {
                due_position: 5,
                repetition_count: 1
            }
        );
    }

    #[test]
    fn first_scheduling_can_use_full_interval() {
        let mut s = scheduler_with(&["a"], SchedulerState::default()).with_config(
            SchedulingConfig {
                first_interval: FirstInterval::Initial,
                ..Default::default()
            },
        );
        s.schedule_for_repetition("a");
        assert_eq!(s.scheduled_entry("a"), Some(&entry("a", 10, 1)));
    }

    #[test]
    fn schedules_at_counter_plus_base_interval() {
        let mut s = scheduler_with(
            &["a"],
            SchedulerState {
                words_viewed: vec!["a".into()],
                total_views: 5,
                ..Default::default()
            },
        );
        s.schedule_for_repetition("a");
        assert_eq!(s.scheduled_entry("a"), Some(&entry("a", 15, 2)));
    }

    #[test]
    fn second_scheduling_doubles_interval() {
        let mut s = scheduler_with(
            &["a"],
            SchedulerState {
                words_viewed: vec!["a".into(), "a".into()],
                scheduled_words: vec![entry("a", 15, 2)],
                total_views: 10,
                ..Default::default()
            },
        );
        s.schedule_for_repetition("a");
        assert_eq!(s.scheduled_entry("a"), Some(&entry("a", 30, 3)));
        assert_eq!(s.scheduled_entries().len(), 1);
    }

    #[test]
    fn each_scheduling_adds_one_repetition() {
        let mut s = scheduler_with(&["a"], SchedulerState::default());
        for expected in 1..MAX_REPETITIONS {
            s.schedule_for_repetition("a");
            assert_eq!(s.compute_repetitions("a"), expected);
        }
        assert_eq!(
            s.schedule_for_repetition("a"),
            RepetitionOutcome::Scheduled {
                due_position: 160,
                repetition_count: MAX_REPETITIONS,
            }
        );
        assert_eq!(s.schedule_for_repetition("a"), RepetitionOutcome::Learned);
        assert!(s.is_learned("a"));
    }

    #[test]
    fn six_views_mark_word_learned() {
        let mut s = scheduler_with(&["a"], SchedulerState::default());
        for _ in 0..5 {
            let outcome = s.record_view("a");
            assert!(matches!(outcome.repetition, RepetitionOutcome::Scheduled { .. }));
        }
        let outcome = s.record_view("a");
        assert_eq!(outcome.repetition, RepetitionOutcome::Learned);
        assert!(s.is_learned("a"));
        assert!(s.scheduled_entry("a").is_none());
        assert_eq!(s.total_views(), 6);
    }

    #[test]
    fn learned_word_is_never_rescheduled() {
        let mut s = scheduler_with(
            &["a"],
            SchedulerState {
                learned_words: vec!["a".into()],
                ..Default::default()
            },
        );
        assert_eq!(s.schedule_for_repetition("a"), RepetitionOutcome::AlreadyLearned);
        assert!(s.scheduled_entries().is_empty());
        assert_eq!(s.learned_words(), &["a".to_string()]);
    }

    #[test]
    fn record_view_counts_once_per_view() {
        let mut s = scheduler_with(&["a", "b"], SchedulerState::default());
        let outcome = s.record_view("a");
        assert_eq!(outcome.position, 1);
        assert_eq!(s.total_views(), 1);
        assert_eq!(s.words_viewed(), &["a".to_string()]);
        assert_eq!(s.scheduled_entry("a"), Some(&entry("a", 11, 2)));
    }

    #[test]
    fn most_overdue_review_wins() {
        let s = scheduler_with(
            &["a", "b", "c"],
            SchedulerState {
                words_viewed: vec!["a".into(), "b".into()],
                scheduled_words: vec![entry("b", 40, 2), entry("a", 30, 2)],
                total_views: 50,
                ..Default::default()
            },
        );
        assert_eq!(s.select_next(), Some("a"));
    }

    #[test]
    fn due_ties_follow_schedule_order() {
        let s = scheduler_with(
            &["a", "b"],
            SchedulerState {
                words_viewed: vec!["a".into(), "b".into()],
                scheduled_words: vec![entry("b", 20, 2), entry("a", 20, 2)],
                total_views: 25,
                ..Default::default()
            },
        );
        assert_eq!(s.select_next(), Some("b"));
    }

    #[test]
    fn first_unseen_word_when_nothing_due() {
        let s = scheduler_with(
            &["a", "b", "c"],
            SchedulerState {
                words_viewed: vec!["a".into()],
                scheduled_words: vec![entry("a", 11, 2)],
                total_views: 1,
                ..Default::default()
            },
        );
        assert_eq!(s.select_next(), Some("b"));
    }

    #[test]
    fn fresh_learner_gets_first_vocabulary_word() {
        let s = scheduler_with(&["x", "y"], SchedulerState::default());
        assert_eq!(s.select_next(), Some("x"));
    }

    #[test]
    fn learned_words_are_not_new() {
        let s = scheduler_with(
            &["a", "b"],
            SchedulerState {
                learned_words: vec!["a".into()],
                ..Default::default()
            },
        );
        assert_eq!(s.select_next(), Some("b"));
    }

    #[test]
    fn soonest_review_when_nothing_due_and_nothing_new() {
        let s = scheduler_with(
            &["a", "b"],
            SchedulerState {
                words_viewed: vec!["a".into(), "b".into()],
                scheduled_words: vec![entry("a", 40, 3), entry("b", 25, 2)],
                total_views: 20,
                ..Default::default()
            },
        );
        assert_eq!(s.select_next(), Some("b"));
    }

    #[test]
    fn nothing_left_when_all_learned() {
        let s = scheduler_with(
            &["a", "b"],
            SchedulerState {
                learned_words: vec!["a".into(), "b".into()],
                ..Default::default()
            },
        );
        assert_eq!(s.select_next(), None);
    }

    #[test]
    fn empty_vocabulary_has_nothing() {
        let s = scheduler_with(&[], SchedulerState::default());
        assert_eq!(s.select_next(), None);
    }

    #[test]
    fn unreadable_schedule_still_serves_words() {
        let store = MemoryStore::with_entries([
            (keys::WORDS_VIEWED, r#"["a"]"#),
            (keys::SCHEDULED_WORDS, r#"[{"word":"a","duePosition":1,"repetitionCount":2}]"#),
            (keys::TOTAL_VIEWS, "1"),
        ]);
        store.fail_reads_of(keys::SCHEDULED_WORDS);

        let clock = FixedClock::new(day("2023-06-01"));
        let mut s = Scheduler::open(vocab(&["a", "b"]), &store, clock);
        assert!(s.scheduled_entries().is_empty());
        assert_eq!(s.total_views(), 1);
        assert_eq!(s.select_next(), Some("b"));

        s.record_view("b");
        assert_eq!(s.scheduled_entry("b"), Some(&entry("b", 12, 2)));
    }

    #[test]
    fn record_view_persists_everything() {
        let mut s = scheduler_with(&["a"], SchedulerState::default());
        s.record_view("a");

        let reloaded = SchedulerState::load(s.store());
        assert_eq!(&reloaded, s.state());
        assert_eq!(reloaded.total_views, 1);
        assert_eq!(reloaded.daily.today_word_count(day("2023-06-01")), 1);
    }

    #[test]
    fn failed_persist_keeps_memory_and_catches_up_later() {
        let mut s = scheduler_with(&["a", "b"], SchedulerState::default());
        s.store().reject_writes(true);
        s.record_view("a");
        assert_eq!(s.total_views(), 1);
        assert!(s.store().is_empty());

        s.store().reject_writes(false);
        s.record_view("b");
        let reloaded = SchedulerState::load(s.store());
        assert_eq!(reloaded.total_views, 2);
        assert_eq!(reloaded.words_viewed, vec!["a", "b"]);
    }

    #[test]
    fn streak_preserved_on_first_view_after_good_day() {
        let state = SchedulerState {
            daily: DailyTracker::new(
                Some(DailyCount {
                    date: day("2023-05-31"),
                    count: 50,
                }),
                Some(Streak {
                    current_streak: 5,
                    start_date: day("2023-05-27"),
                }),
                DailyTarget::default(),
                Some(day("2023-05-31")),
            ),
            ..Default::default()
        };
        let mut s = scheduler_with(&["a"], state);
        let outcome = s.record_view("a");
        assert!(!outcome.streak_incremented);
        assert_eq!(s.today_word_count(), 1);
        assert_eq!(s.current_streak(), 5);
        assert_eq!(s.streak_start_date(), day("2023-05-27"));
    }

    #[test]
    fn reaching_target_through_views_increments_streak() {
        let clock = Rc::new(FixedClock::new(day("2023-06-01")));
        let mut s = Scheduler::new(
            vocab(&["a", "b", "c"]),
            SchedulerState::default(),
            MemoryStore::new(),
            Rc::clone(&clock),
        );
        s.set_daily_target(DailyTarget::new(3).unwrap());

        let words = ["a", "b", "c"];
        let outcomes: Vec<bool> = words
            .iter()
            .map(|w| s.record_view(w).streak_incremented)
            .collect();
        assert_eq!(outcomes, vec![false, false, true]);
        assert_eq!(s.current_streak(), 1);

        clock.advance_days(1);
        assert_eq!(s.today_word_count(), 0);
        s.record_view("a");
        assert_eq!(s.current_streak(), 1);
        assert_eq!(s.today_word_count(), 1);
    }

    #[test]
    fn try_set_daily_target_rejects_bad_input() {
        let mut s = scheduler_with(&["a"], SchedulerState::default());
        s.try_set_daily_target("25").unwrap();
        for raw in ["0", "-10", "abc", ""] {
            assert!(s.try_set_daily_target(raw).is_err());
            assert_eq!(s.daily_target().get(), 25);
        }
        assert_eq!(
            s.store().raw(keys::DAILY_TARGET).as_deref(),
            Some("25")
        );
    }

    #[test]
    fn lowering_target_below_count_awards_streak_immediately() {
        let state = SchedulerState {
            daily: DailyTracker::new(
                Some(DailyCount {
                    date: day("2023-06-01"),
                    count: 30,
                }),
                Some(Streak {
                    current_streak: 3,
                    start_date: day("2023-05-29"),
                }),
                DailyTarget::default(),
                None,
            ),
            ..Default::default()
        };
        let mut s = scheduler_with(&["a"], state);
        assert!(s.set_daily_target(DailyTarget::new(25).unwrap()));
        assert_eq!(s.current_streak(), 4);
        assert!(s.stats().target_reached_today);
    }

    #[test]
    fn stats_summarize_progress() {
        let s = scheduler_with(
            &["a", "b", "c", "d"],
            SchedulerState {
                words_viewed: vec!["a".into(), "b".into()],
                scheduled_words: vec![entry("a", 2, 2), entry("b", 12, 2)],
                learned_words: vec!["c".into()],
                total_views: 2,
                ..Default::default()
            },
        );
        let stats = s.stats();
        assert_eq!(stats.total_views, 2);
        assert_eq!(stats.learned_words, 1);
        assert_eq!(stats.scheduled_words, 2);
        assert_eq!(stats.due_words, 1);
        assert_eq!(stats.unseen_words, 1);
        assert_eq!(stats.vocabulary_size, 4);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.streak_start_date, day("2023-06-01"));
    }
}
