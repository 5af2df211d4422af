//! Study session: the "show a word, then report it viewed" protocol.
//!
//! A [`Session`] remembers which word is on screen. Advancing reports that
//! word to the scheduler before choosing the next one, so the learner never
//! has to call `record_view` directly. The cursor is persisted under
//! [`keys::CURRENT_WORD`] and restored on [`Session::resume`], which lets a
//! short-lived CLI process pick up where the previous one stopped.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::daily::{Clock, SystemClock};
use crate::scheduler::{Scheduler, ViewOutcome};
use crate::storage::{keys, ExamplesConfig, KvStore};
use crate::vocab::{sample_examples_with, Example};

/// Whether a card is a first encounter or a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WordStatus {
    FirstTime,
    Review { repetition: u32, of: u32 },
}

/// Everything needed to render one word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCard {
    pub word: String,
    pub explanation: String,
    pub explanation_translation: String,
    pub examples: Vec<Example>,
    pub status: WordStatus,
}

impl fmt::Display for WordCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            WordStatus::FirstTime => writeln!(f, "{}  (new)", self.word)?,
            WordStatus::Review { repetition, of } => {
                writeln!(f, "{}  (review {repetition}/{of})", self.word)?
            }
        }
        if !self.explanation.is_empty() {
            writeln!(f)?;
            writeln!(f, "  {}", self.explanation)?;
            if !self.explanation_translation.is_empty() {
                writeln!(f, "  {}", self.explanation_translation)?;
            }
        }
        if !self.examples.is_empty() {
            writeln!(f)?;
            for example in &self.examples {
                writeln!(f, "  - {}", example.sentence)?;
                if !example.sentence_translation.is_empty() {
                    writeln!(f, "    {}", example.sentence_translation)?;
                }
            }
        }
        Ok(())
    }
}

/// Result of [`Session::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    /// Outcome of reporting the previously shown word, if there was one.
    pub recorded: Option<ViewOutcome>,
    /// The card now on screen; `None` once every word is learned.
    pub card: Option<WordCard>,
}

pub struct Session<S, C = SystemClock> {
    scheduler: Scheduler<S, C>,
    examples: ExamplesConfig,
    current: Option<String>,
}

impl<S: KvStore, C: Clock> Session<S, C> {
    /// Wrap `scheduler`, restoring the on-screen word from its store.
    ///
    /// A stored word that is not in the current vocabulary is dropped.
    pub fn resume(scheduler: Scheduler<S, C>) -> Self {
        let stored = match scheduler.store().get(keys::CURRENT_WORD) {
            Ok(Some(raw)) => serde_json::from_str::<Option<String>>(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "corrupt current word, starting fresh");
                None
            }),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read current word");
                None
            }
        };
        let current = stored.filter(|word| {
            let known = scheduler.vocabulary().contains(word);
            if !known {
                tracing::warn!(word = %word, "stored word not in vocabulary, starting fresh");
            }
            known
        });
        Self {
            scheduler,
            examples: ExamplesConfig::default(),
            current,
        }
    }

    pub fn with_examples(mut self, examples: ExamplesConfig) -> Self {
        self.examples = examples;
        self
    }

    /// Report the word on screen as viewed (if any) and move to the next one.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Advance {
        let recorded = self
            .current
            .take()
            .map(|word| self.scheduler.record_view(&word));

        self.current = self.scheduler.select_next().map(str::to_owned);
        self.persist_current();

        if self.current.is_none() {
            tracing::info!("all words learned");
        }

        Advance {
            recorded,
            card: self.current_card(rng),
        }
    }

    /// Render the word on screen without recording anything.
    pub fn current_card<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<WordCard> {
        let word = self.current.as_deref()?;
        Some(self.card_for(word, rng))
    }

    pub fn current_word(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn scheduler(&self) -> &Scheduler<S, C> {
        &self.scheduler
    }

    fn card_for<R: Rng + ?Sized>(&self, word: &str, rng: &mut R) -> WordCard {
        let repetitions = self.scheduler.compute_repetitions(word);
        let status = if repetitions == 0 {
            WordStatus::FirstTime
        } else {
            WordStatus::Review {
                repetition: repetitions,
                of: self.scheduler.config().max_repetitions,
            }
        };

        match self.scheduler.vocabulary().get(word) {
            Some(item) => WordCard {
                word: item.word.clone(),
                explanation: item.explanation.clone(),
                explanation_translation: item.explanation_translation.clone(),
                examples: sample_examples_with(
                    item,
                    repetitions,
                    self.examples.first_view,
                    self.examples.review,
                    rng,
                ),
                status,
            },
            None => {
                tracing::error!(word, "word missing from vocabulary");
                WordCard {
                    word: word.to_string(),
                    explanation: String::new(),
                    explanation_translation: String::new(),
                    examples: Vec::new(),
                    status,
                }
            }
        }
    }

    fn persist_current(&self) {
        let json = match serde_json::to_string(&self.current) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode current word");
                return;
            }
        };
        if let Err(e) = self.scheduler.store().set(keys::CURRENT_WORD, &json) {
            tracing::warn!(error = %e, "failed to persist current word");
        }
    }
}
