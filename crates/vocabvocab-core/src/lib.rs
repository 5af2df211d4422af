//! # VocabVocab Core Library
//!
//! This library provides the core logic for the VocabVocab flashcard trainer.
//! It follows a CLI-first philosophy: every operation is available through the
//! standalone `vocabvocab-cli` binary, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Scheduler**: A spaced-repetition state machine driven by a view counter
//!   rather than wall-clock time
//! - **Daily tracking**: Per-day word counts, a configurable target and a
//!   day-over-day streak
//! - **Storage**: SQLite key/value persistence and TOML-based configuration
//! - **Vocabulary**: Word lists loaded from a JSON file or an HTTP endpoint
//!
//! ## Key Components
//!
//! - [`Scheduler`]: Chooses the next word and records views
//! - [`Session`]: Tracks the word on screen across invocations
//! - [`Database`]: Persistent key/value store
//! - [`Config`]: Application configuration management

pub mod daily;
pub mod error;
pub mod scheduler;
pub mod session;
pub mod storage;
pub mod vocab;

pub use daily::{Clock, DailyTarget, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, StorageError, ValidationError, VocabError};
pub use scheduler::{
    RepetitionOutcome, ScheduledEntry, Scheduler, SchedulerState, Stats, ViewOutcome,
};
pub use session::{Advance, Session, WordCard, WordStatus};
pub use storage::{Config, Database, KvStore, MemoryStore};
pub use vocab::{Example, VocabItem, VocabSource, Vocabulary};
