use serde::{Deserialize, Serialize};

/// Base review gap, in completed views.
pub const INITIAL_INTERVAL: u64 = 10;
/// Repetitions after which a word counts as learned.
pub const MAX_REPETITIONS: u32 = 6;

/// Gap used when a word is scheduled with zero prior repetitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirstInterval {
    /// `initial * 2^-1`, rounded up to a whole view.
    #[default]
    Halved,
    /// Exactly `initial`.
    Initial,
}

/// Views until the next review of a word that has `repetitions` so far.
///
/// `initial * 2^(repetitions - 1)`, saturating on overflow.
pub fn review_interval(initial: u64, repetitions: u32, first: FirstInterval) -> u64 {
    match repetitions {
        0 => match first {
            FirstInterval::Halved => initial.div_ceil(2),
            FirstInterval::Initial => initial,
        },
        n => {
            let factor = 2u64.checked_pow(n - 1).unwrap_or(u64::MAX);
            initial.saturating_mul(factor)
        }
    }
}
