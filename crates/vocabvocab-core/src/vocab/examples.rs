//! Example sentence sampling.

use rand::seq::SliceRandom;
use rand::Rng;

use super::{Example, VocabItem};

/// Examples shown the first time a word appears.
pub const FIRST_VIEW_EXAMPLES: usize = 10;
/// Examples shown on every review.
pub const REVIEW_EXAMPLES: usize = 5;

/// Pick the examples to display for `item`.
///
/// A word with no repetitions yet gets [`FIRST_VIEW_EXAMPLES`], a review gets
/// [`REVIEW_EXAMPLES`]. If the item has no more examples than that, all of
/// them are returned in source order; otherwise a uniformly random subset in
/// shuffled order.
pub fn sample_examples<R: Rng + ?Sized>(
    item: &VocabItem,
    repetition_count: u32,
    rng: &mut R,
) -> Vec<Example> {
    sample_examples_with(
        item,
        repetition_count,
        FIRST_VIEW_EXAMPLES,
        REVIEW_EXAMPLES,
        rng,
    )
}

/// Same as [`sample_examples`] with explicit first-view/review quotas.
pub fn sample_examples_with<R: Rng + ?Sized>(
    item: &VocabItem,
    repetition_count: u32,
    first_view: usize,
    review: usize,
    rng: &mut R,
) -> Vec<Example> {
    let quota = if repetition_count == 0 { first_view } else { review };
    if item.examples.len() <= quota {
        return item.examples.clone();
    }
    let mut pool = item.examples.clone();
    pool.shuffle(rng);
    pool.truncate(quota);
    pool
}
