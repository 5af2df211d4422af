mod examples;
mod item;
mod source;

pub use examples::{sample_examples, sample_examples_with, FIRST_VIEW_EXAMPLES, REVIEW_EXAMPLES};
pub use item::{Example, VocabItem, Vocabulary};
pub use source::VocabSource;
