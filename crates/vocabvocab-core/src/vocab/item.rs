use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One example sentence with its translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub sentence: String,
    #[serde(default, alias = "sentenceTranslation")]
    pub sentence_translation: String,
}

/// A learnable vocabulary entry. `word` is the unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabItem {
    pub word: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default, alias = "explanationTranslation")]
    pub explanation_translation: String,
    #[serde(default)]
    pub examples: Vec<Example>,
}

/// Immutable, ordered word list with lookup by word.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    items: Vec<VocabItem>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Build from items in source order. Later duplicates of a word are dropped.
    pub fn new(items: Vec<VocabItem>) -> Self {
        let mut kept = Vec::with_capacity(items.len());
        let mut index = HashMap::with_capacity(items.len());
        for item in items {
            if index.contains_key(&item.word) {
                tracing::warn!(word = %item.word, "duplicate vocabulary entry ignored");
                continue;
            }
            index.insert(item.word.clone(), kept.len());
            kept.push(item);
        }
        Self { items: kept, index }
    }

    pub fn get(&self, word: &str) -> Option<&VocabItem> {
        self.index.get(word).map(|&i| &self.items[i])
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// Words in source order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.word.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<Vec<VocabItem>> for Vocabulary {
    fn from(items: Vec<VocabItem>) -> Self {
        Self::new(items)
    }
}
