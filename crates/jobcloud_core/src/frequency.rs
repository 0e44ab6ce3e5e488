use std::collections::BTreeMap;

use serde::Serialize;

use crate::tokenize::tokenize;

/// Token counts that all reached the minimum frequency they were built with.
///
/// Read-only once built; iteration is in ascending token order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TokenFrequencyMap {
    counts: BTreeMap<String, u32>,
}

impl TokenFrequencyMap {
    pub fn get(&self, token: &str) -> Option<u32> {
        self.counts.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(token, count)| (token.as_str(), *count))
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().map(|count| u64::from(*count)).sum()
    }

    /// Up to `limit` entries by descending count, ties by ascending token.
    pub fn top(&self, limit: usize) -> Vec<(&str, u32)> {
        let mut entries: Vec<(&str, u32)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(limit);
        entries
    }
}

/// Count tokens across `texts` and keep those seen at least `min_frequency` times.
///
/// Each text is tokenized on its own, so n-grams never span two texts.
/// A `min_frequency` of zero keeps every observed token.
pub fn aggregate<I, S>(texts: I, min_frequency: u32, n: usize) -> TokenFrequencyMap
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let min_frequency = min_frequency.max(1);
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    for text in texts {
        for token in tokenize(text.as_ref(), n) {
            *counts.entry(token).or_insert(0) += 1;
        }
    }
    counts.retain(|_, count| *count >= min_frequency);
    TokenFrequencyMap { counts }
}
