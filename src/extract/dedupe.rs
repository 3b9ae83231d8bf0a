//! Question-level deduplication
//!
//! Questions are keyed by the hex SHA-256 digest of their trimmed, lowercased
//! text, so the key is stable across runs and processes.

use crate::extract::QaPair;
use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Content-addressed key for a question
pub fn question_key(question: &str) -> String {
    let normalized = question.trim().to_lowercase();
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}

/// Tracks the questions seen during one extraction run
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the question; returns false if an equivalent one was seen before
    pub fn insert(&mut self, question: &str) -> bool {
        self.seen.insert(question_key(question))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Keeps the first pair for each question, preserving order
pub fn dedupe(pairs: Vec<QaPair>) -> Vec<QaPair> {
    let mut dedup = Deduplicator::new();
    pairs
        .into_iter()
        .filter(|pair| dedup.insert(&pair.question))
        .collect()
}
