//! Heuristic sentence segmentation
//!
//! No handling of abbreviations, decimals or quoted punctuation; false splits
//! are expected.

use regex::Regex;
use std::sync::LazyLock;

/// Sentences must be strictly longer than this (in characters)
pub const MIN_SENTENCE_CHARS: usize = 20;

/// Sentences must be strictly shorter than this (in characters)
pub const MAX_SENTENCE_CHARS: usize = 500;

static RE_PUNCTUATION_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").unwrap());
static RE_TERMINAL_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").unwrap());

/// How text is cut into sentence candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// Split on every run of `.`, `!` or `?`, dropping the punctuation
    Punctuation,
    /// Split after `.`, `!` or `?` followed by whitespace, keeping the punctuation
    TerminalWhitespace,
}

/// Splits text into trimmed sentences with `20 < chars < 500`
///
/// # Example
///
/// ```
/// use qa_harvest::extract::{segment, SplitMode};
///
/// let text = "Short one. Hull insurance covers physical damage to the boat! Ok?";
/// assert_eq!(
///     segment(text, SplitMode::Punctuation),
///     vec!["Hull insurance covers physical damage to the boat"]
/// );
/// ```
pub fn segment(text: &str, mode: SplitMode) -> Vec<String> {
    let pieces: Vec<&str> = match mode {
        SplitMode::Punctuation => RE_PUNCTUATION_RUN.split(text).collect(),
        SplitMode::TerminalWhitespace => split_after_terminal(text),
    };

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|s| {
            let len = s.chars().count();
            len > MIN_SENTENCE_CHARS && len < MAX_SENTENCE_CHARS
        })
        .map(str::to_string)
        .collect()
}

/// Cuts right after each terminal mark that is followed by whitespace
fn split_after_terminal(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;

    for m in RE_TERMINAL_WHITESPACE.find_iter(text) {
        // The terminal mark is a single ASCII byte
        let cut = m.start() + 1;
        pieces.push(&text[start..cut]);
        start = m.end();
    }
    pieces.push(&text[start..]);

    pieces
}
