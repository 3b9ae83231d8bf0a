//! Question/answer extraction from scraped text
//!
//! Text is segmented into sentences, every sentence is run through a rule
//! table, and the generated questions are filtered, shaped and deduplicated.
//! Two profiles exist: one for deep-crawled articles and one for the scraped
//! source pages.

mod dedupe;
mod rules;
mod segment;

pub use dedupe::{dedupe, question_key, Deduplicator};
pub use rules::{
    match_sentence, QaRule, RuleFamily, DEEP_CRAWL_KEYWORDS, DEEP_CRAWL_RULES, SOURCE_RULES,
    TERMINOLOGY,
};
pub use segment::{segment, SplitMode, MAX_SENTENCE_CHARS, MIN_SENTENCE_CHARS};

use crate::crawler::{DomainCrawlResult, ScrapedPage};
use crate::url::site_label;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// A generated question with the sentence it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
    pub source_url: String,
    pub domain: String,
    pub confidence: f64,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Words a sentence must mention to be considered for source pages
pub const RELEVANCE_KEYWORDS: &[&str] = &[
    "insurance",
    "coverage",
    "policy",
    "premium",
    "claim",
    "deductible",
    "liability",
    "hull",
    "yacht",
    "boat",
    "marine",
    "vessel",
    "protection",
    "damage",
    "loss",
    "risk",
    "protect",
    "insure",
    "broker",
    "underwriter",
];

/// How pairs are tagged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagStyle {
    /// `insurance`, `marine` and the domain's leading label
    Site,
    /// A fixed topic list
    Topics(&'static [&'static str]),
}

/// Everything that differs between the two extraction flavours
#[derive(Debug, Clone)]
pub struct ExtractionProfile {
    pub rules: &'static [QaRule],
    pub split_mode: SplitMode,
    /// Allowed question length, in words
    pub question_words: RangeInclusive<usize>,
    pub confidence: f64,
    /// Maximum answer length, in characters
    pub answer_chars: usize,
    pub tags: TagStyle,
    /// Only sentences mentioning one of these are used
    pub relevance: Option<&'static [&'static str]>,
    /// Maximum relevant sentences used per page
    pub sentence_limit: Option<usize>,
    /// Drop a trailing period and every question mark from answers
    pub tidy_answers: bool,
}

impl ExtractionProfile {
    /// Profile for deep-crawled article pages
    pub fn deep_crawl() -> Self {
        Self {
            rules: DEEP_CRAWL_RULES,
            split_mode: SplitMode::Punctuation,
            question_words: 3..=100,
            confidence: 0.75,
            answer_chars: 500,
            tags: TagStyle::Site,
            relevance: None,
            sentence_limit: None,
            tidy_answers: false,
        }
    }

    /// Profile for the scraped source pages
    pub fn source_pages() -> Self {
        Self {
            rules: SOURCE_RULES,
            split_mode: SplitMode::TerminalWhitespace,
            question_words: 5..=15,
            confidence: 0.7,
            answer_chars: 200,
            tags: TagStyle::Topics(&["coverage", "requirements", "definitions"]),
            relevance: Some(RELEVANCE_KEYWORDS),
            sentence_limit: Some(20),
            tidy_answers: true,
        }
    }

    fn is_relevant(&self, sentence: &str) -> bool {
        match self.relevance {
            Some(keywords) => {
                let lower = sentence.to_lowercase();
                keywords.iter().any(|k| lower.contains(k))
            }
            None => true,
        }
    }

    fn accepts_question(&self, question: &str) -> bool {
        self.question_words
            .contains(&question.split_whitespace().count())
    }

    fn shape_answer(&self, sentence: &str) -> String {
        let answer = if self.tidy_answers {
            sentence
                .trim()
                .strip_suffix('.')
                .unwrap_or(sentence.trim())
                .replace('?', "")
        } else {
            sentence.to_string()
        };
        answer.chars().take(self.answer_chars).collect()
    }

    fn tags_for(&self, domain: &str) -> Vec<String> {
        match self.tags {
            TagStyle::Site => vec![
                "insurance".to_string(),
                "marine".to_string(),
                site_label(domain).to_string(),
            ],
            TagStyle::Topics(topics) => topics.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Runs one extraction pass
///
/// Owns the dedup state for the pass; build a new extractor for every run.
#[derive(Debug)]
pub struct QaExtractor {
    profile: ExtractionProfile,
    seen: Deduplicator,
}

impl QaExtractor {
    pub fn new(profile: ExtractionProfile) -> Self {
        Self {
            profile,
            seen: Deduplicator::new(),
        }
    }

    /// Extracts pairs from every page of every domain crawl
    pub fn extract_from_crawl(&mut self, results: &[DomainCrawlResult]) -> Vec<QaPair> {
        let mut pairs = Vec::new();

        for result in results {
            tracing::info!("Processing {}", result.domain);
            let before = pairs.len();

            for page in &result.pages {
                pairs.extend(self.extract_text(&page.content(), &page.url, &result.domain));
            }

            tracing::info!(
                "{}: extracted {} unique Q&A pairs",
                result.domain,
                pairs.len() - before
            );
        }

        tracing::info!("Total Q&A extracted: {}", pairs.len());
        pairs
    }

    /// Extracts pairs from scraped source pages
    pub fn extract_from_sources(&mut self, pages: &[ScrapedPage]) -> Vec<QaPair> {
        let mut pairs = Vec::new();

        for scraped in pages {
            let found = self.extract_text(&scraped.page.content(), &scraped.page.url, &scraped.domain);
            tracing::info!("{}: extracted {} Q&A pairs", scraped.domain, found.len());
            pairs.extend(found);
        }

        tracing::info!("Total Q&A extracted: {}", pairs.len());
        pairs
    }

    /// Extracts pairs from one block of text
    ///
    /// Questions already produced earlier in this pass are skipped.
    pub fn extract_text(&mut self, text: &str, source_url: &str, domain: &str) -> Vec<QaPair> {
        let limit = self.profile.sentence_limit.unwrap_or(usize::MAX);
        let sentences: Vec<String> = segment(text, self.profile.split_mode)
            .into_iter()
            .filter(|s| self.profile.is_relevant(s))
            .take(limit)
            .collect();

        let mut pairs = Vec::new();
        for sentence in &sentences {
            for (question, answer) in match_sentence(sentence, self.profile.rules) {
                if !self.profile.accepts_question(&question) || !self.seen.insert(&question) {
                    continue;
                }

                pairs.push(QaPair {
                    question,
                    answer: self.profile.shape_answer(&answer),
                    source_url: source_url.to_string(),
                    domain: domain.to_string(),
                    confidence: self.profile.confidence,
                    tags: self.profile.tags_for(domain),
                    created_at: Utc::now(),
                });
            }
        }

        pairs
    }
}
