//! Sentence-to-question rule tables
//!
//! Each rule is an independent predicate plus question template. Rules never
//! see each other's output; a sentence yields one candidate per rule that
//! fires, in table order.

use regex::Regex;
use std::sync::LazyLock;

/// Kind of cue a rule looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFamily {
    Definition,
    Coverage,
    Obligation,
    Cost,
    Keyword,
    Interrogative,
}

/// One sentence-to-question rule
#[derive(Clone, Copy)]
pub struct QaRule {
    pub family: RuleFamily,
    pub name: &'static str,
    apply: fn(&str) -> Vec<String>,
}

impl QaRule {
    /// Questions this rule generates for `sentence` (usually zero or one)
    pub fn questions(&self, sentence: &str) -> Vec<String> {
        (self.apply)(sentence)
    }
}

impl std::fmt::Debug for QaRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QaRule")
            .field("family", &self.family)
            .field("name", &self.name)
            .finish()
    }
}

/// Runs every rule against `sentence`, pairing each question with the sentence
pub fn match_sentence(sentence: &str, rules: &[QaRule]) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for rule in rules {
        for question in rule.questions(sentence) {
            tracing::trace!(family = ?rule.family, rule = rule.name, "{}", question);
            pairs.push((question, sentence.to_string()));
        }
    }
    pairs
}

// ============================================================================
// Deep crawl rules
// ============================================================================

/// Rules applied to deep-crawled article text
pub const DEEP_CRAWL_RULES: &[QaRule] = &[
    QaRule {
        family: RuleFamily::Definition,
        name: "definition",
        apply: deep_definition,
    },
    QaRule {
        family: RuleFamily::Coverage,
        name: "coverage",
        apply: deep_coverage,
    },
    QaRule {
        family: RuleFamily::Obligation,
        name: "requirements",
        apply: deep_obligation,
    },
    QaRule {
        family: RuleFamily::Cost,
        name: "cost",
        apply: deep_cost,
    },
    QaRule {
        family: RuleFamily::Keyword,
        name: "keyword",
        apply: deep_keyword,
    },
    QaRule {
        family: RuleFamily::Interrogative,
        name: "interrogative",
        apply: interrogative,
    },
];

/// Scanned in order; only the first hit produces a question
pub const DEEP_CRAWL_KEYWORDS: &[&str] = &[
    "liability",
    "deductible",
    "premium",
    "claim",
    "coverage",
    "policy",
    "insured",
    "exclude",
    "condition",
];

const COST_TERMS: &[&str] = &["cost", "premium", "price", "fee", "deductible"];

static RE_DEEP_DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(.+?)\s+(?:is|means?|refers to|defined as)\s+(.+)").unwrap()
});
static RE_DEEP_COVERAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(Insurance|Coverage|Policy|Yacht|Boat|Marine).+?covers?(.+)").unwrap()
});
static RE_DEEP_OBLIGATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:You should|You must|Required|Important|Essential|need to).+").unwrap()
});
static RE_AMOUNT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[$£€]\d+|\d+%").unwrap());
static RE_INTERROGATIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:How|Why|When|Where|What)\b").unwrap());

fn deep_definition(sentence: &str) -> Vec<String> {
    RE_DEEP_DEFINITION
        .captures(sentence)
        .map(|caps| format!("What is {}?", caps[1].trim()))
        .into_iter()
        .collect()
}

fn deep_coverage(sentence: &str) -> Vec<String> {
    fixed(RE_DEEP_COVERAGE.is_match(sentence), "What does coverage include?")
}

fn deep_obligation(sentence: &str) -> Vec<String> {
    fixed(RE_DEEP_OBLIGATION.is_match(sentence), "What are the requirements?")
}

fn deep_cost(sentence: &str) -> Vec<String> {
    let lower = sentence.to_lowercase();
    let priced = RE_AMOUNT.is_match(sentence) && COST_TERMS.iter().any(|t| lower.contains(t));
    fixed(priced, "What is the cost?")
}

fn deep_keyword(sentence: &str) -> Vec<String> {
    let lower = sentence.to_lowercase();
    DEEP_CRAWL_KEYWORDS
        .iter()
        .find(|keyword| lower.contains(*keyword))
        .map(|keyword| format!("What about {}?", keyword))
        .into_iter()
        .collect()
}

fn interrogative(sentence: &str) -> Vec<String> {
    if !RE_INTERROGATIVE.is_match(sentence) {
        return Vec::new();
    }
    vec![format!("{}?", sentence.trim_end_matches('?'))]
}

// ============================================================================
// Source page rules
// ============================================================================

/// Rules applied to scraped source pages
pub const SOURCE_RULES: &[QaRule] = &[
    QaRule {
        family: RuleFamily::Definition,
        name: "definition",
        apply: source_definition,
    },
    QaRule {
        family: RuleFamily::Coverage,
        name: "coverage",
        apply: source_coverage,
    },
    QaRule {
        family: RuleFamily::Obligation,
        name: "should-i",
        apply: source_obligation,
    },
    QaRule {
        family: RuleFamily::Cost,
        name: "how-much",
        apply: source_cost,
    },
    QaRule {
        family: RuleFamily::Keyword,
        name: "terminology",
        apply: source_terminology,
    },
];

/// Terms with a canned question, scanned in order; first hit wins
pub const TERMINOLOGY: &[(&str, &str)] = &[
    ("deductible", "What is a deductible?"),
    ("premium", "What is an insurance premium?"),
    ("liability", "What is liability coverage?"),
];

/// Longest subject the definition rule turns into a question
const MAX_TERM_WORDS: usize = 3;

static RE_SOURCE_DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\w\s]+)\s+(?:is|means|refers to|represents)\s+(.+)").unwrap()
});
static RE_SOURCE_COVERAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z\s]+)\s+(?:covers|includes|provides)\s+(.+)").unwrap()
});
static RE_SOURCE_OBLIGATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"You\s+(?:should|must|need to)\s+(.+)").unwrap());
static RE_SOURCE_COST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:cost|price|expense)\s+(?:of|for)\s+([A-Za-z\s]+)\s+is\s+(.+)").unwrap()
});

fn source_definition(sentence: &str) -> Vec<String> {
    let Some(caps) = RE_SOURCE_DEFINITION.captures(sentence) else {
        return Vec::new();
    };
    let term = caps[1].trim();
    if term.split_whitespace().count() > MAX_TERM_WORDS {
        return Vec::new();
    }
    vec![
        format!("What is {}?", term),
        format!("What does {} mean in yacht insurance?", term),
    ]
}

fn source_coverage(sentence: &str) -> Vec<String> {
    RE_SOURCE_COVERAGE
        .captures(sentence)
        .map(|caps| caps[1].trim().to_string())
        .filter(|entity| entity.to_lowercase().contains("insurance"))
        .map(|entity| format!("What does {} cover?", entity))
        .into_iter()
        .collect()
}

fn source_obligation(sentence: &str) -> Vec<String> {
    RE_SOURCE_OBLIGATION
        .captures(sentence)
        .map(|caps| caps[1].trim().trim_end_matches(['.', '!', '?']).to_string())
        .filter(|action| !action.is_empty())
        .map(|action| format!("Should I {}?", action))
        .into_iter()
        .collect()
}

fn source_cost(sentence: &str) -> Vec<String> {
    RE_SOURCE_COST
        .captures(sentence)
        .map(|caps| format!("How much does {} cost?", caps[1].trim()))
        .into_iter()
        .collect()
}

fn source_terminology(sentence: &str) -> Vec<String> {
    let lower = sentence.to_lowercase();
    TERMINOLOGY
        .iter()
        .find(|(term, _)| lower.contains(term))
        .map(|(_, question)| question.to_string())
        .into_iter()
        .collect()
}

fn fixed(fired: bool, question: &str) -> Vec<String> {
    if fired {
        vec![question.to_string()]
    } else {
        Vec::new()
    }
}
