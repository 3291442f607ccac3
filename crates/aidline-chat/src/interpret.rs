//! Response interpretation engine.
//!
//! Turns a free-text assistant reply plus the query that triggered it into an
//! [`AnalysisRecord`]. Never fails: garbage in yields the general category,
//! moderate severity, and the default warnings.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

use aidline_core::{AnalysisRecord, InjuryType, Severity};

// =============================================================================
// Rule tables
// =============================================================================

/// Classification rules, first match wins. Keywords are lowercase substrings.
const CLASSIFICATION_RULES: &[(&[&str], InjuryType)] = &[
    (&["burn"], InjuryType::Burn),
    (&["cut", "wound"], InjuryType::CutWound),
    (&["headache"], InjuryType::Headache),
    (&["sprain"], InjuryType::Sprain),
    (&["fracture", "broken"], InjuryType::Fracture),
    (&["bleed"], InjuryType::Bleeding),
];

const SEVERE_KEYWORDS: &[&str] = &["severe", "emergency", "immediately"];
const MINOR_KEYWORDS: &[&str] = &["minor", "mild"];

/// A step fragment must be strictly longer than this, in characters.
const MIN_STEP_CHARS: usize = 10;
const MAX_STEPS: usize = 5;
const MAX_WARNINGS: usize = 3;

/// Substituted when the reply contains no prohibition clause.
pub const DEFAULT_WARNINGS: [&str; 2] = [
    "Follow medical advice carefully",
    "Seek professional help if symptoms worsen",
];

/// Placeholder confidence, half-open: 80..=94.
const CONFIDENCE_RANGE: std::ops::Range<u8> = 80..95;

static STEP_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!]\s+").expect("Invalid step split regex"));

// Straight and typographic apostrophes both count.
static PROHIBITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:do not|don['’]t) [^.!]+[.!]").expect("Invalid prohibition regex")
});

// =============================================================================
// Public API
// =============================================================================

/// Interpret a reply using the thread-local RNG for the confidence field.
pub fn interpret(query: &str, reply: &str) -> AnalysisRecord {
    interpret_with_rng(query, reply, &mut rand::rng())
}

/// Interpret a reply drawing confidence from `rng`.
pub fn interpret_with_rng<R: Rng + ?Sized>(
    query: &str,
    reply: &str,
    rng: &mut R,
) -> AnalysisRecord {
    let record = AnalysisRecord {
        injury_type: classify(query, reply),
        severity: assess_severity(reply),
        confidence: rng.random_range(CONFIDENCE_RANGE),
        first_aid_steps: extract_steps(reply),
        warnings: extract_warnings(reply),
    };

    tracing::debug!(
        injury = %record.injury_type,
        severity = %record.severity,
        steps = record.first_aid_steps.len(),
        warnings = record.warnings.len(),
        "Reply interpreted"
    );
    record
}

/// First rule with a keyword in either the query or the reply.
pub fn classify(query: &str, reply: &str) -> InjuryType {
    let query = query.to_lowercase();
    let reply = reply.to_lowercase();

    CLASSIFICATION_RULES
        .iter()
        .find(|(keywords, _)| {
            keywords
                .iter()
                .any(|k| query.contains(k) || reply.contains(k))
        })
        .map(|(_, injury)| *injury)
        .unwrap_or_default()
}

/// Severity from the reply alone. Severe keywords win over minor ones.
pub fn assess_severity(reply: &str) -> Severity {
    let reply = reply.to_lowercase();
    if SEVERE_KEYWORDS.iter().any(|k| reply.contains(k)) {
        Severity::Severe
    } else if MINOR_KEYWORDS.iter().any(|k| reply.contains(k)) {
        Severity::Minor
    } else {
        Severity::Moderate
    }
}

/// Sentence fragments long enough to be instructions, in reply order.
pub fn extract_steps(reply: &str) -> Vec<String> {
    STEP_SPLIT
        .split(reply)
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_STEP_CHARS)
        .take(MAX_STEPS)
        .map(str::to_string)
        .collect()
}

/// "Do not ..." / "don't ..." clauses, or the default pair when there are none.
pub fn extract_warnings(reply: &str) -> Vec<String> {
    let found: Vec<String> = PROHIBITION
        .find_iter(reply)
        .take(MAX_WARNINGS)
        .map(|m| m.as_str().to_string())
        .collect();

    if found.is_empty() {
        DEFAULT_WARNINGS.iter().map(|w| w.to_string()).collect()
    } else {
        found
    }
}

// =============================================================================
// Tests
// =============================================================================
