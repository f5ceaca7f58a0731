//! Similarity scoring families.
//!
//! All scorers are pure, stateless, and return values on the canonical [0,1]
//! scale; families with a different native scale rescale here, at the
//! boundary, so the selector only ever compares against one threshold.

use rphonetic::{Encoder, Metaphone};
use serde::{Deserialize, Serialize};
use strsim::{jaro_winkler, normalized_levenshtein};

use crate::model::Record;

/// Borrowed view of the text a scorer may read for one record.
///
/// Most families score the `combined` text; the phonetic family scores name
/// and address independently. Carrying all three keeps the interface uniform
/// across variants.
pub struct ScoreText<'a> {
    pub combined: &'a str,
    pub name: &'a str,
    pub address: &'a str,
}

impl<'a> ScoreText<'a> {
    pub fn of(record: &'a Record) -> Self {
        ScoreText {
            combined: &record.combined,
            name: record.name.as_deref().unwrap_or(""),
            address: record.address.as_deref().unwrap_or(""),
        }
    }
}

/// A similarity family. Swapping the active implementation must not change
/// any other component's behavior.
pub trait SimilarityScorer: Send + Sync {
    /// Similarity of two records' text on [0,1].
    fn score(&self, left: &ScoreText<'_>, right: &ScoreText<'_>) -> f64;

    /// Stable family name, as written in config files.
    fn name(&self) -> &'static str;
}

// ---------------------------------------------------------------------------
// Variants
// ---------------------------------------------------------------------------

/// Longest-common-subsequence ratio over the combined text:
/// `2·LCS / (len_a + len_b)`.
pub struct SequenceRatio;

impl SimilarityScorer for SequenceRatio {
    fn score(&self, left: &ScoreText<'_>, right: &ScoreText<'_>) -> f64 {
        lcs_ratio(left.combined, right.combined)
    }

    fn name(&self) -> &'static str {
        "sequence_ratio"
    }
}

/// Token-reordering-tolerant edit ratio over the combined text.
///
/// Max of the plain edit ratio and 0.95× the edit ratio of the token-sorted
/// strings, so word-order differences cost at most a 5% discount.
pub struct WeightedTokenRatio;

impl SimilarityScorer for WeightedTokenRatio {
    fn score(&self, left: &ScoreText<'_>, right: &ScoreText<'_>) -> f64 {
        let plain = normalized_levenshtein(left.combined, right.combined);
        let sorted =
            normalized_levenshtein(&sort_tokens(left.combined), &sort_tokens(right.combined));
        plain.max(0.95 * sorted)
    }

    fn name(&self) -> &'static str {
        "weighted_token_ratio"
    }
}

/// Phonetic + edit-distance similarity of name and address independently,
/// mean-combined.
pub struct PhoneticNameAverage;

impl SimilarityScorer for PhoneticNameAverage {
    fn score(&self, left: &ScoreText<'_>, right: &ScoreText<'_>) -> f64 {
        let name = field_similarity(left.name, right.name);
        let address = field_similarity(left.address, right.address);
        (name + address) / 2.0
    }

    fn name(&self) -> &'static str {
        "phonetic_name_average"
    }
}

/// Mean of Jaro-Winkler over the strings themselves and over their Metaphone
/// encodings.
fn field_similarity(a: &str, b: &str) -> f64 {
    let edit = jaro_winkler(a, b);
    let metaphone = Metaphone::default();
    let phonetic = jaro_winkler(&metaphone.encode(a), &metaphone.encode(b));
    (edit + phonetic) / 2.0
}

/// Plain normalized Levenshtein similarity over the combined text.
pub struct EditDistanceRatio;

impl SimilarityScorer for EditDistanceRatio {
    fn score(&self, left: &ScoreText<'_>, right: &ScoreText<'_>) -> f64 {
        normalized_levenshtein(left.combined, right.combined)
    }

    fn name(&self) -> &'static str {
        "edit_distance_ratio"
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Scoring family selection, as written in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    SequenceRatio,
    WeightedTokenRatio,
    PhoneticNameAverage,
    EditDistanceRatio,
}

impl ScorerKind {
    pub fn scorer(&self) -> Box<dyn SimilarityScorer> {
        match self {
            Self::SequenceRatio => Box::new(SequenceRatio),
            Self::WeightedTokenRatio => Box::new(WeightedTokenRatio),
            Self::PhoneticNameAverage => Box::new(PhoneticNameAverage),
            Self::EditDistanceRatio => Box::new(EditDistanceRatio),
        }
    }
}

impl std::fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.scorer().name())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sort_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// difflib-style ratio. 1.0 when both strings are empty.
fn lcs_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * lcs_length(&a, &b) as f64 / total as f64
}

/// Two-row dynamic program: O(|a|·|b|) time, O(min(|a|,|b|)) space.
fn lcs_length(a: &[char], b: &[char]) -> usize {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let mut prev = vec![0usize; short.len() + 1];
    let mut curr = vec![0usize; short.len() + 1];

    for &lc in long {
        for (j, &sc) in short.iter().enumerate() {
            curr[j + 1] = if lc == sc {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}
