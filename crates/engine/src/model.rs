use serde::Serialize;

use crate::normalize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single normalized record from either dataset.
///
/// Fields are normalized once, when the record is built; everything downstream
/// (blocking, scoring) reads the canonical values. `combined` is derived for
/// scoring only and never participates in blocking.
#[derive(Debug, Clone)]
pub struct Record {
    pub id: String,
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub combined: String,
}

impl Record {
    /// Build a record from raw field values.
    ///
    /// This is the single normalization boundary: raw text is cleaned here
    /// and nowhere else. Empty fields become `None`.
    pub fn from_raw(id: &str, name: &str, address: &str, city: &str, state: &str, zip: &str) -> Self {
        let name = normalize::clean_text(name);
        let address = normalize::normalize_address(address);
        let city = normalize::clean_text(city);
        let state = state.trim().to_string();
        let zip = zip.trim();

        let combined = normalize::combined(&name, &address);

        Record {
            id: id.to_string(),
            name: none_if_empty(name),
            address: none_if_empty(address),
            city: none_if_empty(city),
            state: none_if_empty(state),
            zip: if zip.is_empty() {
                None
            } else {
                Some(normalize::normalize_zip(zip))
            },
            combined,
        }
    }
}

fn none_if_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Pre-loaded records for both sides of the linkage.
pub struct LinkInput {
    pub left: Vec<Record>,
    pub right: Vec<Record>,
}

// ---------------------------------------------------------------------------
// Blocking
// ---------------------------------------------------------------------------

/// 4-part composite blocking key:
/// `first-letter(name)_STATE_first-letter(city)_zip[0:5]`.
///
/// Missing fields resolve to sentinels (`0`, `Unknown`, `0`, `00000`), so the
/// key is total over any record. Records are only ever compared within a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BlockKey(pub String);

impl std::fmt::Display for BlockKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Best-candidate outcome for one left record.
///
/// At most one per left id per run. `accepted` records whether the score
/// cleared the threshold (strict `>`); only accepted results reach the final
/// match collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub left_id: String,
    pub right_id: String,
    pub score: f64,
    pub accepted: bool,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct LinkSummary {
    pub left_records: usize,
    pub right_records: usize,
    pub left_blocks: usize,
    pub right_blocks: usize,
    pub common_blocks: usize,
    pub pairs_compared: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub scorer_failures: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkMeta {
    pub config_name: String,
    pub scorer: String,
    pub threshold: f64,
    pub engine_version: String,
    pub run_at: String,
}

/// Full run output: metadata, counters, and the accepted match collection.
///
/// Match order is stable: blocks in sorted key order, left records in input
/// order within a block.
#[derive(Debug, Clone, Serialize)]
pub struct LinkResult {
    pub meta: LinkMeta,
    pub summary: LinkSummary,
    pub matches: Vec<MatchResult>,
}
