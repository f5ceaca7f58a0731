use std::collections::HashMap;
use std::path::PathBuf;

use entlink_engine::block::block_key;
use entlink_engine::engine::load_csv_records;
use entlink_engine::{LinkConfig, LinkInput, LinkResult, Record};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_input(config: &LinkConfig) -> LinkInput {
    let dir = fixtures_dir();

    let left_csv = std::fs::read_to_string(dir.join(&config.datasets.left.file)).unwrap();
    let right_csv = std::fs::read_to_string(dir.join(&config.datasets.right.file)).unwrap();

    LinkInput {
        left: load_csv_records("left", &left_csv, &config.datasets.left).unwrap(),
        right: load_csv_records("right", &right_csv, &config.datasets.right).unwrap(),
    }
}

fn fixture_config() -> LinkConfig {
    let toml = std::fs::read_to_string(fixtures_dir().join("business.link.toml")).unwrap();
    LinkConfig::from_toml(&toml).unwrap()
}

/// Minimal config for in-memory runs (no files are read).
fn in_memory_config(scorer: &str, threshold: f64) -> LinkConfig {
    let toml = format!(
        r#"
name = "in-memory"

[datasets.left]
file = "left.csv"
[datasets.left.columns]
id      = "id"
name    = "name"
address = "address"
city    = "city"
state   = "state"
zip     = "zip"

[datasets.right]
file = "right.csv"
[datasets.right.columns]
id      = "id"
name    = "name"
address = "address"
city    = "city"
state   = "state"
zip     = "zip"

[matching]
scorer = "{scorer}"
threshold = {threshold}
"#
    );
    LinkConfig::from_toml(&toml).unwrap()
}

fn run_fixture(config: &LinkConfig) -> LinkResult {
    let input = load_input(config);
    entlink_engine::run(config, &input).unwrap()
}

// -------------------------------------------------------------------------
// End-to-end
// -------------------------------------------------------------------------

#[test]
fn business_linkage_end_to_end() {
    let config = fixture_config();
    let result = run_fixture(&config);

    let s = &result.summary;
    assert_eq!(s.left_records, 4);
    assert_eq!(s.right_records, 4);
    assert_eq!(s.left_blocks, 4);
    assert_eq!(s.right_blocks, 4);
    assert_eq!(s.common_blocks, 3);
    assert_eq!(s.pairs_compared, 3);
    assert_eq!(s.accepted, 2);
    assert_eq!(s.rejected, 1);
    assert_eq!(s.scorer_failures, 0);

    // Sorted block-key order: Acme's block before Blue Bottle's
    assert_eq!(result.matches.len(), 2);
    assert_eq!(result.matches[0].left_id, "1");
    assert_eq!(result.matches[0].right_id, "A");
    assert!(result.matches[0].score > 0.99);

    assert_eq!(result.matches[1].left_id, "2");
    assert_eq!(result.matches[1].right_id, "B");
    assert!(result.matches[1].score > 0.9 && result.matches[1].score < 0.95);

    for m in &result.matches {
        assert!(m.accepted);
    }
}

#[test]
fn matches_never_cross_blocks() {
    let config = fixture_config();
    let input = load_input(&config);
    let result = entlink_engine::run(&config, &input).unwrap();

    let left_by_id: HashMap<&str, &Record> =
        input.left.iter().map(|r| (r.id.as_str(), r)).collect();
    let right_by_id: HashMap<&str, &Record> =
        input.right.iter().map(|r| (r.id.as_str(), r)).collect();

    for m in &result.matches {
        let l = left_by_id[m.left_id.as_str()];
        let r = right_by_id[m.right_id.as_str()];
        assert_eq!(block_key(l), block_key(r), "match {m:?} crosses blocks");
    }
}

#[test]
fn one_sided_blocks_cost_nothing() {
    // "Orphan Widgets" (left) and "Zebra Zone" (right) have no counterpart
    // block; each 1x1 common block contributes exactly one comparison.
    let result = run_fixture(&fixture_config());
    assert_eq!(result.summary.pairs_compared, 3);
}

#[test]
fn accepted_count_non_increasing_in_threshold() {
    let config = fixture_config();
    let input = load_input(&config);

    let mut previous = usize::MAX;
    for threshold in [0.0, 0.5, 0.8, 0.95, 1.0] {
        let config = in_memory_config("weighted_token_ratio", threshold);
        let result = entlink_engine::run(&config, &input).unwrap();
        assert!(
            result.summary.accepted <= previous,
            "threshold {threshold} accepted {} > previous {previous}",
            result.summary.accepted
        );
        previous = result.summary.accepted;
    }
}

#[test]
fn identical_runs_produce_identical_output() {
    let config = fixture_config();
    let input = load_input(&config);

    let a = entlink_engine::run(&config, &input).unwrap();
    let b = entlink_engine::run(&config, &input).unwrap();
    assert_eq!(a.matches, b.matches);
    assert_eq!(a.summary.pairs_compared, b.summary.pairs_compared);
    assert_eq!(a.summary.accepted, b.summary.accepted);
}

#[test]
fn every_scorer_variant_drives_the_same_pipeline() {
    let variants = [
        "sequence_ratio",
        "weighted_token_ratio",
        "phonetic_name_average",
        "edit_distance_ratio",
    ];
    let input = load_input(&fixture_config());

    for variant in variants {
        let config = in_memory_config(variant, 0.8);
        let result = entlink_engine::run(&config, &input).unwrap();

        // Acme matches under every family; Golden Gate vs Great Wall never does.
        assert!(
            result
                .matches
                .iter()
                .any(|m| m.left_id == "1" && m.right_id == "A"),
            "{variant}: expected 1 -> A"
        );
        assert!(
            result.matches.iter().all(|m| m.left_id != "3"),
            "{variant}: left 3 should stay unmatched"
        );
        assert_eq!(result.summary.common_blocks, 3);
    }
}

// -------------------------------------------------------------------------
// Spec scenarios
// -------------------------------------------------------------------------

#[test]
fn missing_state_and_city_share_sentinel_block() {
    let left = vec![Record::from_raw("1", "Acme Corp", "", "", "", "94107")];
    let right = vec![Record::from_raw("A", "ACME Corp.", "", "", "", "94107")];

    assert_eq!(block_key(&left[0]).0, "a_Unknown_0_94107");
    assert_eq!(block_key(&left[0]), block_key(&right[0]));

    let config = in_memory_config("weighted_token_ratio", 0.8);
    let input = LinkInput { left, right };
    let result = entlink_engine::run(&config, &input).unwrap();

    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].left_id, "1");
    assert_eq!(result.matches[0].right_id, "A");
    assert!(result.matches[0].score > 0.8);
    assert!(result.matches[0].accepted);
}

#[test]
fn equal_scores_accept_only_first_in_block_order() {
    let left = vec![Record::from_raw("l1", "Acme Corp", "", "", "CA", "94107")];
    let right = vec![
        Record::from_raw("first", "Acme Corp", "", "", "CA", "94107"),
        Record::from_raw("second", "Acme Corp", "", "", "CA", "94107"),
    ];

    let config = in_memory_config("edit_distance_ratio", 0.5);
    let input = LinkInput { left, right };
    let result = entlink_engine::run(&config, &input).unwrap();

    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].right_id, "first");
}

#[test]
fn right_record_may_be_claimed_twice() {
    let left = vec![
        Record::from_raw("l1", "Acme Corp", "", "", "CA", "94107"),
        Record::from_raw("l2", "Acme Corp", "", "", "CA", "94107"),
    ];
    let right = vec![Record::from_raw("r1", "Acme Corp", "", "", "CA", "94107")];

    let config = in_memory_config("edit_distance_ratio", 0.5);
    let input = LinkInput { left, right };
    let result = entlink_engine::run(&config, &input).unwrap();

    assert_eq!(result.matches.len(), 2);
    assert!(result.matches.iter().all(|m| m.right_id == "r1"));
}
