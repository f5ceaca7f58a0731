use crate::model::LinkSummary;
use crate::selector::BlockOutcome;

/// Fold per-block outcomes into the run counters.
pub fn compute_summary(
    left_records: usize,
    right_records: usize,
    left_blocks: usize,
    right_blocks: usize,
    common_blocks: usize,
    outcomes: &[BlockOutcome],
) -> LinkSummary {
    let mut pairs_compared = 0;
    let mut accepted = 0;
    let mut rejected = 0;
    let mut scorer_failures = 0;

    for outcome in outcomes {
        pairs_compared += outcome.pairs_compared;
        scorer_failures += outcome.scorer_failures;
        for result in &outcome.results {
            if result.accepted {
                accepted += 1;
            } else {
                rejected += 1;
            }
        }
    }

    LinkSummary {
        left_records,
        right_records,
        left_blocks,
        right_blocks,
        common_blocks,
        pairs_compared,
        accepted,
        rejected,
        scorer_failures,
    }
}
