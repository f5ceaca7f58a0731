use log::warn;

use crate::model::{MatchResult, Record};
use crate::scorer::{ScoreText, SimilarityScorer};

/// Everything one block scan produced: per-left best candidates plus the
/// counters the run summary needs.
pub struct BlockOutcome {
    pub results: Vec<MatchResult>,
    pub pairs_compared: usize,
    pub scorer_failures: usize,
}

/// Best-match selection within one block.
///
/// For each left record (input order), every right record is scored in input
/// order and the maximum is retained; a candidate replaces the current best
/// only on strict improvement, so ties keep the earliest-seen right record.
/// The surviving candidate is emitted with `accepted = score > threshold`
/// (strict). Left records with no scoreable candidate emit nothing.
///
/// A score outside [0,1] (including NaN) is a scorer failure: it is logged,
/// counted, and the pair drops out of best-match consideration; the run
/// continues.
pub fn select_block_matches(
    left: &[&Record],
    right: &[&Record],
    scorer: &dyn SimilarityScorer,
    threshold: f64,
) -> BlockOutcome {
    let mut results = Vec::new();
    let mut pairs_compared = 0usize;
    let mut scorer_failures = 0usize;

    for l in left {
        let l_text = ScoreText::of(l);
        let mut best: Option<(usize, f64)> = None;

        for (ri, r) in right.iter().enumerate() {
            pairs_compared += 1;
            let score = scorer.score(&l_text, &ScoreText::of(r));

            if !(0.0..=1.0).contains(&score) {
                warn!(
                    "scorer '{}' returned out-of-range score {score} for pair ({}, {}); pair excluded",
                    scorer.name(),
                    l.id,
                    r.id,
                );
                scorer_failures += 1;
                continue;
            }

            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((ri, score)),
            }
        }

        if let Some((ri, score)) = best {
            results.push(MatchResult {
                left_id: l.id.clone(),
                right_id: right[ri].id.clone(),
                score,
                accepted: score > threshold,
            });
        }
    }

    BlockOutcome {
        results,
        pairs_compared,
        scorer_failures,
    }
}
