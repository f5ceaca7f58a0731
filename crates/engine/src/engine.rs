use rayon::prelude::*;

use crate::block::BlockIndex;
use crate::config::{DatasetConfig, LinkConfig};
use crate::error::LinkError;
use crate::model::{LinkInput, LinkMeta, LinkResult, Record};
use crate::selector::{select_block_matches, BlockOutcome};
use crate::summary::compute_summary;

/// Run the full linkage pipeline: block both sides, scan every common block,
/// collect accepted matches and run counters.
///
/// Blocks are disjoint, so each common key is scanned as its own parallel
/// task with a local result buffer; buffers are merged in sorted key order at
/// join, which keeps the output deterministic. The run is synchronous: there
/// is no cancellation surface and no partial result is ever observable.
pub fn run(config: &LinkConfig, input: &LinkInput) -> Result<LinkResult, LinkError> {
    config.validate()?;

    let left_index = BlockIndex::build(&input.left);
    let right_index = BlockIndex::build(&input.right);
    let common = left_index.common_keys(&right_index);

    let scorer = config.matching.scorer.scorer();
    let threshold = config.matching.threshold;

    let outcomes: Vec<BlockOutcome> = common
        .par_iter()
        .map(|key| {
            let left_block: Vec<&Record> = left_index
                .get(key)
                .unwrap_or(&[])
                .iter()
                .map(|&i| &input.left[i])
                .collect();
            let right_block: Vec<&Record> = right_index
                .get(key)
                .unwrap_or(&[])
                .iter()
                .map(|&i| &input.right[i])
                .collect();
            select_block_matches(&left_block, &right_block, scorer.as_ref(), threshold)
        })
        .collect();

    let summary = compute_summary(
        input.left.len(),
        input.right.len(),
        left_index.len(),
        right_index.len(),
        common.len(),
        &outcomes,
    );

    let matches = outcomes
        .into_iter()
        .flat_map(|outcome| outcome.results)
        .filter(|result| result.accepted)
        .collect();

    Ok(LinkResult {
        meta: LinkMeta {
            config_name: config.name.clone(),
            scorer: config.matching.scorer.to_string(),
            threshold,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        matches,
    })
}

/// Load CSV rows into Records, applying the column mapping and the
/// normalization boundary.
///
/// The id column must be present and non-empty on every row; the remaining
/// mapped columns must exist in the header, but empty values are fine (they
/// become `None` and resolve to blocking sentinels later).
pub fn load_csv_records(
    dataset_name: &str,
    csv_data: &str,
    dataset_config: &DatasetConfig,
) -> Result<Vec<Record>, LinkError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LinkError::Io(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let col = &dataset_config.columns;

    let idx = |name: &str| -> Result<usize, LinkError> {
        headers.iter().position(|h| h == name).ok_or_else(|| {
            LinkError::MissingColumn {
                dataset: dataset_name.into(),
                column: name.into(),
            }
        })
    };

    let id_idx = idx(&col.id)?;
    let name_idx = idx(&col.name)?;
    let address_idx = idx(&col.address)?;
    let city_idx = idx(&col.city)?;
    let state_idx = idx(&col.state)?;
    let zip_idx = idx(&col.zip)?;

    let mut records = Vec::new();

    for (row_num, row) in reader.records().enumerate() {
        let row = row.map_err(|e| LinkError::Io(e.to_string()))?;

        let id = row.get(id_idx).unwrap_or("").trim();
        if id.is_empty() {
            return Err(LinkError::MissingId {
                dataset: dataset_name.into(),
                // +2: 1-based, plus the header row
                line: row_num as u64 + 2,
            });
        }

        records.push(Record::from_raw(
            id,
            row.get(name_idx).unwrap_or(""),
            row.get(address_idx).unwrap_or(""),
            row.get(city_idx).unwrap_or(""),
            row.get(state_idx).unwrap_or(""),
            row.get(zip_idx).unwrap_or(""),
        ));
    }

    Ok(records)
}
