use std::collections::BTreeMap;

use crate::model::{BlockKey, Record};
use crate::normalize;

/// Derive the blocking key for a record.
///
/// Total function: absent or empty fields fall back to the fixed sentinels
/// (`0` for name/city, `Unknown` for state, `00000` for zip) and never to an
/// error. Name/city contribute a lower-cased first letter, the state is
/// upper-cased, the zip is truncated/right-padded to exactly 5 characters.
pub fn block_key(record: &Record) -> BlockKey {
    let name = first_letter(record.name.as_deref());
    let state = match record.state.as_deref().filter(|s| !s.is_empty()) {
        Some(s) => s.to_uppercase(),
        None => "Unknown".to_string(),
    };
    let city = first_letter(record.city.as_deref());
    let zip = match record.zip.as_deref().filter(|z| !z.is_empty()) {
        Some(z) => normalize::normalize_zip(z),
        None => "00000".to_string(),
    };

    BlockKey(format!("{name}_{state}_{city}_{zip}"))
}

fn first_letter(field: Option<&str>) -> String {
    field
        .and_then(|s| s.chars().next())
        .map(|c| c.to_lowercase().to_string())
        .unwrap_or_else(|| "0".to_string())
}

/// One dataset's records grouped by blocking key.
///
/// Holds indices into the source slice; a key's sequence preserves original
/// input order. The source records are never copied or mutated.
pub struct BlockIndex {
    groups: BTreeMap<BlockKey, Vec<usize>>,
}

impl BlockIndex {
    /// Group records by blocking key. O(n) in record count.
    pub fn build(records: &[Record]) -> Self {
        let mut groups: BTreeMap<BlockKey, Vec<usize>> = BTreeMap::new();
        for (i, record) in records.iter().enumerate() {
            groups.entry(block_key(record)).or_default().push(i);
        }
        BlockIndex { groups }
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Record indices for a key, in input order.
    pub fn get(&self, key: &BlockKey) -> Option<&[usize]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Keys present in both indexes, in sorted key order.
    ///
    /// Keys on only one side are dropped: records whose key has no
    /// counterpart are never compared.
    pub fn common_keys(&self, other: &BlockIndex) -> Vec<BlockKey> {
        self.groups
            .keys()
            .filter(|key| other.groups.contains_key(key))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, city: &str, state: &str, zip: &str) -> Record {
        Record::from_raw("r", name, "", city, state, zip)
    }

    #[test]
    fn key_from_full_fields() {
        let r = record("Acme Corp", "San Francisco", "ca", "94107");
        assert_eq!(block_key(&r).0, "a_CA_s_94107");
    }

    #[test]
    fn sentinels_for_missing_fields() {
        let r = record("", "", "", "9");
        assert_eq!(block_key(&r).0, "0_Unknown_0_90000");

        let all_empty = record("", "", "", "");
        assert_eq!(block_key(&all_empty).0, "0_Unknown_0_00000");
    }

    #[test]
    fn key_is_pure_over_fields() {
        let a = record("Blue Bottle", "Oakland", "CA", "94612");
        let b = record("blue-bottle!", "OAKLAND", "ca", "94612-0001");
        assert_eq!(block_key(&a), block_key(&b));
    }

    #[test]
    fn index_preserves_input_order() {
        let records = vec![
            record("Acme One", "SF", "CA", "94107"),
            record("Basket", "SF", "CA", "94103"),
            record("Apex Two", "SF", "CA", "94107"),
        ];
        // "Acme" and "Apex" share a key ("a_CA_s_94107")
        let index = BlockIndex::build(&records);
        assert_eq!(index.len(), 2);
        let key = block_key(&records[0]);
        assert_eq!(index.get(&key), Some(&[0usize, 2][..]));
    }

    #[test]
    fn common_keys_sorted_intersection() {
        let left = vec![
            record("Acme", "SF", "CA", "94107"),
            record("Basket", "SF", "CA", "94103"),
            record("Zebra", "Oakland", "CA", "94612"),
        ];
        let right = vec![
            record("Apex", "SF", "CA", "94107"),
            record("Zulu", "Oakland", "CA", "94612"),
            record("Quill", "SF", "NV", "89001"),
        ];
        let li = BlockIndex::build(&left);
        let ri = BlockIndex::build(&right);
        let common = li.common_keys(&ri);
        assert_eq!(
            common,
            vec![
                BlockKey("a_CA_s_94107".into()),
                BlockKey("z_CA_o_94612".into()),
            ]
        );
    }
}
