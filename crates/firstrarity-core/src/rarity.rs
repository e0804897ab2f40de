//! Rarity tables
//!
//! Turns occurrence counts into percentage shares and orders them from the
//! rarest key to the most common one.

use std::fmt::Display;
use std::hash::Hash;

use ahash::RandomState;
use indexmap::IndexMap;

use crate::aggregate::FrequencyMapping;
use crate::TokenId;

/// One row of a rarity table
#[derive(Debug, Clone, PartialEq)]
pub struct RarityRecord<K> {
    pub key: K,
    /// Occurrences of `key` in the counted data
    pub count: usize,
    /// `count / total * 100` rounded to two decimals, with a `%` suffix
    pub rarity: String,
    pub token_ids: Vec<TokenId>,
}

impl<K: Display> RarityRecord<K> {
    /// Render as `key,count,rarity,[id1;id2;...]`
    pub fn to_line(&self) -> String {
        let ids = self
            .token_ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(";");
        format!("{},{},{},[{}]", self.key, self.count, self.rarity, ids)
    }
}

/// Round to two decimals. Exact binary ties go to the even digit.
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Percentage string for `count` out of `total`, e.g. `66.67%` or `50.0%`.
pub fn rarity_percentage(count: usize, total: usize) -> String {
    let share = if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    };
    format!("{:?}%", round2(share))
}

/// Count every distinct key in `data` and build its rarity record.
///
/// Records are sorted ascending by count; equal counts keep the order in
/// which their keys first appear in `data`.
pub fn compute_rarity<K>(
    data: &[K],
    mapping: &FrequencyMapping<K>,
    total: usize,
) -> Vec<RarityRecord<K>>
where
    K: Hash + Eq + Clone,
{
    let mut counts: IndexMap<&K, usize, RandomState> = IndexMap::default();
    for key in data {
        *counts.entry(key).or_default() += 1;
    }

    let mut records: Vec<RarityRecord<K>> = counts
        .into_iter()
        .map(|(key, count)| RarityRecord {
            key: key.clone(),
            count,
            rarity: rarity_percentage(count, total),
            token_ids: mapping.get(key).cloned().unwrap_or_default(),
        })
        .collect();

    // stable: ties stay in first-seen order
    records.sort_by_key(|record| record.count);
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts() -> (Vec<String>, FrequencyMapping<String>) {
        let data: Vec<String> = ["the cat sat", "the dog sat", "the cat sat"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut mapping = FrequencyMapping::default();
        for (id, text) in [0u64, 1, 2].iter().zip(&data) {
            mapping.entry(text.clone()).or_default().push(*id);
        }
        (data, mapping)
    }

    #[test]
    fn test_percentage_format() {
        assert_eq!(rarity_percentage(2, 3), "66.67%");
        assert_eq!(rarity_percentage(1, 3), "33.33%");
        assert_eq!(rarity_percentage(1, 2), "50.0%");
        assert_eq!(rarity_percentage(3, 3), "100.0%");
        assert_eq!(rarity_percentage(1, 5000), "0.02%");
        assert_eq!(rarity_percentage(1, 0), "0.0%");
    }

    #[test]
    fn test_complete_text_rarity() {
        let (data, mapping) = texts();
        let records = compute_rarity(&data, &mapping, 3);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].key, "the dog sat");
        assert_eq!(records[0].count, 1);
        assert_eq!(records[0].rarity, "33.33%");
        assert_eq!(records[0].token_ids, vec![1]);

        assert_eq!(records[1].key, "the cat sat");
        assert_eq!(records[1].count, 2);
        assert_eq!(records[1].rarity, "66.67%");
        assert_eq!(records[1].token_ids, vec![0, 2]);
    }

    #[test]
    fn test_counts_sum_to_total() {
        let (data, mapping) = texts();
        let records = compute_rarity(&data, &mapping, data.len());
        let sum: usize = records.iter().map(|r| r.count).sum();
        assert_eq!(sum, data.len());
    }

    #[test]
    fn test_rarity_parses_back() {
        let data = vec![1usize, 2, 2, 3, 3, 3, 4];
        let mut mapping = FrequencyMapping::default();
        for (id, key) in data.iter().enumerate() {
            mapping.entry(*key).or_default().push(id as TokenId);
        }
        let total = data.len();
        for record in compute_rarity(&data, &mapping, total) {
            let parsed: f64 = record.rarity.trim_end_matches('%').parse().unwrap();
            let expected = round2(record.count as f64 / total as f64 * 100.0);
            assert!((parsed - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let data = vec!["b", "a", "c", "a"];
        let mut mapping = FrequencyMapping::default();
        for (id, key) in data.iter().enumerate() {
            mapping.entry(*key).or_default().push(id as TokenId);
        }
        let records = compute_rarity(&data, &mapping, data.len());
        let keys: Vec<&str> = records.iter().map(|r| r.key).collect();
        assert_eq!(keys, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_exact_ties_round_to_even() {
        assert_eq!(rarity_percentage(1, 32), "3.12%");
        assert_eq!(rarity_percentage(5, 32), "15.62%");
        assert_eq!(round2(4.125), 4.12);
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(1.0), 1.0);
    }

    #[test]
    fn test_to_line() {
        let record = RarityRecord {
            key: 12usize,
            count: 2,
            rarity: "0.04%".to_string(),
            token_ids: vec![5, 901],
        };
        assert_eq!(record.to_line(), "12,2,0.04%,[5;901]");
    }

    #[test]
    fn test_empty_data() {
        let mapping: FrequencyMapping<String> = FrequencyMapping::default();
        assert!(compute_rarity(&[], &mapping, 0).is_empty());
    }
}
