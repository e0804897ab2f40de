//! Descriptive statistics over word lengths and text lengths

use ahash::{AHashMap, AHashSet};

use crate::rarity::round2;

/// Summary of a length distribution. Real-valued fields are rounded to two decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    pub mean: f64,
    pub median: f64,
    /// Smallest of the most frequent values
    pub mode: usize,
    /// Population standard deviation
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Compute statistics for `values`. An empty input yields all zeros.
    pub fn from_values(values: &[usize]) -> Self {
        if values.is_empty() {
            return Self {
                mean: 0.0,
                median: 0.0,
                mode: 0,
                std_dev: 0.0,
            };
        }

        let n = values.len() as f64;
        let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
        let variance = values
            .iter()
            .map(|&v| {
                let d = v as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;

        Self {
            mean: round2(mean),
            median: round2(median(values)),
            mode: mode(values),
            std_dev: round2(variance.sqrt()),
        }
    }
}

fn median(values: &[usize]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
    } else {
        sorted[mid] as f64
    }
}

fn mode(values: &[usize]) -> usize {
    let mut counts: AHashMap<usize, usize> = AHashMap::new();
    for &v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .map(|(value, _)| value)
        .unwrap_or(0)
}

/// Character count of every word
pub fn word_lengths(words: &[String]) -> Vec<usize> {
    words.iter().map(|w| w.chars().count()).collect()
}

/// Longest word; the first one encountered wins ties
pub fn longest_word(words: &[String]) -> Option<&str> {
    let mut longest: Option<&str> = None;
    let mut longest_len = 0;
    for word in words {
        let len = word.chars().count();
        if longest.is_none() || len > longest_len {
            longest = Some(word);
            longest_len = len;
        }
    }
    longest
}

/// Number of distinct words
pub fn distinct_words(words: &[String]) -> usize {
    words.iter().map(String::as_str).collect::<AHashSet<_>>().len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_basic_stats() {
        let stats = DescriptiveStats::from_values(&[2, 4, 4, 4, 5, 5, 7, 9]);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.median, 4.5);
        assert_eq!(stats.mode, 4);
        assert_eq!(stats.std_dev, 2.0);
    }

    #[test]
    fn test_rounding() {
        let stats = DescriptiveStats::from_values(&[1, 2, 2]);
        assert_eq!(stats.mean, 1.67);
        assert_eq!(stats.median, 2.0);
        assert_eq!(stats.std_dev, 0.47);
    }

    #[test]
    fn test_exact_tie_rounds_to_even() {
        let stats = DescriptiveStats::from_values(&[4, 4, 4, 4, 4, 4, 4, 5]);
        assert_eq!(stats.mean, 4.12);
        assert_eq!(stats.median, 4.0);
    }

    #[test]
    fn test_multimodal_picks_smallest() {
        let stats = DescriptiveStats::from_values(&[9, 3, 9, 3, 1]);
        assert_eq!(stats.mode, 3);
    }

    #[test]
    fn test_empty() {
        let stats = DescriptiveStats::from_values(&[]);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.mode, 0);
    }

    #[test]
    fn test_longest_word_first_wins() {
        let list = words(&["ab", "abc", "xyz", "a"]);
        assert_eq!(longest_word(&list), Some("abc"));
        assert_eq!(longest_word(&[]), None);
    }

    #[test]
    fn test_distinct_words() {
        let list = words(&["the", "cat", "the", "dog", "the"]);
        assert_eq!(distinct_words(&list), 3);
        assert_eq!(word_lengths(&list), vec![3, 3, 3, 3, 3]);
    }
}
