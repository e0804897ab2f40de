//! Console statistics and rarity table files

use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::rarity::RarityRecord;
use crate::stats::DescriptiveStats;

pub const WORDS_FILE: &str = "words.txt";
pub const WORD_COUNTS_FILE: &str = "total_word_counts.txt";
pub const TEXTS_FILE: &str = "complete_texts.txt";

pub const WORDS_HEADER: &str = "WORD,COUNT,RARITY,TOKEN_ID";
pub const WORD_COUNTS_HEADER: &str = "TOTAL_WORD_COUNT,COUNT,RARITY,TOKEN_ID";
pub const TEXTS_HEADER: &str = "COMPLETE_TEXT,COUNT,RARITY,TOKEN_ID";

/// Format a statistics block, e.g. `MEAN WORD LENGTH: 4.2 CHARACTERS`.
pub fn format_descriptive_stats(stats: &DescriptiveStats, type_text: &str, detail_text: &str) -> String {
    format!(
        "{type_text} INFO\n\
         MEAN {type_text} LENGTH: {:?} {detail_text}\n\
         MEDIAN {type_text} LENGTH: {:?} {detail_text}\n\
         MODE {type_text} LENGTH: {} {detail_text}\n\
         STANDARD DEVIATION OF {type_text} LENGTH: {:?} {detail_text}\n",
        stats.mean, stats.median, stats.mode, stats.std_dev
    )
}

pub fn print_descriptive_stats(stats: &DescriptiveStats, type_text: &str, detail_text: &str) {
    print!("{}", format_descriptive_stats(stats, type_text, detail_text));
}

pub fn print_longest_word(word: Option<&str>) {
    println!("LONGEST WORD: {}", word.unwrap_or_default());
}

pub fn print_distinct_words(distinct: usize, total: usize) {
    println!("NUMBER OF DISTINCT WORDS: {distinct}");
    println!("TOTAL WORDS: {total}\n");
}

/// Write `header` followed by one line per record.
pub fn write_rarity_table<K: Display>(
    path: &Path,
    header: &str,
    records: &[RarityRecord<K>],
) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{header}")?;
    for record in records {
        writeln!(out, "{}", record.to_line())?;
    }
    out.flush()?;
    info!(path = %path.display(), rows = records.len(), "wrote rarity table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_stats_block() {
        let stats = DescriptiveStats::from_values(&[3, 3, 4]);
        let block = format_descriptive_stats(&stats, "WORD", "CHARACTERS");
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(
            lines,
            vec![
                "WORD INFO",
                "MEAN WORD LENGTH: 3.33 CHARACTERS",
                "MEDIAN WORD LENGTH: 3.0 CHARACTERS",
                "MODE WORD LENGTH: 3 CHARACTERS",
                "STANDARD DEVIATION OF WORD LENGTH: 0.47 CHARACTERS",
            ]
        );
    }

    #[test]
    fn test_write_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TEXTS_FILE);
        let records = vec![
            RarityRecord {
                key: "the dog sat".to_string(),
                count: 1,
                rarity: "33.33%".to_string(),
                token_ids: vec![11],
            },
            RarityRecord {
                key: "the cat sat".to_string(),
                count: 2,
                rarity: "66.67%".to_string(),
                token_ids: vec![10, 12],
            },
        ];
        write_rarity_table(&path, TEXTS_HEADER, &records).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "COMPLETE_TEXT,COUNT,RARITY,TOKEN_ID\n\
             the dog sat,1,33.33%,[11]\n\
             the cat sat,2,66.67%,[10;12]\n"
        );
    }

    #[test]
    fn test_write_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(WORDS_FILE);
        write_rarity_table::<String>(&path, WORDS_HEADER, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "WORD,COUNT,RARITY,TOKEN_ID\n");
    }
}
