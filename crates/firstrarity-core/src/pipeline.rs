//! End-to-end driver: enumerate, fetch, aggregate, rank, report

use tracing::info;

use crate::aggregate::Aggregator;
use crate::config::Config;
use crate::contract::TextSource;
use crate::error::Result;
use crate::fetcher::TextFetcher;
use crate::histogram::{histogram_filename, HistogramRenderer};
use crate::index::{verify_universe, Enumerator, IndexSource};
use crate::progress::StageTimer;
use crate::rarity::{compute_rarity, RarityRecord};
use crate::report::{self, TEXTS_FILE, TEXTS_HEADER, WORDS_FILE, WORDS_HEADER, WORD_COUNTS_FILE, WORD_COUNTS_HEADER};
use crate::stats::{self, DescriptiveStats};
use crate::TokenId;

/// Everything one run needs, passed explicitly through the stages
pub struct PipelineContext {
    pub config: Config,
    pub index: Box<dyn IndexSource>,
    pub texts: Box<dyn TextSource>,
    pub histogram: Box<dyn HistogramRenderer>,
}

/// Results of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub claimed: Vec<TokenId>,
    pub word_stats: DescriptiveStats,
    pub text_stats: DescriptiveStats,
    pub longest_word: Option<String>,
    pub distinct_words: usize,
    pub total_words: usize,
    pub words: Vec<RarityRecord<String>>,
    pub word_counts: Vec<RarityRecord<usize>>,
    pub complete_texts: Vec<RarityRecord<String>>,
}

impl PipelineContext {
    /// Run every stage in order. The first error aborts the run.
    pub fn run(&self) -> Result<RunSummary> {
        let config = &self.config;

        let timer = StageTimer::start("COLLECTING CLAIMED TOKEN IDS");
        let claimed = Enumerator::new(self.index.as_ref(), config).enumerate_claimed_ids()?;
        timer.finish();
        verify_universe(&claimed, config.universe_size)?;

        let timer = StageTimer::start("QUERYING CONTRACT");
        let mut agg = Aggregator::new();
        TextFetcher::new(self.texts.as_ref(), config).collect_into(&claimed, &mut agg)?;
        timer.finish();

        let word_lengths = stats::word_lengths(&agg.all_words);
        let word_stats = DescriptiveStats::from_values(&word_lengths);
        report::print_descriptive_stats(&word_stats, "WORD", "CHARACTERS");

        let longest_word = stats::longest_word(&agg.all_words).map(str::to_owned);
        report::print_longest_word(longest_word.as_deref());

        let distinct_words = stats::distinct_words(&agg.all_words);
        let total_words = agg.all_words.len();
        report::print_distinct_words(distinct_words, total_words);

        std::fs::create_dir_all(&config.output_dir)?;
        self.histogram.render(
            &word_lengths,
            &config.output_dir.join(histogram_filename("Word")),
        )?;

        let text_stats = DescriptiveStats::from_values(&agg.all_word_counts);
        report::print_descriptive_stats(&text_stats, "TEXT", "WORDS");
        self.histogram.render(
            &agg.all_word_counts,
            &config.output_dir.join(histogram_filename("Text")),
        )?;

        let words = compute_rarity(&agg.all_words, &agg.word_to_ids, total_words);
        let word_counts = compute_rarity(
            &agg.all_word_counts,
            &agg.word_count_to_ids,
            config.universe_size,
        );
        let complete_texts = compute_rarity(
            &agg.complete_texts,
            &agg.text_to_ids,
            config.universe_size,
        );

        let out = &config.output_dir;
        report::write_rarity_table(&out.join(WORDS_FILE), WORDS_HEADER, &words)?;
        report::write_rarity_table(&out.join(WORD_COUNTS_FILE), WORD_COUNTS_HEADER, &word_counts)?;
        report::write_rarity_table(&out.join(TEXTS_FILE), TEXTS_HEADER, &complete_texts)?;
        info!(output = %out.display(), "rarity tables written");

        Ok(RunSummary {
            claimed,
            word_stats,
            text_stats,
            longest_word,
            distinct_words,
            total_words,
            words,
            word_counts,
            complete_texts,
        })
    }
}
