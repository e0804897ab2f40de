//! Sequential per-identifier text retrieval

use std::thread;
use std::time::Duration;

use tracing::{error, info};

use crate::aggregate::Aggregator;
use crate::config::Config;
use crate::contract::TextSource;
use crate::error::Result;
use crate::progress::ProgressBar;
use crate::TokenId;

/// Lower-case the text and drop its final character (the source's closing period).
pub fn normalize_text(raw: &str) -> String {
    let mut text = raw.to_lowercase();
    text.pop();
    text
}

/// Fetches texts one identifier at a time, in enumeration order
pub struct TextFetcher<'a, S: ?Sized> {
    source: &'a S,
    delay: Duration,
    progress: ProgressBar,
}

impl<'a, S: TextSource + ?Sized> TextFetcher<'a, S> {
    pub fn new(source: &'a S, config: &Config) -> Self {
        Self {
            source,
            delay: config.contract_delay(),
            progress: ProgressBar::new(config.universe_size, config.progress_step),
        }
    }

    /// Fetch and normalize the text for one identifier.
    pub fn fetch_text(&self, id: TokenId) -> Result<String> {
        let raw = self.source.fetch_raw(id).inspect_err(|err| {
            error!(id, %err, "text fetch failed");
        })?;
        Ok(normalize_text(&raw))
    }

    /// Fetch every identifier in order, feeding each text to `aggregator`.
    /// The first failure aborts the whole collection.
    pub fn collect_into(&self, ids: &[TokenId], aggregator: &mut Aggregator) -> Result<()> {
        for (done, &id) in (1..).zip(ids) {
            let text = self.fetch_text(id)?;
            aggregator.add_text(id, &text);

            if self.progress.is_due(done, 1) {
                self.progress.print(done);
            }
            if !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
        }
        info!(texts = aggregator.num_texts(), "collected texts");
        Ok(())
    }
}
