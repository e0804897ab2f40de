//! FirstRarity Core - word and text rarity for an on-chain text collection
//!
//! Enumerates the collection's claimed token ids, reads each token's text
//! from the contract, and tabulates how rare every word, word count and
//! complete text is.

pub mod aggregate;
pub mod config;
pub mod contract;
pub mod error;
pub mod fetcher;
pub mod histogram;
pub mod index;
pub mod pipeline;
pub mod progress;
pub mod rarity;
pub mod report;
pub mod stats;
pub mod tokenizer;

/// Token identifier within the collection
pub type TokenId = u64;

pub use aggregate::{Aggregator, FrequencyMapping};
pub use config::Config;
pub use contract::{EthCallSource, TextSource};
pub use error::{RarityError, Result};
pub use histogram::{HistogramRenderer, PngHistogram};
pub use index::{IndexSource, OpenSeaIndex};
pub use pipeline::{PipelineContext, RunSummary};
pub use rarity::{compute_rarity, RarityRecord};
pub use tokenizer::Tokenizer;
