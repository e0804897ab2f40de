//! Claimed identifier enumeration over a paginated asset index

use std::thread;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{RarityError, Result};
use crate::progress::ProgressBar;
use crate::TokenId;

/// A paginated listing of the collection's claimed identifiers
pub trait IndexSource {
    /// Fetch up to `limit` identifiers starting at `offset`, in listing order.
    fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<TokenId>>;
}

#[derive(Debug, Deserialize)]
struct AssetPage {
    assets: Vec<Asset>,
}

#[derive(Debug, Deserialize)]
struct Asset {
    token_id: TokenIdField,
}

/// The index reports identifiers as decimal strings, occasionally as numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TokenIdField {
    Number(TokenId),
    Text(String),
}

impl TokenIdField {
    fn parse(self) -> Result<TokenId> {
        match self {
            Self::Number(id) => Ok(id),
            Self::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| RarityError::Decode(format!("invalid token_id {text:?}"))),
        }
    }
}

/// Parse one index page body into identifiers
pub fn parse_asset_page(body: &str) -> Result<Vec<TokenId>> {
    let page: AssetPage = serde_json::from_str(body)?;
    page.assets
        .into_iter()
        .map(|asset| asset.token_id.parse())
        .collect()
}

/// OpenSea-style `assets` endpoint
pub struct OpenSeaIndex {
    agent: ureq::Agent,
    url: String,
    contract_address: String,
}

impl OpenSeaIndex {
    pub fn new(config: &Config) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout(config.http_timeout())
                .build(),
            url: config.index_url.clone(),
            contract_address: config.contract_address.clone(),
        }
    }
}

impl IndexSource for OpenSeaIndex {
    fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<TokenId>> {
        debug!(offset, limit, "requesting index page");
        let body = self
            .agent
            .get(&self.url)
            .query("offset", &offset.to_string())
            .query("limit", &limit.to_string())
            .query("asset_contract_address", &self.contract_address)
            .call()?
            .into_string()?;
        parse_asset_page(&body)
    }
}

/// Walks the index page by page until the universe is covered
pub struct Enumerator<'a, S: ?Sized> {
    source: &'a S,
    universe_size: usize,
    page_size: usize,
    delay: Duration,
    progress: ProgressBar,
}

impl<'a, S: IndexSource + ?Sized> Enumerator<'a, S> {
    pub fn new(source: &'a S, config: &Config) -> Self {
        Self {
            source,
            universe_size: config.universe_size,
            page_size: config.page_size,
            delay: config.index_delay(),
            progress: ProgressBar::new(config.universe_size, config.progress_step),
        }
    }

    /// Request pages while `offset <= universe_size - page_size`,
    /// concatenating identifiers in response order. Any failed page aborts.
    pub fn enumerate_claimed_ids(&self) -> Result<Vec<TokenId>> {
        let mut claimed = Vec::with_capacity(self.universe_size);
        let last_offset = self.universe_size.saturating_sub(self.page_size);
        let mut offset = 0;

        while offset <= last_offset {
            let page = self.source.fetch_page(offset, self.page_size)?;
            claimed.extend(page);
            offset += self.page_size;

            if self.progress.is_due(offset, self.page_size) {
                self.progress.print(offset);
            }
            if !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
        }

        info!(count = claimed.len(), "enumerated claimed identifiers");
        Ok(claimed)
    }
}

/// Abort unless exactly `universe_size` identifiers were collected.
pub fn verify_universe(claimed: &[TokenId], universe_size: usize) -> Result<()> {
    if claimed.len() != universe_size {
        return Err(RarityError::Inconsistent {
            expected: universe_size,
            actual: claimed.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Serves consecutive identifiers, `per_page` at a time
    struct FakeIndex {
        per_page: usize,
        requests: RefCell<Vec<usize>>,
    }

    impl IndexSource for FakeIndex {
        fn fetch_page(&self, offset: usize, _limit: usize) -> Result<Vec<TokenId>> {
            self.requests.borrow_mut().push(offset);
            Ok((offset..offset + self.per_page).map(|i| i as TokenId).collect())
        }
    }

    struct FailingIndex;

    impl IndexSource for FailingIndex {
        fn fetch_page(&self, _offset: usize, _limit: usize) -> Result<Vec<TokenId>> {
            Err(RarityError::http(
                crate::error::HttpErrorCategory::Connection,
                "refused",
            ))
        }
    }

    fn config(universe_size: usize, page_size: usize) -> Config {
        Config {
            universe_size,
            page_size,
            index_delay_ms: 0,
            ..Config::default()
        }
    }

    #[test]
    fn test_full_universe() {
        let index = FakeIndex {
            per_page: 50,
            requests: RefCell::new(Vec::new()),
        };
        let claimed = Enumerator::new(&index, &config(200, 50))
            .enumerate_claimed_ids()
            .unwrap();
        assert_eq!(claimed, (0..200).collect::<Vec<TokenId>>());
        assert_eq!(*index.requests.borrow(), vec![0, 50, 100, 150]);
        assert!(verify_universe(&claimed, 200).is_ok());
    }

    #[test]
    fn test_stops_before_overrun() {
        let index = FakeIndex {
            per_page: 2,
            requests: RefCell::new(Vec::new()),
        };
        let claimed = Enumerator::new(&index, &config(3, 2))
            .enumerate_claimed_ids()
            .unwrap();
        assert_eq!(*index.requests.borrow(), vec![0]);
        assert_eq!(claimed.len(), 2);

        let err = verify_universe(&claimed, 3).unwrap_err();
        assert!(matches!(
            err,
            RarityError::Inconsistent {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_failure_aborts() {
        let err = Enumerator::new(&FailingIndex, &config(100, 50))
            .enumerate_claimed_ids()
            .unwrap_err();
        assert_eq!(err.to_string(), "Connection Error: refused");
    }

    #[test]
    fn test_parse_asset_page() {
        let body = r#"{"assets":[{"token_id":"123456","name":"x"},{"token_id":77}]}"#;
        assert_eq!(parse_asset_page(body).unwrap(), vec![123456, 77]);
    }

    #[test]
    fn test_parse_bad_page() {
        assert!(parse_asset_page(r#"{"detail":"throttled"}"#).is_err());
        assert!(parse_asset_page(r#"{"assets":[{"token_id":"abc"}]}"#).is_err());
    }
}
