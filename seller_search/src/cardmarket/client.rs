//! HTTP client for seller offer pages
//!
//! Cardmarket sits behind an anti-bot challenge. The client presents
//! browser-like headers and keeps a cookie store, so the clearance cookie
//! handed out after the first challenge is replayed on every later request.

use crate::cardmarket::Game;
use crate::error::Result;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use std::future::Future;
use std::time::Duration;

/// Cardmarket site root (English locale)
pub const BASE_URL: &str = "https://www.cardmarket.com/en";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_EN: &str = "en-US,en;q=0.5";

/// Result of a single GET against Cardmarket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 200 with the page body
    Success { body: String },
    /// 429, wait and ask again
    RateLimited,
    /// 400, the request itself was rejected
    ClientConfigError,
    /// Any other status, or `None` when no response arrived at all
    Failure { status: Option<u16> },
}

impl FetchOutcome {
    /// Classify a response by status code
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            200 => FetchOutcome::Success { body },
            429 => FetchOutcome::RateLimited,
            400 => FetchOutcome::ClientConfigError,
            other => FetchOutcome::Failure {
                status: Some(other),
            },
        }
    }

    /// HTTP status this outcome stands for
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchOutcome::Success { .. } => Some(200),
            FetchOutcome::RateLimited => Some(429),
            FetchOutcome::ClientConfigError => Some(400),
            FetchOutcome::Failure { status } => *status,
        }
    }
}

/// Something that can GET a page. Implementations never fail: transport
/// errors are reported as `FetchOutcome::Failure { status: None }`.
pub trait Fetch {
    fn fetch(&self, url: &str) -> impl Future<Output = FetchOutcome> + Send;
}

/// Client settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: BROWSER_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// A seller's storefront in one game catalog
#[derive(Debug, Clone)]
pub struct Storefront {
    pub base_url: String,
    pub game: Game,
    pub seller: String,
}

impl Storefront {
    pub fn new(game: Game, seller: impl Into<String>) -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            game,
            seller: seller.into(),
        }
    }

    /// Point the storefront at a different site root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Singles offers search URL for `card_name`
    pub fn offers_url(&self, card_name: &str) -> String {
        offers_url(&self.base_url, self.game, &self.seller, card_name)
    }
}

/// Build the offers search URL for one card in a seller's storefront.
///
/// Spaces become `+` before percent-encoding, matching what the site's own
/// search form produces.
pub fn offers_url(base_url: &str, game: Game, seller: &str, card_name: &str) -> String {
    let query = urlencoding::encode(&card_name.replace(' ', "+")).into_owned();
    format!(
        "{}/{}/Users/{}/Offers/Singles?name={}",
        base_url.trim_end_matches('/'),
        game.catalog_id(),
        seller,
        query
    )
}

/// reqwest-backed client for Cardmarket offer pages
pub struct CardmarketClient {
    http: reqwest::Client,
}

impl CardmarketClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_EN));

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .cookie_store(true)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { http })
    }
}

impl Fetch for CardmarketClient {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        log::debug!("GET {}", url);

        let response = match self.http.get(url).header(REFERER, url).send().await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Request to {} failed: {}", url, e);
                return FetchOutcome::Failure { status: None };
            }
        };

        let status = response.status().as_u16();
        log::debug!("{} answered {}", url, status);

        if status != 200 {
            return FetchOutcome::from_status(status, String::new());
        }

        match response.text().await {
            Ok(body) => FetchOutcome::Success { body },
            Err(e) => {
                log::warn!("Failed to read body from {}: {}", url, e);
                FetchOutcome::Failure { status: None }
            }
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
