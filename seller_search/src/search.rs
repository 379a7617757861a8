//! Sequential search over a seller's storefront
//!
//! One request per card, one card at a time. A 429 answer pauses the loop
//! for a fixed countdown and retries the same card; a 400 or any other
//! failure ends the search, keeping whatever was found before it.

use crate::cardmarket::{extract_listings, matching, Fetch, FetchOutcome, ListingRecord, Storefront};
use crate::error::SearchError;
use crate::input::clean_card_name;
use crate::progress::ProgressState;
use indexmap::IndexMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Matched listings per card, in the order cards were first matched
pub type MatchGroup = IndexMap<String, Vec<ListingRecord>>;

/// Timing of the search loop
#[derive(Debug, Clone)]
pub struct SearchPolicy {
    /// Countdown length after a 429, in steps
    pub rate_limit_steps: u64,
    /// Length of one countdown step
    pub countdown_step: Duration,
    /// Pause between two cards
    pub request_delay: Duration,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            rate_limit_steps: 60,
            countdown_step: Duration::from_secs(1),
            request_delay: Duration::from_secs(2),
        }
    }
}

/// Blocking wait used between requests and during the rate-limit countdown
pub trait Pause {
    fn pause(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Waits on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPause;

impl Pause for TokioPause {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Everything a search produced
#[derive(Debug, Default)]
pub struct SearchReport {
    pub matches: MatchGroup,
    pub not_found: Vec<String>,
    /// Set when the search stopped early
    pub error: Option<SearchError>,
}

impl SearchReport {
    /// Process exit code for this report
    pub fn exit_code(&self) -> i32 {
        if self.error.is_some() {
            1
        } else {
            0
        }
    }
}

/// Drives the search loop for one storefront
pub struct Searcher<'a, F, P> {
    fetcher: &'a F,
    pause: &'a P,
    storefront: &'a Storefront,
    policy: SearchPolicy,
    progress: Arc<ProgressState>,
}

impl<'a, F, P> Searcher<'a, F, P>
where
    F: Fetch,
    P: Pause,
{
    pub fn new(
        fetcher: &'a F,
        pause: &'a P,
        storefront: &'a Storefront,
        progress: Arc<ProgressState>,
    ) -> Self {
        Self {
            fetcher,
            pause,
            storefront,
            policy: SearchPolicy::default(),
            progress,
        }
    }

    pub fn with_policy(mut self, policy: SearchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Search for every card in `queries`. Each entry is cut at its first
    /// tab and trimmed; entries left empty are skipped without a request.
    pub async fn run(&self, queries: &[String]) -> SearchReport {
        let total = queries.len();
        let mut report = SearchReport::default();
        let mut index = 0;

        log::info!(
            "Searching {} card(s) in {}'s {} offers",
            total,
            self.storefront.seller,
            self.storefront.game
        );

        while index < total {
            let query = clean_card_name(&queries[index]);
            if query.is_empty() {
                index += 1;
                self.progress.set_current(index);
                continue;
            }

            let url = self.storefront.offers_url(query);
            match self.fetcher.fetch(&url).await {
                FetchOutcome::RateLimited => {
                    log::warn!("Rate limited while searching '{}', backing off", query);
                    self.wait_out_rate_limit().await;
                    continue;
                }
                FetchOutcome::ClientConfigError => {
                    log::error!("Request for '{}' was rejected with 400", query);
                    report.error = Some(SearchError::Configuration);
                    return report;
                }
                FetchOutcome::Failure { status } => {
                    log::error!("Request for '{}' failed with status {:?}", query, status);
                    report.error = Some(SearchError::Upstream { status });
                    return report;
                }
                FetchOutcome::Success { body } => {
                    let hits = matching(extract_listings(&body), query);
                    if hits.is_empty() {
                        log::debug!("No listing matches '{}'", query);
                        report.not_found.push(query.to_string());
                    } else {
                        log::debug!("{} listing(s) match '{}'", hits.len(), query);
                        report
                            .matches
                            .entry(query.to_string())
                            .or_default()
                            .extend(hits);
                        self.progress.push_found(query);
                    }
                }
            }

            index += 1;
            self.progress.set_current(index);
            if index < total {
                self.pause.pause(self.policy.request_delay).await;
            }
        }

        report
    }

    async fn wait_out_rate_limit(&self) {
        self.progress.set_rate_limited(true);
        for remaining in (1..=self.policy.rate_limit_steps).rev() {
            self.progress.set_countdown(remaining);
            self.pause.pause(self.policy.countdown_step).await;
        }
        self.progress.set_rate_limited(false);
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
