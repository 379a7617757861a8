//! Seller Search - Cardmarket storefront lookup
//!
//! Searches one seller's Singles offers for a list of cards, one request at a
//! time with rate-limit backoff, and reports the matching listings as a table.

pub mod cardmarket;
pub mod error;
pub mod input;
pub mod progress;
pub mod report;
pub mod search;

pub use cardmarket::{CardmarketClient, ClientConfig, Game, ListingRecord, Storefront};
pub use error::{Result, SearchError};
pub use progress::{ProgressReporter, ProgressState};
pub use search::{MatchGroup, SearchPolicy, SearchReport, Searcher, TokioPause};
