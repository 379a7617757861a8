//! Cardmarket storefront access: offer page URLs, fetching and listing extraction

mod client;
mod game;
mod listing;

pub use client::{
    offers_url, CardmarketClient, ClientConfig, Fetch, FetchOutcome, Storefront, BASE_URL,
};
pub use game::Game;
pub use listing::{extract_listings, matching, ListingRecord, RowError, NOT_AVAILABLE};
