//! Error types for seller_search

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for seller_search operations
#[derive(Debug, Error)]
pub enum SearchError {
    /// The HTTP client could not be constructed
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Reading the card list failed
    #[error("Failed to read card list {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Game code other than Y, M or P
    #[error("Game type must be 'Y', 'M', or 'P' (got '{0}')")]
    InvalidGame(String),
    /// Cardmarket answered 400, which means the request headers were rejected
    #[error("ERROR 400: THERE IS PROBABLY A PROBLEM WITH THE CONFIGURATION OF THE HEADERS")]
    Configuration,
    /// Any other non-success status, or no response at all
    #[error("ERROR: {}", display_status(.status))]
    Upstream { status: Option<u16> },
}

fn display_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "None".to_string(),
    }
}

/// Result alias for seller_search operations
pub type Result<T> = std::result::Result<T, SearchError>;
