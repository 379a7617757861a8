//! Game catalogs a seller storefront can be searched in

use crate::error::SearchError;
use std::fmt;
use std::str::FromStr;

/// Cardmarket game catalog, selected on the command line by a one-letter code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Game {
    YuGiOh,
    Magic,
    Pokemon,
}

impl Game {
    /// Path segment Cardmarket uses for this game
    pub fn catalog_id(&self) -> &'static str {
        match self {
            Game::YuGiOh => "YuGiOh",
            Game::Magic => "Magic",
            Game::Pokemon => "Pokemon",
        }
    }
}

impl FromStr for Game {
    type Err = SearchError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code.trim().to_uppercase().as_str() {
            "Y" => Ok(Game::YuGiOh),
            "M" => Ok(Game::Magic),
            "P" => Ok(Game::Pokemon),
            _ => Err(SearchError::InvalidGame(code.to_string())),
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.catalog_id())
    }
}
