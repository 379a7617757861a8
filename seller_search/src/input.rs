use crate::error::{Result, SearchError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Card name as searched: everything before the first tab, trimmed
pub fn clean_card_name(line: &str) -> &str {
    line.split('\t').next().unwrap_or_default().trim()
}

/// Read a card list, one card per line. Each line is trimmed before it is
/// cut at the first tab. Blank lines are kept as empty entries so progress
/// counts match the file.
pub fn read_card_list(path: &Path) -> Result<Vec<String>> {
    let io_error = |source: std::io::Error| SearchError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_error)?;
    let mut cards = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(io_error)?;
        cards.push(clean_card_name(line.trim()).to_string());
    }

    Ok(cards)
}

/// Interpret the card argument: a path to an existing file is read as a
/// card list, anything else is a single card name.
pub fn load_queries(card_or_file: &str) -> Result<Vec<String>> {
    let path = Path::new(card_or_file);
    if path.is_file() {
        log::info!("Reading card list from {}", path.display());
        read_card_list(path)
    } else {
        Ok(vec![clean_card_name(card_or_file).to_string()])
    }
}
