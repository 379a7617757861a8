//! Extraction of offer rows from a seller's Singles page

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::sync::LazyLock;
use thiserror::Error;

/// Placeholder for any field the row does not carry
pub const NOT_AVAILABLE: &str = "N/A";

/// One offer row as shown on the seller's page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRecord {
    pub name: String,
    pub rarity: String,
    pub edition: String,
    pub condition: String,
    pub price: String,
    pub quantity: String,
}

impl ListingRecord {
    /// Case-insensitive substring match of `query` against the listing name
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Structural problems that make a row unusable
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("row has no seller column")]
    MissingSellerColumn,
    #[error("expansion symbol has no label")]
    MissingEditionLabel,
}

struct Selectors {
    row: Selector,
    seller_column: Selector,
    link: Selector,
    rarity: Selector,
    expansion_symbol: Selector,
    span: Selector,
    badge: Selector,
    price_container: Selector,
    bold: Selector,
    item_count: Selector,
}

impl Selectors {
    fn new() -> Self {
        Self {
            row: css("div.article-row"),
            seller_column: css("div.col-seller"),
            link: css("a"),
            rarity: css("svg[title]"),
            expansion_symbol: css("a.expansion-symbol"),
            span: css("span"),
            badge: css("span.badge"),
            price_container: css("div.price-container"),
            bold: css("span.fw-bold"),
            item_count: css("span.item-count"),
        }
    }
}

fn css(selector: &str) -> Selector {
    Selector::parse(selector).expect("static selector is valid CSS")
}

static SELECTORS: LazyLock<Selectors> = LazyLock::new(Selectors::new);

/// Parse every offer row on the page, in document order.
///
/// Rows that are structurally broken are logged and dropped; the rest of
/// the page is still returned.
pub fn extract_listings(html: &str) -> Vec<ListingRecord> {
    let document = Html::parse_document(html);

    document
        .select(&SELECTORS.row)
        .enumerate()
        .filter_map(|(index, row)| match parse_row(row) {
            Ok(record) => Some(record),
            Err(e) => {
                log::debug!("Skipping listing row {}: {}", index, e);
                None
            }
        })
        .collect()
}

/// Keep only the records whose name contains `query`, ignoring case
pub fn matching(records: Vec<ListingRecord>, query: &str) -> Vec<ListingRecord> {
    records
        .into_iter()
        .filter(|record| record.matches(query))
        .collect()
}

fn parse_row(row: ElementRef<'_>) -> Result<ListingRecord, RowError> {
    let s = &*SELECTORS;

    let seller = row
        .select(&s.seller_column)
        .next()
        .ok_or(RowError::MissingSellerColumn)?;
    let name = seller.select(&s.link).next().map(text_of);

    let rarity = row
        .select(&s.rarity)
        .next()
        .and_then(|svg| svg.value().attr("title"))
        .map(str::to_string);

    let edition = match row.select(&s.expansion_symbol).next() {
        Some(symbol) => Some(
            symbol
                .select(&s.span)
                .next()
                .map(text_of)
                .ok_or(RowError::MissingEditionLabel)?,
        ),
        None => None,
    };

    let condition = row.select(&s.badge).next().map(text_of);

    let price = row
        .select(&s.price_container)
        .next()
        .and_then(|container| container.select(&s.bold).next())
        .map(text_of);

    let quantity = row.select(&s.item_count).next().map(text_of);

    Ok(ListingRecord {
        name: or_placeholder(name),
        rarity: or_placeholder(rarity),
        edition: or_placeholder(edition),
        condition: or_placeholder(condition),
        price: or_placeholder(price),
        quantity: or_placeholder(quantity),
    })
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn or_placeholder(field: Option<String>) -> String {
    field.unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[cfg(test)]
#[path = "listing_tests.rs"]
mod tests;
