//! Text and JSON rendering of search results

use crate::cardmarket::ListingRecord;
use crate::search::{MatchGroup, SearchReport};
use serde::Serialize;

const HEADERS: [&str; 6] = ["NAME", "RARITY", "EDITION", "CONDITION", "PRICE", "QTY"];

/// Shorter rarity labels for the table. Unknown rarities are shown as-is.
pub fn rarity_label(rarity: &str) -> &str {
    match rarity.to_lowercase().as_str() {
        "common" => "",
        "ultra rare" => "Ultra",
        "super rare" => "Super",
        "platinum secret rare" => "Platinum Secret",
        "ultimate rare" => "Ultimate",
        _ => rarity,
    }
}

fn table_row(record: &ListingRecord) -> [&str; 6] {
    [
        record.name.as_str(),
        rarity_label(&record.rarity),
        record.edition.as_str(),
        record.condition.as_str(),
        record.price.as_str(),
        record.quantity.as_str(),
    ]
}

/// Column widths: the widest cell of each column, header included
pub fn column_widths(matches: &MatchGroup) -> [usize; 6] {
    let mut widths = HEADERS.map(|h| h.chars().count());
    for record in matches.values().flatten() {
        for (width, cell) in widths.iter_mut().zip(table_row(record)) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths
}

/// Render matches as a bordered table, one block of rows per card
pub fn format_table(matches: &MatchGroup) -> String {
    let widths = column_widths(matches);
    let border = format!(
        "+{}+",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );

    let format_row = |cells: [&str; 6]| -> String {
        let parts: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!(" {cell:^width$} "))
            .collect();
        format!("|{}|", parts.join("|"))
    };

    let mut output = String::new();
    output.push_str(&border);
    output.push('\n');
    output.push_str(&format_row(HEADERS));
    output.push('\n');
    output.push_str(&border);
    output.push('\n');

    for records in matches.values() {
        for record in records {
            output.push_str(&format_row(table_row(record)));
            output.push('\n');
        }
        output.push_str(&border);
        output.push('\n');
    }

    output
}

/// Render the list of cards without any matching listing
pub fn format_not_found(not_found: &[String]) -> String {
    let mut output = String::from("\nCARDS NOT FOUND:\n");
    for name in not_found {
        output.push_str(&format!("  - {name}\n"));
    }
    output
}

/// Full text report: the table (if anything matched), then either the
/// not-found list or the error that ended the search.
pub fn render_text(report: &SearchReport) -> String {
    let mut output = String::new();

    if !report.matches.is_empty() {
        output.push_str(&format_table(&report.matches));
    }

    match &report.error {
        Some(error) => {
            output.push_str(&error.to_string());
            output.push('\n');
        }
        None if !report.not_found.is_empty() => {
            output.push_str(&format_not_found(&report.not_found));
        }
        None => {}
    }

    output
}

#[derive(Serialize)]
struct JsonReport<'a> {
    matches: &'a MatchGroup,
    not_found: &'a [String],
    error: Option<String>,
}

/// Machine-readable report
pub fn render_json(report: &SearchReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        matches: &report.matches,
        not_found: &report.not_found,
        error: report.error.as_ref().map(ToString::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;

    fn record(name: &str, rarity: &str, price: &str) -> ListingRecord {
        ListingRecord {
            name: name.to_string(),
            rarity: rarity.to_string(),
            edition: "LOB".to_string(),
            condition: "NM".to_string(),
            price: price.to_string(),
            quantity: "1".to_string(),
        }
    }

    fn sample_matches() -> MatchGroup {
        let mut matches = MatchGroup::new();
        matches.insert(
            "Dark Magician".to_string(),
            vec![
                record("Dark Magician", "Ultra Rare", "5,00 €"),
                record("Dark Magician Girl", "Common", "0,20 €"),
            ],
        );
        matches.insert(
            "Kuriboh".to_string(),
            vec![record("Kuriboh", "Starlight Rare", "120,00 €")],
        );
        matches
    }

    #[test]
    fn rarity_labels_are_remapped() {
        assert_eq!(rarity_label("Ultra Rare"), "Ultra");
        assert_eq!(rarity_label("Common"), "");
        assert_eq!(rarity_label("SUPER RARE"), "Super");
        assert_eq!(rarity_label("Platinum Secret Rare"), "Platinum Secret");
        assert_eq!(rarity_label("Ultimate Rare"), "Ultimate");
        assert_eq!(rarity_label("Starlight Rare"), "Starlight Rare");
        assert_eq!(rarity_label("N/A"), "N/A");
    }

    #[test]
    fn widths_cover_header_and_longest_cell() {
        let widths = column_widths(&sample_matches());
        // "Dark Magician Girl", "Starlight Rare", "EDITION", "CONDITION", "120,00 €", "QTY"
        assert_eq!(widths, [18, 14, 7, 9, 8, 3]);
    }

    #[test]
    fn widths_use_remapped_rarity() {
        let mut matches = MatchGroup::new();
        matches.insert(
            "Exodia".to_string(),
            vec![record("Exodia", "Platinum Secret Rare", "1")],
        );
        assert_eq!(column_widths(&matches)[1], "Platinum Secret".len());
    }

    #[test]
    fn table_has_one_block_per_card() {
        let table = format_table(&sample_matches());
        let lines: Vec<&str> = table.lines().collect();

        let border = "+--------------------+----------------+---------+-----------+----------+-----+";
        assert_eq!(
            lines,
            vec![
                border,
                "|        NAME        |     RARITY     | EDITION | CONDITION |  PRICE   | QTY |",
                border,
                "|   Dark Magician    |     Ultra      |   LOB   |    NM     |  5,00 €  |  1  |",
                "| Dark Magician Girl |                |   LOB   |    NM     |  0,20 €  |  1  |",
                border,
                "|      Kuriboh       | Starlight Rare |   LOB   |    NM     | 120,00 € |  1  |",
                border,
            ]
        );
    }

    #[test]
    fn text_report_lists_not_found_cards() {
        let report = SearchReport {
            matches: MatchGroup::new(),
            not_found: vec!["Exodia".to_string(), "Jinzo".to_string()],
            error: None,
        };
        assert_eq!(
            render_text(&report),
            "\nCARDS NOT FOUND:\n  - Exodia\n  - Jinzo\n"
        );
    }

    #[test]
    fn text_report_prints_partial_table_before_error() {
        let mut matches = MatchGroup::new();
        matches.insert(
            "Dark Magician".to_string(),
            vec![record("Dark Magician", "Ultra Rare", "5,00 €")],
        );
        let report = SearchReport {
            matches,
            not_found: Vec::new(),
            error: Some(SearchError::Configuration),
        };

        let text = render_text(&report);
        let table_end = text.rfind('+').unwrap();
        let error_start = text.find("ERROR 400").unwrap();
        assert!(text.contains("Dark Magician"));
        assert!(table_end < error_start);
        assert!(!text.contains("CARDS NOT FOUND"));
    }

    #[test]
    fn empty_report_renders_nothing() {
        assert_eq!(render_text(&SearchReport::default()), "");
    }

    #[test]
    fn json_report_keeps_card_order() {
        let report = SearchReport {
            matches: sample_matches(),
            not_found: vec!["Exodia".to_string()],
            error: Some(SearchError::Upstream { status: Some(502) }),
        };

        let json = render_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["matches"]["Dark Magician"][1]["name"], "Dark Magician Girl");
        assert_eq!(value["matches"]["Kuriboh"][0]["rarity"], "Starlight Rare");
        assert_eq!(value["not_found"][0], "Exodia");
        assert_eq!(value["error"], "ERROR: 502");
        assert!(json.find("Dark Magician").unwrap() < json.find("Kuriboh").unwrap());
    }
}
