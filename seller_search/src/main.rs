//! Seller Search - Cardmarket storefront lookup
//!
//! Looks up a list of cards in one seller's Singles offers and prints the
//! matching listings as a table, followed by the cards that were not found.

use clap::Parser;
use seller_search::input::load_queries;
use seller_search::report::{render_json, render_text};
use seller_search::{
    CardmarketClient, ClientConfig, Game, ProgressReporter, ProgressState, Searcher, Storefront,
    TokioPause,
};
use std::io::Write;
use std::sync::Arc;

/// Search a Cardmarket seller's singles offers for a list of cards
#[derive(Parser, Debug)]
#[command(name = "seller_search")]
#[command(version, about, long_about = None)]
struct Args {
    /// Game catalog: Y = YuGiOh, M = Magic, P = Pokemon
    game: String,

    /// Cardmarket user name of the seller
    seller: String,

    /// A card name, or a file with one card name per line
    card_or_file: String,

    /// Print the results as JSON instead of a table
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Do not show the live progress display
    #[arg(short, long, default_value_t = false)]
    quiet: bool,

    /// Site root to search instead of cardmarket.com
    #[arg(long, hide = true)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout belongs to the progress display and the report.
    // Set RUST_LOG=seller_search=debug to see every request.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let game: Game = match args.game.parse() {
        Ok(game) => game,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let queries = match load_queries(&args.card_or_file) {
        Ok(queries) => queries,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let client = match CardmarketClient::new(&ClientConfig::default()) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let mut storefront = Storefront::new(game, args.seller.as_str());
    if let Some(base_url) = args.base_url {
        storefront = storefront.with_base_url(base_url);
    }

    let progress = Arc::new(ProgressState::new(queries.len()));
    let reporter = if args.quiet || args.json {
        None
    } else {
        println!();
        Some(ProgressReporter::spawn(Arc::clone(&progress)))
    };

    let report = Searcher::new(&client, &TokioPause, &storefront, progress)
        .run(&queries)
        .await;

    // The display must be gone before the report is printed
    if let Some(reporter) = reporter {
        reporter.stop().await;
    }

    if args.json {
        match render_json(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log::error!("Failed to serialize report: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", render_text(&report));
    }

    let _ = std::io::stdout().flush();
    std::process::exit(report.exit_code());
}
