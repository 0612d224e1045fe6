//! Run a debounced search against the live TMDB API.
//!
//! ```sh
//! TMDB_API_KEY=... cargo run --example live_search -- "the matrix"
//! ```

use cinebot_core::view::search_view;
use cinebot_core::{init_logging, AppConfig, MiniApp};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    init_logging(config.log_filter.as_deref());

    let query = std::env::args().nth(1).unwrap_or_else(|| "matrix".to_string());
    let (commands, _host) = mpsc::unbounded_channel();
    let mut app = MiniApp::from_config(config.clone(), None, commands)?;

    // Simulate typing one character at a time
    for end in 1..=query.len() {
        if query.is_char_boundary(end) {
            app.set_query(&query[..end]);
        }
    }
    app.run_until_idle().await;

    let view = search_view(app.state(), &config.client.image_base_url, config.page_window);
    if let Some(error) = view.listing.error {
        println!("Search failed: {}", error);
        return Ok(());
    }

    println!("Results for '{}':", view.query);
    for (i, card) in view.listing.items.iter().enumerate() {
        let year = card.year.map(|y| y.to_string()).unwrap_or_else(|| "—".to_string());
        let rating = card
            .rating
            .map(|r| format!("{:.1}", r))
            .unwrap_or_else(|| "—".to_string());
        println!("  {}. {} ({}, {}) [{}]", i + 1, card.title, year, card.kind.as_str(), rating);
    }

    if let Some(pager) = view.listing.pager {
        println!("\nPage {} of {}: {:?}", pager.current, pager.total, pager.pages);
    }

    Ok(())
}
