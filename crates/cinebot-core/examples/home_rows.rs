//! Load the four home-screen rows and print them as the webview would
//! receive them.
//!
//! ```sh
//! TMDB_API_KEY=... cargo run --example home_rows
//! ```

use cinebot_core::view::home_view;
use cinebot_core::{init_logging, AppConfig, MiniApp};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    init_logging(config.log_filter.as_deref());

    let launch = std::env::var("TG_LAUNCH_FRAGMENT").ok();
    let (commands, mut host) = mpsc::unbounded_channel();
    let mut app = MiniApp::from_config(config.clone(), launch.as_deref(), commands)?;

    let issued = app.load_home();
    println!("Issued {} category requests", issued);
    app.run_until_idle().await;

    let view = home_view(app.state(), app.bridge().color_scheme(), &config.client.image_base_url);
    println!("{}", serde_json::to_string_pretty(&view)?);

    while let Ok(command) = host.try_recv() {
        println!("host <- {:?}", command);
    }

    Ok(())
}
