#![allow(clippy::const_is_empty)]
#![allow(clippy::collapsible_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod models;
pub mod ui;
pub mod utils;

// The study pipeline
pub mod engine;

// Re-export commonly used types
pub use data::{PriceRequest, fetch_price_series, write_panel_csv};
pub use domain::{PriceRecord, PriceSeries};
pub use engine::EventStudy;
pub use models::FlatPanel;
pub use ui::EventWindowApp;

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Use API as primary source instead of the local cache
    #[arg(long, default_value_t = false)]
    pub prefer_api: bool,

    /// Write the panel file and exit without opening the plot window
    #[arg(long, default_value_t = false)]
    pub headless: bool,
}

/// Creates the plot window app for a finished study.
pub fn run_app(cc: &eframe::CreationContext, study: EventStudy) -> Box<dyn eframe::App> {
    let app = ui::EventWindowApp::new(cc, study);
    Box::new(app)
}
