#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use eframe::NativeOptions;
use tokio::runtime::Runtime;

#[cfg(debug_assertions)]
use event_window::config::DEBUG_FLAGS;
use event_window::config::{INSTRUMENT, PERSISTENCE, PLOT_CONFIG, fomc_event_dates};
use event_window::data::prices::local_cache::write_price_cache_async;
use event_window::models::panel::{ColumnLabel, fields};
use event_window::{Cli, EventStudy, PriceRequest, fetch_price_series, run_app, write_panel_csv};

const PREVIEW_ROWS: usize = 5;

fn main() -> Result<()> {
    // A. Init Logging
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {:?}", panic_info);
    }));
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    // C. Price Loading (Blocking)
    let request = PriceRequest::from_config()?;
    let rt = Runtime::new().context("Failed to create Tokio runtime")?;
    let (series, signature) = rt
        .block_on(fetch_price_series(&request, &args))
        .with_context(|| format!("Could not obtain prices for {}", request.ticker))?;
    log::info!(
        "📈 {} daily bars for {} from {}",
        series.len(),
        INSTRUMENT.display_name,
        signature
    );

    // D. Background Cache Write
    let cache_series = series.clone();
    let cache_write = rt.spawn(async move {
        if let Err(e) = write_price_cache_async(signature, cache_series).await {
            log::error!("⚠️  Failed to write cache: {:#}", e);
        }
    });

    // E. Windows, panel and densities
    let events = fomc_event_dates()?;
    let study = EventStudy::build(&series, &events)?;

    println!("Columns: {:?}", study.panel.columns);
    let preview_labels = [
        ColumnLabel::derived(fields::DATE),
        ColumnLabel::derived(fields::DAYS_FROM_EVENT),
        ColumnLabel::derived(fields::RETURN),
    ];
    println!("{}", study.panel.preview(&preview_labels, PREVIEW_ROWS)?);

    // F. Persist the panel
    let panel_path = Path::new(PERSISTENCE.panel_path);
    log::info!("💾 Saving event panel ({} rows)...", study.panel.len());
    write_panel_csv(&study.panel, panel_path)?;
    log::info!("✅ Event panel saved to {}", panel_path.display());

    // Let the cache write finish before the runtime is handed to the UI thread
    if let Err(e) = rt.block_on(cache_write) {
        log::error!("⚠️  Cache write task failed: {}", e);
    }

    if args.headless {
        return Ok(());
    }

    // G. Run Native App
    let options = NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size(PLOT_CONFIG.window_size)
            .with_title(PLOT_CONFIG.title),
        ..Default::default()
    };

    eframe::run_native(
        PLOT_CONFIG.title,
        options,
        Box::new(move |cc| Ok(run_app(cc, study))),
    )
    .map_err(|e| anyhow!("Plot window failed: {}", e))?;

    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_shutdown {
        log::info!("Plot window closed");
    }
    Ok(())
}
