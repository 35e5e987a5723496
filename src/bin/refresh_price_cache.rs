use anyhow::{Context, Result};
use event_window::config::{INSTRUMENT, PERSISTENCE};
use event_window::data::prices::cache_file::CacheFile;
use event_window::data::prices::yahoo::YahooChartVersion;
use event_window::data::prices::{PriceProvider, PriceRequest};
use event_window::domain::PriceAdjustment;
use strum::IntoEnumIterator;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    rt.block_on(refresh_price_cache())
}

/// Always goes to the API, then overwrites the local cache of every price
/// adjustment so either can be studied offline.
async fn refresh_price_cache() -> Result<()> {
    let base = PriceRequest::from_config()?;
    for adjustment in PriceAdjustment::iter() {
        let request = PriceRequest {
            adjustment,
            ..base.clone()
        };
        refresh_one(&request).await?;
    }
    Ok(())
}

async fn refresh_one(request: &PriceRequest) -> Result<()> {
    let provider = YahooChartVersion;
    let series = provider
        .fetch_prices(request)
        .await
        .with_context(|| format!("Failed to fetch {} from {}", request.ticker, provider.signature()))?;

    println!(
        "Fetched {} {} bars for {} ({:?} to {:?})",
        series.len(),
        request.adjustment,
        INSTRUMENT.display_name,
        series.first_date(),
        series.last_date()
    );

    let output_path = CacheFile::default_cache_path(&request.ticker, request.adjustment);
    let cache = CacheFile::new(series, PERSISTENCE.price_cache.version);
    cache.save_to_path(&output_path)?;

    println!("✅ Price cache written to {:?}.", output_path);
    Ok(())
}
