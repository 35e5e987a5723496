// Async code to run in main before the window opens

use anyhow::Result;

use crate::Cli;
use crate::config::PERSISTENCE;
use crate::data::prices::cache_file::CacheFile;
use crate::data::prices::local_cache::{LocalCacheVersion, check_cache_validity};
use crate::data::prices::yahoo::YahooChartVersion;
use crate::data::prices::{PriceProvider, PriceRequest, get_price_series_async};
use crate::domain::PriceSeries;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// Provider order: a valid cache is used first unless the user prefers the API;
/// an invalid cache leaves the API as the only choice.
pub fn provider_chain(request: &PriceRequest, args: &Cli) -> Vec<Box<dyn PriceProvider>> {
    let cache_path = CacheFile::default_cache_path(&request.ticker, request.adjustment);
    match (
        args.prefer_api,
        check_cache_validity(
            &cache_path,
            request,
            PERSISTENCE.price_cache.acceptable_age_secs,
            PERSISTENCE.price_cache.version,
        ),
    ) {
        (false, Ok(_)) => vec![Box::new(LocalCacheVersion), Box::new(YahooChartVersion)], // local first
        (true, Ok(_)) => vec![Box::new(YahooChartVersion), Box::new(LocalCacheVersion)], // API first
        (_, Err(e)) => {
            log::info!("Local price cache not usable: {:#}", e);
            vec![Box::new(YahooChartVersion)] // API only
        }
    }
}

/// Fetch the configured price history. Failure of every provider is fatal to the run.
pub async fn fetch_price_series(
    request: &PriceRequest,
    args: &Cli,
) -> Result<(PriceSeries, &'static str)> {
    let providers = provider_chain(request, args);
    let (series, signature) = get_price_series_async(&providers, request).await?;

    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_serde {
        log::info!(
            "Successfully retrieved price data using: {} ({:?} to {:?}).",
            signature,
            series.first_date(),
            series.last_date()
        );
    }
    Ok((series, signature))
}
