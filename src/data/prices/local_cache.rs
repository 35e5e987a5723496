use std::path::Path;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;

use crate::config::PERSISTENCE;
use crate::data::prices::cache_file::CacheFile;
use crate::data::prices::yahoo::YAHOO_SIGNATURE;
use crate::data::prices::{PriceProvider, PriceRequest};
use crate::domain::PriceSeries;
use crate::utils::time_utils::how_many_seconds_ago;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// Checks the cache at `path` answers `request` and is recent enough.
pub fn check_cache_validity(
    path: &Path,
    request: &PriceRequest,
    recency_required_secs: i64,
    version_required: f64,
) -> Result<()> {
    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_serde {
        log::info!("Checking validity of local cache at {:?}...", path);
    }
    let cache = CacheFile::load_from_path(path)?;

    // Check version
    if cache.version != version_required {
        bail!(
            "Cache version mismatch: file v{} vs required v{}",
            cache.version,
            version_required
        );
    }

    // Check it holds what we are about to ask for
    if !request.matches(&cache.data) {
        bail!(
            "Cache holds {} {}..{} ({}), expected {} {}..{} ({})",
            cache.data.ticker,
            cache.data.start,
            cache.data.end,
            cache.data.adjustment,
            request.ticker,
            request.start,
            request.end,
            request.adjustment
        );
    }

    // Check recency
    let seconds_ago = how_many_seconds_ago(cache.timestamp_ms);
    if seconds_ago > recency_required_secs {
        bail!(
            "Cache too old: created {} seconds ago (limit: {} seconds)",
            seconds_ago,
            recency_required_secs
        );
    }

    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_serde {
        log::info!(
            "✅ Cache valid: v{}, {}s old (limit {}s), {} bars",
            cache.version,
            seconds_ago,
            recency_required_secs,
            cache.data.len()
        );
    }

    Ok(())
}

/// Write a freshly downloaded series to the binary cache.
/// Series that came from the cache itself are not rewritten.
pub fn write_price_cache_locally(signature: &'static str, series: &PriceSeries) -> Result<()> {
    if signature != YAHOO_SIGNATURE {
        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_serde {
            log::info!("Skipping cache write (data not from {})", YAHOO_SIGNATURE);
        }
        return Ok(());
    }

    let path = CacheFile::default_cache_path(&series.ticker, series.adjustment);
    CacheFile::new(series.clone(), PERSISTENCE.price_cache.version).save_to_path(&path)?;
    log::info!("✅ Price cache written: {}", path.display());
    Ok(())
}

/// Async wrapper for write_price_cache_locally
pub async fn write_price_cache_async(signature: &'static str, series: PriceSeries) -> Result<()> {
    tokio::task::spawn_blocking(move || write_price_cache_locally(signature, &series))
        .await
        .context("Cache write task panicked")?
}

pub struct LocalCacheVersion;

#[async_trait]
impl PriceProvider for LocalCacheVersion {
    fn signature(&self) -> &'static str {
        "Local Cache"
    }

    async fn fetch_prices(&self, request: &PriceRequest) -> Result<PriceSeries> {
        let full_path = CacheFile::default_cache_path(&request.ticker, request.adjustment);

        #[cfg(debug_assertions)]
        let start_time = DEBUG_FLAGS.print_serde.then(|| {
            log::info!("Reading cache from: {:?}...", full_path);
            std::time::Instant::now()
        });

        let cache = tokio::task::spawn_blocking(move || CacheFile::load_from_path(&full_path))
            .await
            .context("Deserialization task panicked")?
            .context("Failed to load cache file")?;

        if !request.matches(&cache.data) {
            bail!("Cached series does not match request for {}", request.ticker);
        }

        #[cfg(debug_assertions)]
        if let Some(start) = start_time {
            log::info!(
                "✅ Cache loaded: {} bars in {:.2}s",
                cache.data.len(),
                start.elapsed().as_secs_f64()
            );
        }

        Ok(cache.data)
    }
}
