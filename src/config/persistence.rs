//! File persistence and serialization configuration

use crate::domain::PriceAdjustment;

pub struct PriceCacheConfig {
    /// Directory path for storing cached price series
    pub directory: &'static str,
    /// Base filename for cache files (without extension)
    pub filename_without_ext: &'static str,
    /// Current version of the cache serialization format
    pub version: f64,
    /// Maximum age of a cache file before the network is preferred (seconds)
    pub acceptable_age_secs: i64,
}

pub struct PersistenceConfig {
    pub price_cache: PriceCacheConfig,
    /// Where the flattened event panel is written
    pub panel_path: &'static str,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    price_cache: PriceCacheConfig {
        directory: "price_data",
        filename_without_ext: "prices",
        version: 1.0,
        // One week: the requested range is entirely historical
        acceptable_age_secs: 7 * 86_400,
    },
    panel_path: "fomc_event_data.csv",
};

/// Generate a ticker/adjustment specific cache filename
/// Example: "prices_GSPC_unadjusted_v1.bin"
pub fn price_cache_filename(ticker: &str, adjustment: PriceAdjustment) -> String {
    let safe_ticker: String = ticker.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    format!(
        "{}_{}_{}_v{}.bin",
        PERSISTENCE.price_cache.filename_without_ext,
        safe_ticker,
        adjustment,
        PERSISTENCE.price_cache.version
    )
}
