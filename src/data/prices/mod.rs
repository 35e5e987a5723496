pub mod cache_file;
pub mod local_cache;
pub mod yahoo;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::config::INSTRUMENT;
use crate::domain::{PriceAdjustment, PriceSeries};
use crate::utils::time_utils::ymd;

/// What to fetch: one ticker, daily bars, `start` inclusive, `end` exclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRequest {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub adjustment: PriceAdjustment,
}

impl PriceRequest {
    /// The request described by `config::INSTRUMENT`.
    pub fn from_config() -> Result<Self> {
        Ok(Self {
            ticker: INSTRUMENT.ticker.to_string(),
            start: ymd(INSTRUMENT.start)?,
            end: ymd(INSTRUMENT.end)?,
            adjustment: INSTRUMENT.adjustment,
        })
    }

    /// True if `series` answers exactly this request.
    pub fn matches(&self, series: &PriceSeries) -> bool {
        series.ticker == self.ticker
            && series.start == self.start
            && series.end == self.end
            && series.adjustment == self.adjustment
    }
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    // Either return the series OR an anyhow::Error
    async fn fetch_prices(&self, request: &PriceRequest) -> Result<PriceSeries>;

    /// A unique identifier for this implementation (so that afterwards we know which one we used).
    fn signature(&self) -> &'static str;
}

/// Try each provider in turn; the first success wins.
pub async fn get_price_series_async(
    providers: &[Box<dyn PriceProvider>],
    request: &PriceRequest,
) -> Result<(PriceSeries, &'static str)> {
    for provider in providers {
        match provider.fetch_prices(request).await {
            Ok(series) => return Ok((series, provider.signature())),
            Err(e) => {
                log::warn!("⚠️  {} failed: {:#}", provider.signature(), e);
                // Continue to the next provider
            }
        }
    }
    Err(anyhow!(
        "All price providers failed for {} ({} to {})",
        request.ticker,
        request.start,
        request.end
    ))
}
