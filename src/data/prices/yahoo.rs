use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use serde::Deserialize;

use crate::config::YAHOO;
use crate::data::prices::{PriceProvider, PriceRequest};
use crate::domain::{PriceAdjustment, PriceRecord, PriceSeries};
use crate::utils::time_utils::{date_to_epoch_sec, epoch_sec_to_local_date};

pub const YAHOO_SIGNATURE: &str = "Yahoo Finance API";

// Subset of the v8 chart response we rely on.
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
pub struct ChartMeta {
    pub symbol: String,
    #[serde(default)]
    pub gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
    #[serde(default)]
    pub adjclose: Vec<AdjClose>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
pub struct AdjClose {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

/// Yahoo wants `^` escaped in the path segment.
fn encode_symbol(ticker: &str) -> String {
    ticker.replace('^', "%5E")
}

/// Convert a chart response into a series for `request`.
/// Bars without a close are dropped; other missing fields fall back to the close.
pub fn parse_chart(response: ChartResponse, request: &PriceRequest) -> Result<PriceSeries> {
    if let Some(err) = response.chart.error {
        bail!("Yahoo chart error {}: {}", err.code, err.description);
    }
    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| anyhow!("Yahoo chart response for {} has no result", request.ticker))?;

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adj_close = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .unwrap_or_default();
    let at = |v: &[Option<f64>], i: usize| v.get(i).copied().flatten();

    let mut dropped = 0usize;
    let mut records = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let Some(date) = epoch_sec_to_local_date(ts, result.meta.gmtoffset) else {
            dropped += 1;
            continue;
        };
        if date < request.start || date >= request.end {
            continue;
        }
        let Some(close) = at(&quote.close, i) else {
            dropped += 1;
            continue;
        };
        let record = PriceRecord {
            date,
            open: at(&quote.open, i).unwrap_or(close),
            high: at(&quote.high, i).unwrap_or(close),
            low: at(&quote.low, i).unwrap_or(close),
            close,
            adj_close: at(&adj_close, i).unwrap_or(close),
            volume: at(&quote.volume, i).unwrap_or(0.0),
        };
        records.push(match request.adjustment {
            PriceAdjustment::Unadjusted => record,
            PriceAdjustment::Adjusted => record.adjusted(),
        });
    }

    if dropped > 0 {
        log::warn!(
            "{}: dropped {} bars with no close price",
            result.meta.symbol,
            dropped
        );
    }

    Ok(PriceSeries {
        ticker: request.ticker.clone(),
        start: request.start,
        end: request.end,
        adjustment: request.adjustment,
        records,
    })
}

pub struct YahooChartVersion;

#[async_trait]
impl PriceProvider for YahooChartVersion {
    fn signature(&self) -> &'static str {
        YAHOO_SIGNATURE
    }

    async fn fetch_prices(&self, request: &PriceRequest) -> Result<PriceSeries> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(YAHOO.timeout_ms))
            .user_agent(YAHOO.user_agent)
            .build()?;

        let url = format!("{}/{}", YAHOO.chart_base_url, encode_symbol(&request.ticker));
        log::info!(
            "Fetching {} daily bars from {} to {} ({})...",
            request.ticker,
            request.start,
            request.end,
            request.adjustment
        );

        let response: ChartResponse = client
            .get(&url)
            .query(&[
                ("period1", date_to_epoch_sec(request.start).to_string()),
                ("period2", date_to_epoch_sec(request.end).to_string()),
                ("interval", YAHOO.interval.to_string()),
                ("events", "history".to_string()),
                ("includeAdjustedClose", "true".to_string()),
            ])
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?
            .error_for_status()?
            .json()
            .await
            .context("Failed to decode Yahoo chart response")?;

        let series = parse_chart(response, request)?;
        if series.is_empty() {
            bail!("Yahoo returned no usable bars for {}", request.ticker);
        }
        log::info!("✅ Retrieved {} bars for {}", series.len(), request.ticker);
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    // Three June 2023 sessions (13:30 UTC opens), the middle one without a close.
    const SAMPLE: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "^GSPC", "gmtoffset": -14400},
                "timestamp": [1686576600, 1686663000, 1686749400],
                "indicators": {
                    "quote": [{
                        "open":   [4300.0, 4350.0, 4370.0],
                        "high":   [4340.0, 4375.0, 4391.0],
                        "low":    [4290.0, 4340.0, 4350.0],
                        "close":  [4338.93, null, 4372.59],
                        "volume": [3945670000, 3977510000, 4193450000]
                    }],
                    "adjclose": [{"adjclose": [4338.93, null, 4372.59]}]
                }
            }],
            "error": null
        }
    }"#;

    fn request(adjustment: PriceAdjustment) -> PriceRequest {
        PriceRequest {
            ticker: "^GSPC".into(),
            start: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2023, 7, 1).unwrap(),
            adjustment,
        }
    }

    #[test]
    fn test_parse_chart_drops_bars_without_close() {
        let response: ChartResponse = serde_json::from_str(SAMPLE).unwrap();
        let series = parse_chart(response, &request(PriceAdjustment::Unadjusted)).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(
            series.records[0].date,
            NaiveDate::from_ymd_opt(2023, 6, 12).unwrap()
        );
        assert_eq!(
            series.records[1].date,
            NaiveDate::from_ymd_opt(2023, 6, 14).unwrap()
        );
        assert_eq!(series.records[1].close, 4372.59);
        assert_eq!(series.records[0].volume, 3_945_670_000.0);
    }

    #[test]
    fn test_parse_chart_respects_requested_range() {
        let response: ChartResponse = serde_json::from_str(SAMPLE).unwrap();
        let mut req = request(PriceAdjustment::Unadjusted);
        req.end = NaiveDate::from_ymd_opt(2023, 6, 14).unwrap();
        let series = parse_chart(response, &req).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_parse_chart_reports_provider_error() {
        let body = r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}}"#;
        let response: ChartResponse = serde_json::from_str(body).unwrap();
        let err = parse_chart(response, &request(PriceAdjustment::Unadjusted)).unwrap_err();
        assert!(err.to_string().contains("Not Found"));
    }

    #[test]
    fn test_encode_symbol_escapes_caret() {
        assert_eq!(encode_symbol("^GSPC"), "%5EGSPC");
        assert_eq!(encode_symbol("SPY"), "SPY");
    }
}
