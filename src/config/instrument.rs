//! Instrument and data-provider configuration.

use crate::domain::PriceAdjustment;

/// The single instrument under study and the history requested for it.
pub struct InstrumentConfig {
    /// Provider symbol
    pub ticker: &'static str,
    /// Human-readable name used in titles
    pub display_name: &'static str,
    /// First date requested (inclusive), `(year, month, day)`
    pub start: (i32, u32, u32),
    /// Last date requested (exclusive), `(year, month, day)`
    pub end: (i32, u32, u32),
    pub adjustment: PriceAdjustment,
}

pub const INSTRUMENT: InstrumentConfig = InstrumentConfig {
    ticker: "^GSPC",
    display_name: "S&P 500",
    start: (2018, 1, 1),
    end: (2025, 5, 28),
    adjustment: PriceAdjustment::Unadjusted,
};

/// Configuration for the Yahoo Finance chart endpoint
pub struct YahooConfig {
    pub chart_base_url: &'static str,
    pub interval: &'static str,
    pub timeout_ms: u64,
    // Yahoo rejects requests without a browser-like agent
    pub user_agent: &'static str,
}

pub const YAHOO: YahooConfig = YahooConfig {
    chart_base_url: "https://query1.finance.yahoo.com/v8/finance/chart",
    interval: "1d",
    timeout_ms: 30_000,
    user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)",
};
