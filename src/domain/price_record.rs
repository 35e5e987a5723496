use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which close the provider should report as `close`.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum PriceAdjustment {
    /// Raw exchange close
    #[default]
    Unadjusted,
    /// OHLC scaled by the split/dividend adjustment factor
    Adjusted,
}

/// One trading day for one instrument.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: f64,
}

impl PriceRecord {
    // Rescales OHLC so that `close == adj_close`.
    pub fn adjusted(&self) -> Self {
        if self.close == 0.0 {
            return self.clone();
        }
        let ratio = self.adj_close / self.close;
        Self {
            date: self.date,
            open: self.open * ratio,
            high: self.high * ratio,
            low: self.low * ratio,
            close: self.adj_close,
            adj_close: self.adj_close,
            volume: self.volume,
        }
    }
}

/// Daily history for a single ticker over a requested range.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub ticker: String,
    /// Inclusive
    pub start: NaiveDate,
    /// Exclusive
    pub end: NaiveDate,
    pub adjustment: PriceAdjustment,
    pub records: Vec<PriceRecord>,
}

impl PriceSeries {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }
}
