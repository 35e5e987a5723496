// Domain types and value objects
pub mod price_record;

// Re-export commonly used types
pub use price_record::{PriceAdjustment, PriceRecord, PriceSeries};
