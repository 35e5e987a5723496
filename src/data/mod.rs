// Data loading, caching, and persistence
pub mod panel_sink;
pub mod pre_main_async;
pub mod prices;

// Re-export commonly used types
pub use panel_sink::write_panel_csv;
pub use pre_main_async::fetch_price_series;
pub use prices::{PriceProvider, PriceRequest};
