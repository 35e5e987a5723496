//! Configuration module for the event-window application.

pub mod analysis;
pub mod events;
pub mod instrument;

mod debug; // Private: files use crate::config::DEBUG_FLAGS
pub use debug::DEBUG_FLAGS;

pub mod persistence;
pub mod plot;

// Re-export commonly used items
pub use analysis::ANALYSIS;
pub use events::{FOMC_EVENT_DATES, fomc_event_dates};
pub use instrument::{INSTRUMENT, YAHOO};
pub use persistence::{PERSISTENCE, price_cache_filename};
pub use plot::PLOT_CONFIG;
