// Event-window extraction and return-distribution analysis
pub mod density;
pub mod event_window;

// Re-export commonly used types
pub use density::{DensityCurve, OffsetSample, display_samples, estimate_curves};
pub use event_window::{
    EventWindow, ReturnBasis, WindowError, WindowRow, extract, extract_windows, extract_with_basis,
};
