//! Event-window analysis configuration

use crate::analysis::event_window::ReturnBasis;

/// Settings for slicing the price series around each event
pub struct WindowSettings {
    // Calendar days either side of the event date (inclusive) kept in the panel
    pub extraction_half_width_days: i64,
    // How `return` is computed for each row of a window
    pub return_basis: ReturnBasis,
}

/// Settings for the density comparison
pub struct DisplaySettings {
    // Offsets drawn as density curves (narrower than the extraction window)
    pub target_offsets: &'static [i64],
    // Number of evaluation points per density curve
    pub density_grid_points: usize,
    // Grid extends this many bandwidths beyond the sample min/max
    pub density_cut_bandwidths: f64,
}

/// The Master Analysis Configuration
pub struct AnalysisConfig {
    pub window: WindowSettings,
    pub display: DisplaySettings,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    window: WindowSettings {
        extraction_half_width_days: 3,
        return_basis: ReturnBasis::WithinWindow,
    },
    display: DisplaySettings {
        target_offsets: &[-2, -1, 0, 1, 2],
        density_grid_points: 200,
        density_cut_bandwidths: 3.0,
    },
};
