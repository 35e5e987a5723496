//! Plot visualization configuration

use eframe::egui::Color32;

pub struct PlotConfig {
    /// Initial window size in points (width, height)
    pub window_size: [f32; 2],
    // Gradient colors for the density curves, earliest offset first
    pub curve_gradient_colors: &'static [&'static str],
    /// Width of each density curve
    pub curve_line_width: f32,
    /// Reference line drawn at zero return
    pub zero_line_color: Color32,
    pub zero_line_width: f32,
    pub title: &'static str,
    pub x_axis_label: &'static str,
    pub y_axis_label: &'static str,
    pub legend_title: &'static str,
}

pub const PLOT_CONFIG: PlotConfig = PlotConfig {
    window_size: [1000.0, 600.0],
    curve_gradient_colors: &[
        "#1f77b4", // Blue
        "#2ca02c", // Green
        "#ffb703", // Amber
        "#ff7f0e", // Orange
        "#d62728", // Red
    ],
    curve_line_width: 2.0,
    zero_line_color: Color32::BLACK,
    zero_line_width: 1.0,
    title: "S&P 500 Return Distribution (Day -2 to Day 2 around FOMC)",
    x_axis_label: "Daily Return",
    y_axis_label: "Density",
    legend_title: "Days From Event",
};
