use eframe::egui::Color32;
use egui_plot::{Line, LineStyle, PlotPoints, PlotUi, VLine};

use crate::analysis::density::DensityCurve;
use crate::config::plot::PLOT_CONFIG;

/// Context passed to every layer during rendering.
pub struct LayerContext<'a> {
    pub curves: &'a [DensityCurve],
    /// One color per curve, same order
    pub colors: &'a [Color32],
}

/// A standardized layer in the plot stack.
pub trait PlotLayer {
    fn render(&self, ui: &mut PlotUi, ctx: &LayerContext);
}

// ============================================================================
// 1. ZERO RETURN REFERENCE
// ============================================================================
pub struct ZeroLineLayer;

impl PlotLayer for ZeroLineLayer {
    fn render(&self, plot_ui: &mut PlotUi, _ctx: &LayerContext) {
        plot_ui.vline(
            VLine::new("Zero Return", 0.0)
                .color(PLOT_CONFIG.zero_line_color)
                .width(PLOT_CONFIG.zero_line_width)
                .style(LineStyle::dashed_loose()),
        );
    }
}

// ============================================================================
// 2. DENSITY CURVES (one per offset)
// ============================================================================
pub struct DensityCurveLayer;

impl PlotLayer for DensityCurveLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        for (curve, color) in ctx.curves.iter().zip(ctx.colors) {
            // Offsets without enough returns keep their color slot but draw nothing
            if curve.is_empty() {
                continue;
            }
            let points = PlotPoints::new(curve.points.clone());
            plot_ui.line(
                Line::new(curve.label.clone(), points)
                    .color(*color)
                    .width(PLOT_CONFIG.curve_line_width),
            );
        }
    }
}
