use colorgrad::Gradient;
use eframe::egui::{self, Color32};
use egui_plot::{AxisHints, Corner, HPlacement, Legend, Plot};

use crate::analysis::density::DensityCurve;
use crate::config::plot::PLOT_CONFIG;
use crate::ui::config::UI_CONFIG;
use crate::ui::plot_layers::{DensityCurveLayer, LayerContext, PlotLayer, ZeroLineLayer};

pub struct PlotView {
    colors: Vec<Color32>,
}

impl PlotView {
    pub fn new(n_curves: usize) -> Self {
        Self {
            colors: curve_colors(n_curves),
        }
    }

    pub fn colors(&self) -> &[Color32] {
        &self.colors
    }

    pub fn show_density_plot(&self, ui: &mut egui::Ui, curves: &[DensityCurve]) {
        let legend = Legend::default().position(Corner::RightTop);

        Plot::new("density_plot")
            .legend(legend)
            .custom_x_axes(vec![create_x_axis()])
            .custom_y_axes(vec![create_y_axis()])
            .show_grid(true)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show(ui, |plot_ui| {
                let ctx = LayerContext {
                    curves,
                    colors: &self.colors,
                };

                // Back to front
                let layers: Vec<Box<dyn PlotLayer>> =
                    vec![Box::new(ZeroLineLayer), Box::new(DensityCurveLayer)];

                for layer in layers {
                    layer.render(plot_ui, &ctx);
                }
            });
    }
}

/// Evenly spaced samples of the configured gradient, earliest offset first.
pub fn curve_colors(n: usize) -> Vec<Color32> {
    let grad = match colorgrad::GradientBuilder::new()
        .html_colors(PLOT_CONFIG.curve_gradient_colors)
        .build::<colorgrad::CatmullRomGradient>()
    {
        Ok(grad) => grad,
        Err(e) => {
            log::error!("Invalid curve gradient colors: {}", e);
            return vec![UI_CONFIG.colors.empty_curve; n];
        }
    };

    (0..n)
        .map(|i| {
            let t = if n > 1 { i as f32 / (n - 1) as f32 } else { 0.0 };
            to_egui_color(grad.at(t))
        })
        .collect()
}

fn to_egui_color(colorgrad_color: colorgrad::Color) -> Color32 {
    let rgba8 = colorgrad_color.to_rgba8();
    Color32::from_rgba_unmultiplied(rgba8[0], rgba8[1], rgba8[2], 255)
}

fn create_x_axis() -> AxisHints<'static> {
    AxisHints::new_x()
        .label(PLOT_CONFIG.x_axis_label)
        .formatter(|grid_mark, _range| format!("{:.1}%", grid_mark.value * 100.0))
}

fn create_y_axis() -> AxisHints<'static> {
    AxisHints::new_y()
        .label(PLOT_CONFIG.y_axis_label)
        .formatter(|grid_mark, _range| format!("{:.0}", grid_mark.value))
        .placement(HPlacement::Left)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_colors_span_gradient_ends() {
        let colors = curve_colors(5);
        assert_eq!(colors.len(), 5);
        let close = |a: Color32, b: Color32| {
            a.to_array()
                .iter()
                .zip(b.to_array())
                .all(|(x, y)| x.abs_diff(y) <= 1)
        };
        // First and last samples land on the gradient endpoints
        assert!(close(colors[0], Color32::from_rgb(0x1f, 0x77, 0xb4)));
        assert!(close(colors[4], Color32::from_rgb(0xd6, 0x27, 0x28)));
        assert_ne!(colors[1], colors[3]);
    }

    #[test]
    fn test_curve_colors_single_and_empty() {
        assert_eq!(curve_colors(1).len(), 1);
        assert!(curve_colors(0).is_empty());
    }
}
