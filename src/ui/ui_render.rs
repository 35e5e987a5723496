use eframe::egui::{CentralPanel, Context, Frame, Margin, RichText, ScrollArea, SidePanel, TopBottomPanel};

use crate::config::{INSTRUMENT, PLOT_CONFIG};
use crate::ui::app::EventWindowApp;
use crate::ui::config::UI_CONFIG;
use crate::ui::styles::UiStyleExt;
use crate::ui::utils::{format_optional_return, section_heading, spaced_separator};

impl EventWindowApp {
    pub(super) fn render_top_panel(&self, ctx: &Context) {
        let top_frame = Frame::new()
            .fill(UI_CONFIG.colors.side_panel)
            .inner_margin(Margin::symmetric(8, 6));
        TopBottomPanel::top("title_panel")
            .frame(top_frame)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading(RichText::new(PLOT_CONFIG.title).color(UI_CONFIG.colors.heading));
                });
            });
    }

    /// Legend title plus per-offset summary. egui_plot legends carry no title.
    pub(super) fn render_side_panel(&self, ctx: &Context) {
        let side_panel_frame = Frame::new()
            .fill(UI_CONFIG.colors.side_panel)
            .inner_margin(Margin::symmetric(8, 4));
        SidePanel::right("legend_panel")
            .min_width(UI_CONFIG.side_panel_min_width)
            .frame(side_panel_frame)
            .show(ctx, |ui| {
                ScrollArea::vertical().show(ui, |ui| {
                    section_heading(ui, PLOT_CONFIG.legend_title);

                    for (curve, &color) in self.study.curves.iter().zip(self.plot_view.colors()) {
                        let color = if curve.is_empty() { UI_CONFIG.colors.empty_curve } else { color };
                        ui.legend_entry(&curve.label, color);
                        ui.metric("n", &curve.n_samples.to_string(), color);
                        ui.metric("Mean", &format_optional_return(curve.mean), color);
                        ui.metric("Mode", &format_optional_return(curve.mode), color);
                        ui.add_space(4.0);
                    }

                    let skipped = self.skipped_offsets();
                    if !skipped.is_empty() {
                        ui.label_warning(format!("Not enough data: {}", skipped.join(", ")));
                    }

                    spaced_separator(ui);
                    ui.label_subheader(INSTRUMENT.display_name);
                    ui.metric("Ticker", &self.study.ticker, UI_CONFIG.colors.label);
                    ui.metric("Events", &self.study.event_row_counts.len().to_string(), UI_CONFIG.colors.label);
                    ui.metric("Panel rows", &self.study.panel.len().to_string(), UI_CONFIG.colors.label);
                });
            });
    }

    pub(super) fn render_central_panel(&self, ctx: &Context) {
        let central_panel_frame = Frame::new().fill(UI_CONFIG.colors.central_panel);
        CentralPanel::default()
            .frame(central_panel_frame)
            .show(ctx, |ui| {
                self.plot_view.show_density_plot(ui, &self.study.curves);
            });
    }
}
