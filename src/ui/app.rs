use eframe::{Frame, egui};

use crate::engine::EventStudy;
use crate::ui::ui_plot_view::PlotView;
use crate::ui::utils::setup_custom_visuals;

/// Read-only viewer for a finished event study.
pub struct EventWindowApp {
    pub(crate) study: EventStudy,
    pub(crate) plot_view: PlotView,
}

impl EventWindowApp {
    pub fn new(cc: &eframe::CreationContext<'_>, study: EventStudy) -> Self {
        setup_custom_visuals(&cc.egui_ctx);
        let plot_view = PlotView::new(study.curves.len());
        Self { study, plot_view }
    }

    /// Offsets whose density could not be estimated.
    pub(crate) fn skipped_offsets(&self) -> Vec<&str> {
        self.study
            .curves
            .iter()
            .filter(|c| c.is_empty())
            .map(|c| c.label.as_str())
            .collect()
    }
}

impl eframe::App for EventWindowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.render_top_panel(ctx);
        self.render_side_panel(ctx);
        self.render_central_panel(ctx);
    }
}
