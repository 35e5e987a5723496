use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::analysis::density::{DensityCurve, OffsetSample, display_samples, estimate_curves};
use crate::analysis::event_window::{EventWindow, ReturnBasis, extract_windows};
use crate::config::ANALYSIS;
use crate::domain::PriceSeries;
use crate::models::panel::{FlatPanel, PanelTable, normalize_columns};

/// Everything produced from one price series and one event list.
pub struct EventStudy {
    pub ticker: String,
    /// (event date, rows contributed), in event-list order
    pub event_row_counts: Vec<(NaiveDate, usize)>,
    /// Flattened panel, as persisted
    pub panel: FlatPanel,
    pub samples: Vec<OffsetSample>,
    pub curves: Vec<DensityCurve>,
}

impl EventStudy {
    /// Extract, normalize, filter and smooth with the configured settings.
    pub fn build(series: &PriceSeries, events: &[NaiveDate]) -> Result<Self> {
        Self::build_with(
            series,
            events,
            ANALYSIS.window.return_basis,
            ANALYSIS.display.target_offsets,
        )
    }

    pub fn build_with(
        series: &PriceSeries,
        events: &[NaiveDate],
        basis: ReturnBasis,
        target_offsets: &[i64],
    ) -> Result<Self> {
        let windows = extract_windows(&series.records, events, basis)
            .with_context(|| format!("Failed to extract event windows for {}", series.ticker))?;

        let event_row_counts: Vec<(NaiveDate, usize)> = windows
            .iter()
            .map(|w| (w.event_date, w.rows.len()))
            .collect();
        let empty_events = event_row_counts.iter().filter(|(_, n)| *n == 0).count();
        if empty_events > 0 {
            log::info!(
                "{} of {} events have no price data within their window",
                empty_events,
                events.len()
            );
        }

        let rows: Vec<_> = windows.into_iter().flat_map(|w: EventWindow| w.rows).collect();
        let panel = normalize_columns(PanelTable::from_window_rows(&series.ticker, &rows));

        let samples = display_samples(&panel, target_offsets)
            .context("Failed to select display samples from the event panel")?;
        let curves = estimate_curves(&samples);

        Ok(Self {
            ticker: series.ticker.clone(),
            event_row_counts,
            panel,
            samples,
            curves,
        })
    }
}
