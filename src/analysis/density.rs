use rayon::prelude::*;
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;

use crate::config::ANALYSIS;
use crate::models::panel::{ColumnLabel, FlatPanel, PanelError, fields};
use crate::utils::maths_utils;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// Non-missing returns observed at one offset from the event day.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetSample {
    pub offset: i64,
    pub label: String,
    pub values: Vec<f64>,
}

pub fn offset_label(offset: i64) -> String {
    format!("Day {}", offset)
}

/// Group the panel's returns by `days_from_event` for each target offset,
/// dropping missing returns. Offsets with nothing left give an empty sample.
pub fn display_samples(panel: &FlatPanel, offsets: &[i64]) -> Result<Vec<OffsetSample>, PanelError> {
    let offset_label_col = ColumnLabel::derived(fields::DAYS_FROM_EVENT);
    let offset_col = panel.position(&offset_label_col)?;
    let return_col = panel.position(&ColumnLabel::derived(fields::RETURN))?;

    let observations = panel
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let offset = row[offset_col]
                .as_integer()
                .ok_or_else(|| PanelError::UnexpectedCell {
                    column: offset_label_col.flatten(),
                    row: i,
                })?;
            Ok((offset, row[return_col].as_number()))
        })
        .collect::<Result<Vec<_>, PanelError>>()?;

    Ok(offsets
        .iter()
        .map(|&offset| OffsetSample {
            offset,
            label: offset_label(offset),
            values: observations
                .iter()
                .filter(|(o, _)| *o == offset)
                .filter_map(|(_, ret)| *ret)
                .filter(|ret| ret.is_finite())
                .collect(),
        })
        .collect())
}

/// Gaussian kernel density estimate of one offset's returns.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityCurve {
    pub offset: i64,
    pub label: String,
    /// `[x, density]`, empty when the sample cannot be smoothed
    pub points: Vec<[f64; 2]>,
    pub bandwidth: Option<f64>,
    pub n_samples: usize,
    pub mean: Option<f64>,
    /// Return at the curve's peak
    pub mode: Option<f64>,
}

impl DensityCurve {
    /// Scott's rule bandwidth (`std * n^(-1/5)`), evaluated on `grid_points`
    /// spanning `cut` bandwidths past either end of the data.
    pub fn estimate(sample: &OffsetSample, grid_points: usize, cut: f64) -> Self {
        let n = sample.values.len();
        let mean = (n > 0).then(|| sample.values.iter().mean());
        let empty = Self {
            offset: sample.offset,
            label: sample.label.clone(),
            points: Vec::new(),
            bandwidth: None,
            n_samples: n,
            mean,
            mode: None,
        };

        if n < 2 {
            return empty;
        }
        let std_dev = sample.values.iter().std_dev();
        let bandwidth = std_dev * (n as f64).powf(-0.2);
        if !bandwidth.is_finite() || bandwidth <= 0.0 {
            return empty;
        }
        let Ok(kernel) = Normal::new(0.0, 1.0) else {
            return empty;
        };

        let (lo, hi) = maths_utils::get_min_max(&sample.values);
        let xs = maths_utils::linspace(lo - cut * bandwidth, hi + cut * bandwidth, grid_points);
        let scale = 1.0 / (n as f64 * bandwidth);
        let ys: Vec<f64> = xs
            .par_iter()
            .map(|&x| {
                scale
                    * sample
                        .values
                        .iter()
                        .map(|&xi| kernel.pdf((x - xi) / bandwidth))
                        .sum::<f64>()
            })
            .collect();

        let mode = maths_utils::argmax(&ys).map(|i| xs[i]);

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_density_stats {
            log::info!(
                "{}: n={} bandwidth={:.5} mode={:?}",
                sample.label,
                n,
                bandwidth,
                mode
            );
        }

        Self {
            points: xs.into_iter().zip(ys).map(|(x, y)| [x, y]).collect(),
            bandwidth: Some(bandwidth),
            mode,
            ..empty
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One curve per sample using the configured grid.
pub fn estimate_curves(samples: &[OffsetSample]) -> Vec<DensityCurve> {
    samples
        .iter()
        .map(|s| {
            DensityCurve::estimate(
                s,
                ANALYSIS.display.density_grid_points,
                ANALYSIS.display.density_cut_bandwidths,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::panel::{Cell, PanelTable, normalize_columns};

    fn panel(rows: &[(i64, Option<f64>)]) -> FlatPanel {
        let mut table = PanelTable::from_window_rows("^GSPC", &[]);
        let offset_col = table
            .labels
            .iter()
            .position(|l| *l == ColumnLabel::derived(fields::DAYS_FROM_EVENT))
            .unwrap();
        let return_col = table
            .labels
            .iter()
            .position(|l| *l == ColumnLabel::derived(fields::RETURN))
            .unwrap();
        let width = table.labels.len();
        table.rows = rows
            .iter()
            .map(|&(offset, ret)| {
                let mut row = vec![Cell::Number(None); width];
                row[offset_col] = Cell::Integer(offset);
                row[return_col] = Cell::Number(ret);
                row
            })
            .collect();
        normalize_columns(table)
    }

    #[test]
    fn test_labels_use_plain_integer_formatting() {
        assert_eq!(offset_label(-2), "Day -2");
        assert_eq!(offset_label(0), "Day 0");
        assert_eq!(offset_label(1), "Day 1");
    }

    #[test]
    fn test_display_samples_filter_and_drop_missing() {
        let flat = panel(&[
            (-3, Some(0.5)),
            (-2, None),
            (-1, Some(0.01)),
            (0, Some(-0.02)),
            (-2, Some(0.03)),
            (-1, None),
            (0, Some(0.04)),
        ]);
        let samples = display_samples(&flat, &[-2, -1, 0, 1, 2]).unwrap();

        assert_eq!(samples.len(), 5);
        assert_eq!(samples[0].label, "Day -2");
        assert_eq!(samples[0].values, vec![0.03]);
        assert_eq!(samples[1].values, vec![0.01]);
        assert_eq!(samples[2].values, vec![-0.02, 0.04]);
        assert!(samples[3].values.is_empty());
        assert!(samples[4].values.is_empty());
        // -3 is extracted but never displayed
        assert!(samples.iter().all(|s| !s.values.contains(&0.5)));
    }

    #[test]
    fn test_display_samples_requires_flat_columns() {
        let flat = FlatPanel {
            columns: vec!["date_".into(), "days_from_event".into(), "return".into()],
            rows: Vec::new(),
        };
        // Unflattened derived names do not satisfy the lookup
        assert_eq!(
            display_samples(&flat, &[0]).unwrap_err(),
            PanelError::MissingColumn("days_from_event_".into())
        );
    }

    #[test]
    fn test_density_integrates_to_one_and_peaks_near_center() {
        let values: Vec<f64> = (0..50).map(|i| (i as f64 - 24.5) / 1000.0).collect();
        let sample = OffsetSample {
            offset: 0,
            label: offset_label(0),
            values,
        };
        let curve = DensityCurve::estimate(&sample, 400, 3.0);

        assert_eq!(curve.points.len(), 400);
        assert_eq!(curve.n_samples, 50);
        let xs: Vec<f64> = curve.points.iter().map(|p| p[0]).collect();
        let ys: Vec<f64> = curve.points.iter().map(|p| p[1]).collect();
        let area = maths_utils::trapezoid(&xs, &ys);
        assert!((area - 1.0).abs() < 0.01, "area was {}", area);
        assert!(curve.mode.unwrap().abs() < 0.002);
        assert!(curve.mean.unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_samples_give_empty_curves() {
        let single = OffsetSample {
            offset: 1,
            label: offset_label(1),
            values: vec![0.01],
        };
        let curve = DensityCurve::estimate(&single, 100, 3.0);
        assert!(curve.is_empty());
        assert_eq!(curve.mean, Some(0.01));

        let constant = OffsetSample {
            values: vec![0.02, 0.02, 0.02],
            ..single.clone()
        };
        assert!(DensityCurve::estimate(&constant, 100, 3.0).is_empty());

        let none = OffsetSample {
            values: Vec::new(),
            ..single
        };
        let curve = DensityCurve::estimate(&none, 100, 3.0);
        assert!(curve.is_empty());
        assert_eq!(curve.mean, None);
    }
}
