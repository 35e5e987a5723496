use std::fmt;

use chrono::{Duration, NaiveDate};
use itertools::{Itertools, MinMaxResult};

use crate::config::ANALYSIS;
use crate::domain::PriceRecord;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// Where the previous close for a row's return comes from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, strum_macros::Display)]
pub enum ReturnBasis {
    /// Previous row of the same event window. The first row of every window
    /// has no return, even when an earlier trading day exists in the series.
    #[default]
    WithinWindow,
    /// Previous row of the full series, computed before slicing.
    FullSeries,
}

/// A price record placed relative to one event.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowRow {
    pub record: PriceRecord,
    pub event_date: NaiveDate,
    /// Calendar days (not trading days) from `event_date`
    pub days_from_event: i64,
    /// Simple return against the previous close, `None` where undefined
    pub ret: Option<f64>,
}

/// All rows contributed by a single event, in date order.
#[derive(Debug, Clone, PartialEq)]
pub struct EventWindow {
    pub event_date: NaiveDate,
    pub rows: Vec<WindowRow>,
}

impl EventWindow {
    /// (first, last) offset present in this window
    pub fn offset_span(&self) -> Option<(i64, i64)> {
        match self.rows.iter().map(|r| r.days_from_event).minmax() {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(x) => Some((x, x)),
            MinMaxResult::MinMax(lo, hi) => Some((lo, hi)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WindowError {
    /// Dates must be strictly increasing; `index` is the first offending record
    UnsortedPrices {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },
}

impl fmt::Display for WindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowError::UnsortedPrices {
                index,
                previous,
                current,
            } => write!(
                f,
                "Price series is not strictly increasing by date: record {} ({}) follows {}",
                index, current, previous
            ),
        }
    }
}

impl std::error::Error for WindowError {}

/// Slice `prices` around every event and flatten into one panel, using the
/// within-window return basis.
pub fn extract(
    prices: &[PriceRecord],
    events: &[NaiveDate],
) -> Result<Vec<WindowRow>, WindowError> {
    extract_with_basis(prices, events, ReturnBasis::WithinWindow)
}

pub fn extract_with_basis(
    prices: &[PriceRecord],
    events: &[NaiveDate],
    basis: ReturnBasis,
) -> Result<Vec<WindowRow>, WindowError> {
    Ok(extract_windows(prices, events, basis)?
        .into_iter()
        .flat_map(|w| w.rows)
        .collect())
}

/// One `EventWindow` per entry of `events`, in list order (empty windows included).
pub fn extract_windows(
    prices: &[PriceRecord],
    events: &[NaiveDate],
    basis: ReturnBasis,
) -> Result<Vec<EventWindow>, WindowError> {
    ensure_strictly_increasing(prices)?;

    let half_width = Duration::days(ANALYSIS.window.extraction_half_width_days);
    let series_returns = match basis {
        ReturnBasis::FullSeries => Some(pct_change(prices)),
        ReturnBasis::WithinWindow => None,
    };

    let windows = events
        .iter()
        .map(|&event_date| {
            let (start, end) =
                window_bounds(prices, event_date - half_width, event_date + half_width);
            let slice = &prices[start..end];
            let returns = match &series_returns {
                Some(all) => all[start..end].to_vec(),
                None => pct_change(slice),
            };

            let rows = slice
                .iter()
                .zip(returns)
                .map(|(record, ret)| WindowRow {
                    record: record.clone(),
                    event_date,
                    days_from_event: (record.date - event_date).num_days(),
                    ret,
                })
                .collect();

            EventWindow { event_date, rows }
        })
        .collect::<Vec<_>>();

    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_window_summary {
        for window in &windows {
            match window.offset_span() {
                Some((lo, hi)) => log::info!(
                    "Event {}: {} rows, offsets {}..={}",
                    window.event_date,
                    window.rows.len(),
                    lo,
                    hi
                ),
                None => log::info!("Event {}: no price data in window", window.event_date),
            }
        }
    }

    Ok(windows)
}

fn ensure_strictly_increasing(prices: &[PriceRecord]) -> Result<(), WindowError> {
    match prices
        .iter()
        .tuple_windows()
        .position(|(prev, cur)| cur.date <= prev.date)
    {
        Some(i) => Err(WindowError::UnsortedPrices {
            index: i + 1,
            previous: prices[i].date,
            current: prices[i + 1].date,
        }),
        None => Ok(()),
    }
}

/// Half-open index range of records with `first <= date <= last`.
/// Requires `prices` sorted by date.
fn window_bounds(prices: &[PriceRecord], first: NaiveDate, last: NaiveDate) -> (usize, usize) {
    let start = prices.partition_point(|r| r.date < first);
    let end = prices.partition_point(|r| r.date <= last);
    (start, end.max(start))
}

/// `close[i] / close[i - 1] - 1`, with `None` for the first element.
fn pct_change(records: &[PriceRecord]) -> Vec<Option<f64>> {
    std::iter::once(None)
        .chain(
            records
                .iter()
                .tuple_windows()
                .map(|(prev, cur)| Some(cur.close / prev.close - 1.0).filter(|r| !r.is_nan())),
        )
        .take(records.len())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(s: &str, close: f64) -> PriceRecord {
        PriceRecord {
            date: date(s),
            open: close,
            high: close,
            low: close,
            close,
            adj_close: close,
            volume: 0.0,
        }
    }

    /// 2023-06-12 (Mon) .. 2023-06-20 (Tue), weekend skipped
    fn june_2023() -> Vec<PriceRecord> {
        vec![
            record("2023-06-12", 100.0),
            record("2023-06-13", 101.0),
            record("2023-06-14", 99.0),
            record("2023-06-15", 102.0),
            record("2023-06-16", 103.0),
            record("2023-06-19", 104.0),
            record("2023-06-20", 105.0),
        ]
    }

    /// Every calendar day in [start, start + days)
    fn daily(start: &str, days: i64) -> Vec<PriceRecord> {
        let first = date(start);
        (0..days)
            .map(|i| {
                let mut r = record(start, 100.0 + i as f64);
                r.date = first + Duration::days(i);
                r
            })
            .collect()
    }

    #[test]
    fn test_concrete_june_2023_event() {
        let rows = extract(&june_2023(), &[date("2023-06-14")]).unwrap();

        assert_eq!(rows.len(), 5);
        let offsets: Vec<i64> = rows.iter().map(|r| r.days_from_event).collect();
        assert_eq!(offsets, vec![-2, -1, 0, 1, 2]);
        assert_eq!(rows[0].record.date, date("2023-06-12"));
        assert_eq!(rows[4].record.date, date("2023-06-16"));
        assert!(rows.iter().all(|r| r.event_date == date("2023-06-14")));

        assert!(rows[0].ret.is_none());
        assert!((rows[1].ret.unwrap() - 0.01).abs() < 1e-12);
        assert!((rows[2].ret.unwrap() - (99.0 / 101.0 - 1.0)).abs() < 1e-12);
        assert!((rows[2].ret.unwrap() + 0.0198).abs() < 1e-4);
        assert!((rows[3].ret.unwrap() - 0.0303).abs() < 1e-4);
        assert!((rows[4].ret.unwrap() - 0.0098).abs() < 1e-4);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let prices = daily("2023-01-01", 60);
        let events = [date("2023-01-10"), date("2023-02-01"), date("2023-01-12")];
        let a = extract(&prices, &events).unwrap();
        let b = extract(&prices, &events).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_gapless_window_has_seven_rows() {
        let prices = daily("2023-01-01", 30);
        let rows = extract(&prices, &[date("2023-01-15")]).unwrap();
        assert_eq!(rows.len(), 7);
        assert_eq!(rows.first().unwrap().days_from_event, -3);
        assert_eq!(rows.last().unwrap().days_from_event, 3);
    }

    #[test]
    fn test_offsets_stay_within_extraction_window() {
        let prices = daily("2022-12-01", 120);
        let events: Vec<NaiveDate> = (0..10)
            .map(|i| date("2022-12-05") + Duration::days(i * 11))
            .collect();
        let rows = extract(&prices, &events).unwrap();
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|r| (-3..=3).contains(&r.days_from_event)));
    }

    #[test]
    fn test_only_first_row_of_each_window_lacks_return() {
        let prices = june_2023();
        let events = [date("2023-06-14"), date("2023-06-19")];
        let rows = extract(&prices, &events).unwrap();

        for (_, group) in &rows.iter().chunk_by(|r| r.event_date) {
            let group: Vec<_> = group.collect();
            let min_offset = group.iter().map(|r| r.days_from_event).min().unwrap();
            for row in &group {
                assert_eq!(row.ret.is_none(), row.days_from_event == min_offset);
            }
            assert!(
                group
                    .windows(2)
                    .all(|w| w[0].days_from_event <= w[1].days_from_event)
            );
        }
    }

    #[test]
    fn test_events_do_not_leak_into_each_other() {
        let prices = daily("2023-03-01", 90);
        let a = date("2023-03-10");
        let b = date("2023-03-12"); // overlaps a
        let c = date("2023-04-20");

        let with_b = extract(&prices, &[a, b, c]).unwrap();
        let without_b = extract(&prices, &[a, c]).unwrap();

        let kept: Vec<_> = with_b.into_iter().filter(|r| r.event_date != b).collect();
        assert_eq!(kept, without_b);
    }

    #[test]
    fn test_overlapping_windows_duplicate_days() {
        let prices = june_2023();
        let rows = extract(&prices, &[date("2023-06-14"), date("2023-06-16")]).unwrap();
        let on_15th: Vec<_> = rows
            .iter()
            .filter(|r| r.record.date == date("2023-06-15"))
            .collect();
        assert_eq!(on_15th.len(), 2);
        assert_eq!(on_15th[0].days_from_event, 1);
        assert_eq!(on_15th[1].days_from_event, -1);
        // Second window starts at 06-13, so its first return is undefined there
        let second_block: Vec<_> = rows
            .iter()
            .filter(|r| r.event_date == date("2023-06-16"))
            .collect();
        assert_eq!(second_block[0].record.date, date("2023-06-13"));
        assert!(second_block[0].ret.is_none());
    }

    #[test]
    fn test_repeated_event_contributes_two_identical_blocks() {
        let d = date("2023-06-14");
        let rows = extract(&june_2023(), &[d, d]).unwrap();
        assert_eq!(rows.len(), 10);

        let (first, second) = rows.split_at(5);
        assert_eq!(first, second);
        for block in [first, second] {
            assert!(block[0].ret.is_none());
            assert!(block[1..].iter().all(|r| r.ret.is_some()));
            assert_eq!(block[0].days_from_event, -2);
            assert_eq!(block[4].days_from_event, 2);
        }
    }

    #[test]
    fn test_empty_inputs_give_empty_panel() {
        assert!(extract(&june_2023(), &[]).unwrap().is_empty());
        assert!(extract(&[], &[date("2023-06-14")]).unwrap().is_empty());
    }

    #[test]
    fn test_event_outside_series_contributes_nothing() {
        let windows = extract_windows(
            &june_2023(),
            &[date("2019-01-01"), date("2023-06-14")],
            ReturnBasis::WithinWindow,
        )
        .unwrap();
        assert_eq!(windows.len(), 2);
        assert!(windows[0].rows.is_empty());
        assert_eq!(windows[0].offset_span(), None);
        assert_eq!(windows[1].offset_span(), Some((-2, 2)));
    }

    #[test]
    fn test_unsorted_prices_are_rejected() {
        let mut prices = june_2023();
        prices.swap(2, 3);
        let err = extract(&prices, &[date("2023-06-14")]).unwrap_err();
        assert_eq!(
            err,
            WindowError::UnsortedPrices {
                index: 3,
                previous: date("2023-06-15"),
                current: date("2023-06-14"),
            }
        );
    }

    #[test]
    fn test_duplicate_dates_are_rejected() {
        let mut prices = june_2023();
        prices.insert(1, record("2023-06-12", 100.5));
        assert!(matches!(
            extract(&prices, &[date("2023-06-14")]),
            Err(WindowError::UnsortedPrices { index: 1, .. })
        ));
    }

    #[test]
    fn test_full_series_basis_fills_first_row() {
        let prices = june_2023();
        let rows =
            extract_with_basis(&prices, &[date("2023-06-16")], ReturnBasis::FullSeries).unwrap();
        // Window is 06-13..=06-19; 06-13 return uses 06-12's close
        assert_eq!(rows[0].record.date, date("2023-06-13"));
        assert!((rows[0].ret.unwrap() - 0.01).abs() < 1e-12);
        assert!(rows.iter().all(|r| r.ret.is_some()));

        // Globally first record still has no return
        let rows =
            extract_with_basis(&prices, &[date("2023-06-12")], ReturnBasis::FullSeries).unwrap();
        assert!(rows[0].ret.is_none());
    }
}
