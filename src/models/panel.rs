// ============================================================================
// Panel tables: window rows laid out as (hierarchically labelled) columns
// ============================================================================

use std::fmt;

use chrono::NaiveDate;
use itertools::Itertools;

use crate::analysis::event_window::WindowRow;
use crate::utils::TimeUtils;

/// Field names used as the first level of every column label.
pub mod fields {
    pub const DATE: &str = "date";
    pub const OPEN: &str = "open";
    pub const HIGH: &str = "high";
    pub const LOW: &str = "low";
    pub const CLOSE: &str = "close";
    pub const ADJ_CLOSE: &str = "adj_close";
    pub const VOLUME: &str = "volume";
    pub const EVENT_DATE: &str = "event_date";
    pub const DAYS_FROM_EVENT: &str = "days_from_event";
    pub const RETURN: &str = "return";
}

/// A possibly multi-level column label, outermost level first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnLabel(pub Vec<String>);

impl ColumnLabel {
    /// Field qualified by the instrument it was fetched for.
    pub fn per_ticker(field: &str, ticker: &str) -> Self {
        Self(vec![field.to_string(), ticker.to_string()])
    }

    /// Field computed by the pipeline, with an empty second level.
    pub fn derived(field: &str) -> Self {
        Self(vec![field.to_string(), String::new()])
    }

    /// Every level joined with `_`, then the joined name trimmed. Empty levels
    /// still contribute their separator, so derived fields end in `_`.
    pub fn flatten(&self) -> String {
        self.0.iter().join("_").trim().to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Date(NaiveDate),
    /// `None` is a missing value
    Number(Option<f64>),
    Integer(i64),
}

impl Cell {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => *v,
            Cell::Integer(i) => Some(*i as f64),
            Cell::Date(_) => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Cell::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Date(d) => write!(f, "{}", d.format(TimeUtils::STANDARD_TIME_FORMAT)),
            Cell::Number(Some(v)) => write!(f, "{}", v),
            Cell::Number(None) => Ok(()),
            Cell::Integer(i) => write!(f, "{}", i),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelError {
    MissingColumn(String),
    /// A cell did not hold the kind of value its column requires
    UnexpectedCell { column: String, row: usize },
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelError::MissingColumn(name) => write!(f, "Missing required column: {}", name),
            PanelError::UnexpectedCell { column, row } => {
                write!(f, "Unexpected value in column {} at row {}", column, row)
            }
        }
    }
}

impl std::error::Error for PanelError {}

/// Combined event panel with hierarchical column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelTable {
    pub labels: Vec<ColumnLabel>,
    pub rows: Vec<Vec<Cell>>,
}

impl PanelTable {
    pub fn from_window_rows(ticker: &str, rows: &[WindowRow]) -> Self {
        let labels = vec![
            ColumnLabel::derived(fields::DATE),
            ColumnLabel::per_ticker(fields::OPEN, ticker),
            ColumnLabel::per_ticker(fields::HIGH, ticker),
            ColumnLabel::per_ticker(fields::LOW, ticker),
            ColumnLabel::per_ticker(fields::CLOSE, ticker),
            ColumnLabel::per_ticker(fields::ADJ_CLOSE, ticker),
            ColumnLabel::per_ticker(fields::VOLUME, ticker),
            ColumnLabel::derived(fields::EVENT_DATE),
            ColumnLabel::derived(fields::DAYS_FROM_EVENT),
            ColumnLabel::derived(fields::RETURN),
        ];

        let rows = rows
            .iter()
            .map(|row| {
                let r = &row.record;
                vec![
                    Cell::Date(r.date),
                    Cell::Number(Some(r.open)),
                    Cell::Number(Some(r.high)),
                    Cell::Number(Some(r.low)),
                    Cell::Number(Some(r.close)),
                    Cell::Number(Some(r.adj_close)),
                    Cell::Number(Some(r.volume)),
                    Cell::Date(row.event_date),
                    Cell::Integer(row.days_from_event),
                    Cell::Number(row.ret),
                ]
            })
            .collect();

        Self { labels, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Panel with single-level column names, as handed to every consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatPanel {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Flatten every column label. Applied once, unconditionally, between
/// extraction and any consumer; single-level labels pass through unchanged.
pub fn normalize_columns(table: PanelTable) -> FlatPanel {
    FlatPanel {
        columns: table.labels.iter().map(ColumnLabel::flatten).collect(),
        rows: table.rows,
    }
}

impl FlatPanel {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the column a hierarchical label flattens to.
    pub fn position(&self, label: &ColumnLabel) -> Result<usize, PanelError> {
        let name = label.flatten();
        self.columns
            .iter()
            .position(|c| *c == name)
            .ok_or(PanelError::MissingColumn(name))
    }

    /// Rows of the selected columns, tab separated, for status output.
    pub fn preview(&self, labels: &[ColumnLabel], n_rows: usize) -> Result<String, PanelError> {
        let positions = labels
            .iter()
            .map(|l| self.position(l))
            .collect::<Result<Vec<_>, _>>()?;

        let header = positions.iter().map(|&i| &self.columns[i]).join("\t");
        let body = self
            .rows
            .iter()
            .take(n_rows)
            .map(|row| positions.iter().map(|&i| row[i].to_string()).join("\t"));

        Ok(std::iter::once(header).chain(body).join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceRecord;

    fn window_row(date: &str, close: f64, offset: i64, ret: Option<f64>) -> WindowRow {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        WindowRow {
            record: PriceRecord {
                date,
                open: close,
                high: close,
                low: close,
                close,
                adj_close: close,
                volume: 10.0,
            },
            event_date: date - chrono::Duration::days(offset),
            days_from_event: offset,
            ret,
        }
    }

    #[test]
    fn test_flatten_joins_levels_and_trims() {
        assert_eq!(ColumnLabel::per_ticker("close", "^GSPC").flatten(), "close_^GSPC");
        assert_eq!(ColumnLabel::derived("return").flatten(), "return_");
        // Only the ends of the joined name are trimmed
        assert_eq!(
            ColumnLabel(vec![" adj close ".into(), " ^GSPC ".into()]).flatten(),
            "adj close _ ^GSPC"
        );
        assert_eq!(ColumnLabel(vec!["date".into()]).flatten(), "date");
    }

    #[test]
    fn test_normalized_panel_has_required_columns() {
        let rows = vec![
            window_row("2023-06-12", 100.0, -2, None),
            window_row("2023-06-13", 101.0, -1, Some(0.01)),
        ];
        let flat = normalize_columns(PanelTable::from_window_rows("^GSPC", &rows));

        assert_eq!(
            flat.columns,
            vec![
                "date_",
                "open_^GSPC",
                "high_^GSPC",
                "low_^GSPC",
                "close_^GSPC",
                "adj_close_^GSPC",
                "volume_^GSPC",
                "event_date_",
                "days_from_event_",
                "return_",
            ]
        );
        assert_eq!(flat.len(), 2);
        let ret = flat.position(&ColumnLabel::derived(fields::RETURN)).unwrap();
        assert_eq!(flat.rows[0][ret], Cell::Number(None));
        assert_eq!(flat.rows[1][ret].as_number(), Some(0.01));
    }

    #[test]
    fn test_missing_column_is_reported_by_flat_name() {
        let flat = normalize_columns(PanelTable::from_window_rows("^GSPC", &[]));
        let err = flat
            .position(&ColumnLabel::per_ticker(fields::CLOSE, "^IXIC"))
            .unwrap_err();
        assert_eq!(err, PanelError::MissingColumn("close_^IXIC".to_string()));
    }

    #[test]
    fn test_preview_formats_dates_and_missing_values() {
        let rows = vec![window_row("2023-06-12", 100.0, -2, None)];
        let flat = normalize_columns(PanelTable::from_window_rows("^GSPC", &rows));
        let text = flat
            .preview(
                &[
                    ColumnLabel::derived(fields::DATE),
                    ColumnLabel::derived(fields::DAYS_FROM_EVENT),
                    ColumnLabel::derived(fields::RETURN),
                ],
                5,
            )
            .unwrap();
        assert_eq!(text, "date_\tdays_from_event_\treturn_\n2023-06-12\t-2\t");
    }
}
