// Tabular models for the event panel
// Pure data shaping, independent of IO and UI

pub mod panel;

// Re-export key types for convenience
pub use panel::{Cell, ColumnLabel, FlatPanel, PanelError, PanelTable, normalize_columns};
