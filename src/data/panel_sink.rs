use std::path::Path;

use anyhow::{Context, Result};

use crate::models::panel::FlatPanel;

/// Write the flattened panel as CSV: header of flat column names, one record
/// per row, no index column. Missing values become empty cells.
pub fn write_panel_csv(panel: &FlatPanel, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .context(format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .context(format!("Failed to create panel file: {}", path.display()))?;
    writer.write_record(&panel.columns)?;
    for row in &panel.rows {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer
        .flush()
        .context(format!("Failed to flush panel file: {}", path.display()))?;
    Ok(())
}
