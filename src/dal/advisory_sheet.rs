use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::domain::advisory_firm::{AdvisoryFirm, ADVISORY_COLUMNS};

use super::{write_table, SheetError};

pub fn advisory_file_name(timestamp: NaiveDateTime) -> String {
    format!("Advisory_Firms_{}.xlsx", timestamp.format("%Y-%m-%d_%H-%M-%S"))
}

/// Writes one snapshot of the directory; `None` when there was nothing to save.
pub fn save_advisory_firms(
    folder: &Path,
    firms: &[AdvisoryFirm],
    timestamp: NaiveDateTime,
) -> Result<Option<PathBuf>, SheetError> {
    if firms.is_empty() {
        log::info!("No data to save.");
        return Ok(None);
    }

    let path = folder.join(advisory_file_name(timestamp));
    let rows: Vec<[String; 4]> = firms.iter().map(AdvisoryFirm::to_row).collect();
    write_table(&path, &ADVISORY_COLUMNS, &rows)?;

    log::info!("Excel file '{}' has been created.", path.display());
    Ok(Some(path))
}
