use std::path::PathBuf;

use crate::domain::deal::{DealRecord, DEAL_COLUMNS};

use super::{write_table, SheetError};

/// Output file that always holds the whole ledger of the current run.
pub struct DealSheet {
    path: PathBuf,
}

impl DealSheet {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DealSheet { path: path.into() }
    }

    pub fn save(&self, records: &[DealRecord]) -> Result<(), SheetError> {
        let rows: Vec<[String; 7]> = records.iter().map(DealRecord::to_row).collect();
        write_table(&self.path, &DEAL_COLUMNS, &rows)?;

        log::info!(
            "Saved progress to {} ({} deals total)",
            self.path.display(),
            records.len()
        );
        Ok(())
    }
}
