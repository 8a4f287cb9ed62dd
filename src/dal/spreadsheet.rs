use std::{fs, path::Path};

use rust_xlsxwriter::{Workbook, XlsxError};

/// Longest string Excel accepts in a single cell.
const XLSX_MAX_CELL_CHARS: usize = 32_767;

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("required column '{0}' not found in sheet")]
    MissingColumn(String),
    #[error("failed to fetch sheet from {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Xlsx(#[from] XlsxError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Xlsx,
    Csv,
}

impl SheetFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => SheetFormat::Csv,
            _ => SheetFormat::Xlsx,
        }
    }
}

/// Writes a header row and `rows` to `path`, replacing whatever was there.
pub fn write_table<R: AsRef<[String]>>(
    path: &Path,
    headers: &[&str],
    rows: &[R],
) -> Result<(), SheetError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    match SheetFormat::from_path(path) {
        SheetFormat::Csv => {
            let mut writer = csv::Writer::from_path(path)?;
            writer.write_record(headers)?;
            for row in rows {
                writer.write_record(row.as_ref())?;
            }
            writer.flush()?;
        }
        SheetFormat::Xlsx => {
            let mut workbook = Workbook::new();
            let worksheet = workbook.add_worksheet();

            for (col, header) in headers.iter().enumerate() {
                worksheet.write_string(0, col as u16, *header)?;
            }
            for (i, row) in rows.iter().enumerate() {
                for (col, cell) in row.as_ref().iter().enumerate() {
                    worksheet.write_string(i as u32 + 1, col as u16, xlsx_cell(cell))?;
                }
            }

            workbook.save(path)?;
        }
    }

    Ok(())
}

// Page text pulled into a deal title can exceed the cell limit; the tail is dropped.
fn xlsx_cell(cell: &str) -> &str {
    match cell.char_indices().nth(XLSX_MAX_CELL_CHARS) {
        Some((end, _)) => &cell[..end],
        None => cell,
    }
}
