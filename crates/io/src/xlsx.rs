// Excel import (xlsx, xls, ods) and snapshot export (xlsx only)
//
// Import: one-way conversion of the first worksheet into the Dataset.
// Export: complete snapshot of the in-memory table, header row included.
//         The source file on disk is never overwritten by a session.

use std::io::{Cursor, Read, Seek};
use std::path::Path;
use std::time::Instant;

use calamine::{open_workbook_auto, Data, Reader, Xlsx};
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Workbook as XlsxWorkbook};

use trilabel_engine::stage::STAGE_COUNT;
use trilabel_engine::Dataset;

/// Result of an import operation
#[derive(Debug, Default, Clone)]
pub struct ImportReport {
    /// Worksheet the data came from
    pub sheet_name: String,
    /// Data rows imported (header row excluded)
    pub rows_imported: usize,
    /// Columns in the header row (before label columns were appended)
    pub columns_imported: usize,
    /// Label columns absent from the input and appended at load
    pub label_columns_added: Vec<String>,
    /// Total import duration in milliseconds
    pub import_duration_ms: u128,
}

impl ImportReport {
    /// Returns a summary message suitable for display
    pub fn summary(&self) -> String {
        let mut parts = vec![
            format!("sheet '{}'", self.sheet_name),
            format!(
                "{} row{}",
                self.rows_imported,
                if self.rows_imported == 1 { "" } else { "s" }
            ),
            format!("{} columns", self.columns_imported),
        ];
        if !self.label_columns_added.is_empty() {
            parts.push(format!(
                "added label columns: {}",
                self.label_columns_added.join(", ")
            ));
        }
        parts.join(" · ")
    }
}

/// Import the first worksheet of a spreadsheet file into a Dataset.
///
/// The first row is the header. Label columns named in `label_columns` are
/// resolved against it; missing ones are appended with empty cells.
pub fn load(
    path: &Path,
    label_columns: &[String; STAGE_COUNT],
) -> Result<(Dataset, ImportReport), String> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| format!("failed to open {}: {}", path.display(), e))?;
    import_workbook(&mut workbook, label_columns)
}

/// Import from an in-memory xlsx byte buffer (export snapshots, tests).
pub fn load_from_bytes(
    bytes: &[u8],
    label_columns: &[String; STAGE_COUNT],
) -> Result<(Dataset, ImportReport), String> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| format!("failed to read xlsx buffer: {}", e))?;
    import_workbook(&mut workbook, label_columns)
}

fn import_workbook<RS, R>(
    workbook: &mut R,
    label_columns: &[String; STAGE_COUNT],
) -> Result<(Dataset, ImportReport), String>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: std::fmt::Display,
{
    let start_time = Instant::now();

    let sheet_names = workbook.sheet_names().to_vec();
    let sheet_name = sheet_names
        .first()
        .cloned()
        .ok_or_else(|| "workbook contains no sheets".to_string())?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("failed to read sheet '{}': {}", sheet_name, e))?;

    let mut rows_iter = range.rows();
    let header = rows_iter
        .next()
        .ok_or_else(|| format!("sheet '{}' has no header row", sheet_name))?;

    let columns: Vec<String> = header.iter().map(|c| data_to_string(c).trim().to_string()).collect();
    let rows: Vec<Vec<String>> = rows_iter
        .map(|row| row.iter().map(data_to_string).collect())
        .collect();

    let columns_imported = columns.len();
    let rows_imported = rows.len();

    let (dataset, label_columns_added) = Dataset::new(columns, rows, label_columns);

    if !label_columns_added.is_empty() {
        eprintln!(
            "[xlsx import] appended missing label column{}: {}",
            if label_columns_added.len() == 1 { "" } else { "s" },
            label_columns_added.join(", ")
        );
    }

    let report = ImportReport {
        sheet_name,
        rows_imported,
        columns_imported,
        label_columns_added,
        import_duration_ms: start_time.elapsed().as_millis(),
    };

    Ok((dataset, report))
}

/// Coerce a calamine cell to its display string. Integral floats drop the
/// decimal point so document IDs don't come back as "1234.0".
fn data_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => format!("{}", n),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::Error(e) => format!("#{:?}", e),
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

/// Serialize the dataset to an xlsx byte buffer: header row plus every data
/// row, columns in their current order, in-session label writes included.
///
/// Deterministic: doc properties carry a fixed creation timestamp, so the
/// same dataset always produces identical bytes. Side-effect-free with
/// respect to the dataset.
pub fn export(dataset: &Dataset) -> Result<Vec<u8>, String> {
    let mut workbook = XlsxWorkbook::new();

    let created = ExcelDateTime::from_ymd(2000, 1, 1)
        .map_err(|e| format!("failed to build doc properties: {}", e))?;
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

    let worksheet = workbook.add_worksheet();

    for (col, name) in dataset.columns().iter().enumerate() {
        worksheet
            .write_string(0, col as u16, name)
            .map_err(|e| format!("failed to write header cell {}: {}", col, e))?;
    }

    for (row, cells) in dataset.rows().iter().enumerate() {
        let out_row = (row + 1) as u32;
        for (col, value) in cells.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            // Numbers go out as numbers (so Excel sorts/filters them
            // natively), but only when the coercion loses nothing: codes
            // like "007" or "1e3" stay text so they reload unchanged.
            match value.parse::<f64>() {
                Ok(n) if n.is_finite() && data_to_string(&Data::Float(n)) == *value => {
                    worksheet
                        .write_number(out_row, col as u16, n)
                        .map_err(|e| format!("failed to write cell ({}, {}): {}", row, col, e))?;
                }
                _ => {
                    worksheet
                        .write_string(out_row, col as u16, value)
                        .map_err(|e| format!("failed to write cell ({}, {}): {}", row, col, e))?;
                }
            }
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| format!("failed to serialize xlsx: {}", e))
}

/// Export a snapshot to a file. Writes a complete, independent copy; callers
/// choose the interim or final name, never the source path.
pub fn export_to_file(dataset: &Dataset, path: &Path) -> Result<(), String> {
    let bytes = export(dataset)?;
    std::fs::write(path, bytes).map_err(|e| format!("failed to write {}: {}", path.display(), e))
}
