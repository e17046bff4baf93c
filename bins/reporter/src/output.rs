//! Writes the report bundle and one CSV per worksheet.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use balanza_core::export::{Sheet, Workbook};
use balanza_core::reports::{FinancialReports, TrialBalanceReport};
use balanza_shared::types::Currency;
use balanza_shared::{AppError, AppResult};
use serde::Serialize;

/// JSON document written next to the worksheets.
#[derive(Serialize)]
struct Bundle<'a> {
    /// Spreadsheet mask for the amounts, e.g. `C$ #,##0.00`.
    number_format: String,
    reports: &'a FinancialReports,
    trial_balance: Option<&'a TrialBalanceReport>,
}

fn export_error(path: &Path, err: impl std::fmt::Display) -> AppError {
    AppError::Export(format!("{}: {err}", path.display()))
}

/// File name for a sheet: lowercase ASCII, words joined by `_`.
pub fn sheet_file_name(sheet_name: &str) -> String {
    let slug: String = sheet_name
        .chars()
        .map(|c| match c {
            'á' | 'Á' => 'a',
            'é' | 'É' => 'e',
            'í' | 'Í' => 'i',
            'ó' | 'Ó' => 'o',
            'ú' | 'Ú' | 'ü' | 'Ü' => 'u',
            'ñ' | 'Ñ' => 'n',
            c if c.is_ascii_alphanumeric() => c.to_ascii_lowercase(),
            _ => '_',
        })
        .collect();
    format!("{}.csv", slug.trim_matches('_'))
}

/// Writes one sheet as CSV: the header row, then the rendered body.
pub fn write_sheet<W: Write>(sheet: &Sheet, currency: Currency, writer: W) -> csv::Result<()> {
    let mut csv = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    csv.write_record(&sheet.header)?;
    for row in sheet.rendered_rows(currency) {
        csv.write_record(&row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Serializes the bundle and flushes the writer, so a failed final write
/// surfaces as an error.
fn write_bundle<W: Write>(bundle: &Bundle<'_>, mut writer: W) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, bundle)?;
    writer.flush()
}

/// Writes `reports.json` and every worksheet into `dir`, creating it if
/// needed. Returns the paths written.
pub fn write_all(
    dir: &Path,
    reports: &FinancialReports,
    trial_balance: Option<&TrialBalanceReport>,
    workbook: &Workbook,
) -> AppResult<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| export_error(dir, e))?;
    let mut written = Vec::with_capacity(workbook.sheets.len() + 1);

    let json_path = dir.join("reports.json");
    let file = File::create(&json_path).map_err(|e| export_error(&json_path, e))?;
    write_bundle(
        &Bundle {
            number_format: workbook.currency.number_format(),
            reports,
            trial_balance,
        },
        BufWriter::new(file),
    )
    .map_err(|e| export_error(&json_path, e))?;
    written.push(json_path);

    for sheet in &workbook.sheets {
        let path = dir.join(sheet_file_name(&sheet.name));
        let file = File::create(&path).map_err(|e| export_error(&path, e))?;
        write_sheet(sheet, workbook.currency, BufWriter::new(file))
            .map_err(|e| export_error(&path, e))?;
        written.push(path);
    }

    Ok(written)
}
