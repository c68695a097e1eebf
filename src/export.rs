use crate::calendar::types::{EconomicEvent, EXPORT_COLUMNS};
use crate::errors::{DeskError, DeskResult};
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use std::str::FromStr;

pub const SHEET_NAME: &str = "Economic Calendar";

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Csv => "text/csv; charset=utf-8",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xlsx" | "excel" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            other => Err(DeskError::Validation(format!(
                "unsupported export format '{other}', expected xlsx or csv"
            ))),
        }
    }
}

/// `economic_calendar_<from>_<to>.<ext>`
pub fn download_filename(from: NaiveDate, to: NaiveDate, format: ExportFormat) -> String {
    format!(
        "economic_calendar_{}_{}.{}",
        from.format("%Y-%m-%d"),
        to.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Render rows in the requested format. Blocking: call from spawn_blocking.
///
/// Rows go through `EconomicEvent::export_row`, which has no id column.
pub fn render(events: &[EconomicEvent], format: ExportFormat) -> DeskResult<Vec<u8>> {
    match format {
        ExportFormat::Xlsx => export_xlsx_in(&std::env::temp_dir(), events),
        ExportFormat::Csv => export_csv(events),
    }
}

/// Build the workbook in a temp file under `dir`, read it back, release it.
/// The temp file is removed on every path, including errors (drop guard).
pub fn export_xlsx_in(dir: &Path, events: &[EconomicEvent]) -> DeskResult<Vec<u8>> {
    let file = tempfile::Builder::new()
        .prefix("economic_calendar_")
        .suffix(".xlsx")
        .tempfile_in(dir)?;

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, name) in EXPORT_COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &header)?;
    }

    for (idx, event) in events.iter().enumerate() {
        let row = u32::try_from(idx + 1)
            .map_err(|_| DeskError::Export("too many rows for one worksheet".into()))?;
        for (col, value) in event.export_row().iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(row, col as u16, *value)?;
            }
        }
    }

    workbook.save(file.path())?;
    let bytes = std::fs::read(file.path())?;
    file.close()?;

    tracing::debug!(rows = events.len(), bytes = bytes.len(), "xlsx export written");
    Ok(bytes)
}

pub fn export_csv(events: &[EconomicEvent]) -> DeskResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_COLUMNS)?;
    for event in events {
        writer.write_record(event.export_row())?;
    }
    writer
        .into_inner()
        .map_err(|e| DeskError::Export(format!("csv flush: {e}")))
}
