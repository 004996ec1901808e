//! Decline table as an `.xlsx` workbook.

use crate::error::Result;
use crate::models::DeclineReport;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

pub const SHEET_NAME: &str = "Análise de Queda";

fn build_workbook(report: &DeclineReport) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let headers = [
        "Nome do Cliente".to_string(),
        "UF".to_string(),
        report.metric.period_1_header(),
        report.metric.period_2_header(),
        report.metric.decline_header(),
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, header, &bold)?;
    }

    for (i, record) in report.records.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, &record.client_name)?;
        sheet.write_string(row, 1, record.state.as_deref().unwrap_or(""))?;
        sheet.write_number(row, 2, record.period_1)?;
        sheet.write_number(row, 3, record.period_2)?;
        sheet.write_number(row, 4, record.decline)?;
    }
    sheet.set_column_width(0, 40)?;
    for col in 2..=4u16 {
        sheet.set_column_width(col, 24)?;
    }
    Ok(workbook)
}

/// Render the decline table into workbook bytes.
pub fn decline_workbook(report: &DeclineReport) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(report)?;
    Ok(workbook.save_to_buffer()?)
}

/// Write the decline table to `path`.
pub fn write_decline_workbook(report: &DeclineReport, path: &Path) -> Result<()> {
    let mut workbook = build_workbook(report)?;
    workbook.save(path)?;
    tracing::info!(
        "Exported {} decline rows to {}",
        report.records.len(),
        path.display()
    );
    Ok(())
}
