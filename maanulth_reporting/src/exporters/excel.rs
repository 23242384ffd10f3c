// @file: maanulth_reporting/src/exporters/excel.rs
// @description: Writes cleaned datasets to a single multi-sheet workbook.
// @author: LAS.

use crate::core::errors::ReportResult;
use crate::core::models::{Table, Value};
use crate::core::transform::CleanedDataset;
use log::info;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::{Path, PathBuf};

const DATE_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";
const MEASURE_FORMAT: &str = "0.00";

pub fn workbook_path(workspace: &Path, prefix: &str, year: i32) -> PathBuf {
    workspace.join(format!("{}_{}.xlsx", prefix, year))
}

/// One sheet per dataset, in the order given. Replaces any existing file.
pub fn write_workbook(path: &Path, datasets: &[CleanedDataset]) -> ReportResult<()> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let date = Format::new().set_num_format(DATE_FORMAT);
    let measure = Format::new().set_num_format(MEASURE_FORMAT);

    for cleaned in datasets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(cleaned.dataset.key())?;

        // Column defaults also cover blank cells
        if let Some(col) = cleaned.table.column_index(cleaned.dataset.date_column()) {
            sheet.set_column_format(col as u16, &date)?;
        }
        if let Some(col) = cleaned.table.column_index(cleaned.dataset.measure_column()) {
            sheet.set_column_format(col as u16, &measure)?;
        }
        write_sheet(sheet, &cleaned.table, &header, &date)?;
    }

    workbook.save(path)?;
    info!("Wrote {} sheet(s) to {}", datasets.len(), path.display());
    Ok(())
}

fn write_sheet(sheet: &mut Worksheet, table: &Table, header: &Format, date: &Format) -> ReportResult<()> {
    for (col, name) in table.columns().iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, name, header)?;
    }

    for (r, row) in table.rows().iter().enumerate() {
        let excel_row = (r + 1) as u32;
        for (c, value) in row.iter().enumerate() {
            let excel_col = c as u16;
            match value {
                Value::Null => {}
                Value::Text(s) => {
                    sheet.write_string(excel_row, excel_col, s)?;
                }
                Value::Integer(i) => {
                    sheet.write_number(excel_row, excel_col, *i as f64)?;
                }
                Value::Float(f) => {
                    sheet.write_number(excel_row, excel_col, *f)?;
                }
                Value::DateTime(dt) => {
                    sheet.write_datetime_with_format(excel_row, excel_col, dt, date)?;
                }
            }
        }
    }

    sheet.autofit();
    Ok(())
}
