// src/excel.rs

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

use crate::report::{CellStyle, ReportGrid};

pub const LOG_SHEET_NAME: &str = "Check-in log";
pub const CALENDAR_SHEET_NAME: &str = "Check-in calendar";

const FONT_NAME: &str = "Times New Roman";

fn cell_format(style: &CellStyle) -> Format {
    let mut format = Format::new()
        .set_font_name(FONT_NAME)
        .set_font_size(style.font_size as f64)
        .set_background_color(Color::RGB(style.fill.rgb()))
        .set_border(FormatBorder::Thin);

    if style.bold {
        format = format.set_bold();
    }
    if style.wrap_and_center {
        format = format
            .set_text_wrap()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);
    }

    format
}

fn write_grid(worksheet: &mut Worksheet, grid: &ReportGrid) -> Result<(), XlsxError> {
    for (col, width) in grid.column_widths.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width as f64)?;
    }

    for (row_idx, row) in grid.rows.iter().enumerate() {
        if let Some(height) = grid.row_height {
            worksheet.set_row_height(row_idx as u32, height as f64)?;
        }
        for (col_idx, cell) in row.iter().enumerate() {
            let format = cell_format(&cell.style);
            worksheet.write_string_with_format(
                row_idx as u32,
                col_idx as u16,
                cell.value.as_str(),
                &format,
            )?;
        }
    }

    Ok(())
}

/// Serialize the two report grids into an in-memory xlsx workbook: the log
/// sheet first, the calendar sheet second.
pub fn write_workbook(table: &ReportGrid, calendar: &ReportGrid) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();

    let log_sheet = workbook.add_worksheet();
    log_sheet.set_name(LOG_SHEET_NAME)?;
    write_grid(log_sheet, table)?;

    let calendar_sheet = workbook.add_worksheet();
    calendar_sheet.set_name(CALENDAR_SHEET_NAME)?;
    write_grid(calendar_sheet, calendar)?;

    workbook.save_to_buffer()
}
