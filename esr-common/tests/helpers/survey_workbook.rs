//! Synthetic survey workbooks
//!
//! Same layout as [`super::survey_csv`], written as a real xlsx file.
//! Numeric cells are stored as numbers except the `Age` column, which is
//! stored as text the way hand-edited sheets often carry codes. Header
//! names are padded with spaces.

use rust_xlsxwriter::{Workbook, XlsxError};

use super::survey_fixture::{header, record, titles, Respondent};

const AGE_COLUMN: u16 = 1;

/// Build an xlsx holding `rows`
///
/// Row 0 carries the section titles when `with_titles` is set and is left
/// entirely empty otherwise.
pub fn survey_xlsx(rows: &[Respondent], with_titles: bool) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    if with_titles {
        for (col, title) in titles().iter().enumerate() {
            if !title.is_empty() {
                sheet.write_string(0, col as u16, title.as_str())?;
            }
        }
    }

    for (col, name) in header().iter().enumerate() {
        sheet.write_string(1, col as u16, format!("  {} ", name))?;
    }

    for (i, r) in rows.iter().enumerate() {
        let row = i as u32 + 2;
        for (col, cell) in record(i, r).iter().enumerate() {
            let col = col as u16;
            if cell.is_empty() {
                continue;
            }
            match cell.parse::<f64>() {
                Ok(n) if col != AGE_COLUMN => {
                    sheet.write_number(row, col, n)?;
                }
                _ => {
                    sheet.write_string(row, col, cell.as_str())?;
                }
            }
        }
    }

    workbook.save_to_buffer()
}
