//! Delimited-text export of the means table
//!
//! Columns `Variable,Mean,StdDev,N`; floats rounded to two decimals,
//! undefined values written as empty fields. Output depends only on the
//! table contents, so the same selection always exports the same bytes.

use std::io::Write;

use super::summary::MeansTable;
use crate::{Error, Result};

pub const HEADER: [&str; 4] = ["Variable", "Mean", "StdDev", "N"];

/// Write the means table as CSV
pub fn write_means_csv<W: Write>(table: &MeansTable, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(HEADER).map_err(write_error)?;

    for row in &table.rows {
        csv.write_record([
            row.variable.clone(),
            format_float(row.stats.mean),
            format_float(row.stats.std_dev),
            row.stats.count.to_string(),
        ])
        .map_err(write_error)?;
    }

    csv.flush()?;
    Ok(())
}

/// The means table as CSV bytes
pub fn means_csv(table: &MeansTable) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_means_csv(table, &mut buf)?;
    Ok(buf)
}

/// Download file name for a selection of `participants` respondents
pub fn export_file_name(participants: usize) -> String {
    format!("moyennes_analyse_{}participants.csv", participants)
}

fn format_float(v: f64) -> String {
    if v.is_finite() {
        format!("{:.2}", v)
    } else {
        String::new()
    }
}

fn write_error(e: csv::Error) -> Error {
    Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e))
}
