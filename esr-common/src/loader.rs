//! Survey file loader
//!
//! Reads the first worksheet of a workbook (xlsx, xls, ods) or a delimited
//! text export of that sheet. Physical row 0 carries section titles and is
//! ignored; row 1 is the header; data follows.

use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use tracing::{debug, info, warn};

use crate::schema;
use crate::table::{Table, Value};
use crate::{Error, Result};

/// Zero-based physical row holding the column names
pub const HEADER_ROW: usize = 1;

/// Physical encoding of an uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Spreadsheet workbook, read with calamine
    Workbook,
    /// Comma / semicolon / tab separated text
    Delimited,
}

impl SourceFormat {
    /// Decide from the file name extension, falling back to content sniffing
    pub fn detect(bytes: &[u8], name: Option<&str>) -> Self {
        let ext = name
            .and_then(|n| Path::new(n).extension())
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => return SourceFormat::Workbook,
            Some("csv" | "tsv" | "txt") => return SourceFormat::Delimited,
            _ => {}
        }

        if infer::doc::is_xlsx(bytes)
            || infer::doc::is_xls(bytes)
            || infer::odf::is_ods(bytes)
            || infer::archive::is_zip(bytes)
        {
            SourceFormat::Workbook
        } else {
            SourceFormat::Delimited
        }
    }
}

/// Load and validate a survey file from disk
pub fn load_path(path: &Path) -> Result<Table> {
    let bytes = std::fs::read(path)
        .map_err(|e| Error::malformed(format!("cannot read {} ({})", path.display(), e)))?;
    let name = path.file_name().and_then(|n| n.to_str());
    load_bytes(&bytes, name)
}

/// Load and validate a survey file from raw bytes
///
/// `name` is only used as a format hint.
pub fn load_bytes(bytes: &[u8], name: Option<&str>) -> Result<Table> {
    if bytes.is_empty() {
        return Err(Error::malformed("file is empty"));
    }

    let format = SourceFormat::detect(bytes, name);
    debug!("Loading {:?} as {:?}", name.unwrap_or("<upload>"), format);

    let grid = match format {
        SourceFormat::Workbook => read_workbook(bytes)?,
        SourceFormat::Delimited => read_delimited(bytes)?,
    };

    let table = grid_to_table(grid)?;
    validate_columns(&table)?;

    info!(
        "Loaded survey data: {} rows x {} columns",
        table.len(),
        table.column_names().count()
    );
    Ok(table)
}

/// Fail with `MalformedInput` listing every required column the table lacks
pub fn validate_columns(table: &Table) -> Result<()> {
    let missing: Vec<&str> = schema::required_columns()
        .into_iter()
        .filter(|c| !table.has_column(c))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::malformed(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )))
    }
}

fn read_workbook(bytes: &[u8]) -> Result<Vec<Vec<Value>>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::malformed("workbook has no worksheet"))??;

    // calamine ranges start at the first used cell; restore physical row numbers
    let (start_row, _) = range.start().unwrap_or((0, 0));
    let mut grid: Vec<Vec<Value>> = vec![Vec::new(); start_row as usize];
    grid.extend(
        range
            .rows()
            .map(|row| row.iter().map(cell_value).collect::<Vec<_>>()),
    );
    Ok(grid)
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Int(i) => Value::Number(*i as f64),
        Data::Float(f) => Value::from_f64(*f),
        Data::Bool(b) => Value::Number(if *b { 1.0 } else { 0.0 }),
        Data::String(s) => Value::parse(s),
        Data::DateTime(dt) => Value::from_f64(dt.as_f64()),
        _ => Value::Missing,
    }
}

fn read_delimited(bytes: &[u8]) -> Result<Vec<Vec<Value>>> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| Error::malformed("file is neither a workbook nor UTF-8 text"))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(sniff_delimiter(text))
        .from_reader(text.as_bytes());

    let mut grid = Vec::new();
    for record in reader.records() {
        let record = record?;
        grid.push(record.iter().map(Value::parse).collect());
    }
    Ok(grid)
}

/// Most frequent of `,` `;` `\t` on the header line (comma on ties)
fn sniff_delimiter(text: &str) -> u8 {
    let line = text
        .lines()
        .nth(HEADER_ROW)
        .or_else(|| text.lines().next())
        .unwrap_or("");
    let count = |c: char| line.chars().filter(|&x| x == c).count();

    [(b',', count(',')), (b';', count(';')), (b'\t', count('\t'))]
        .into_iter()
        .fold((b',', 0), |best, cand| if cand.1 > best.1 { cand } else { best })
        .0
}

fn grid_to_table(grid: Vec<Vec<Value>>) -> Result<Table> {
    if grid.len() <= HEADER_ROW {
        return Err(Error::malformed(format!(
            "file has {} row(s) but the header is expected on row {}",
            grid.len(),
            HEADER_ROW + 1
        )));
    }

    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    let header = &grid[HEADER_ROW];
    let data: Vec<&Vec<Value>> = grid[HEADER_ROW + 1..]
        .iter()
        .filter(|row| row.iter().any(|v| !v.is_missing()))
        .collect();

    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(width);

    for c in 0..width {
        let name = header
            .get(c)
            .map(|v| v.to_string().trim().to_string())
            .unwrap_or_default();
        let values: Vec<Value> = data
            .iter()
            .map(|row| row.get(c).cloned().unwrap_or(Value::Missing))
            .collect();

        if name.is_empty() {
            if values.iter().all(Value::is_missing) {
                warn!("Ignoring blank column {}", column_letter(c));
                continue;
            }
            return Err(Error::malformed(format!(
                "column {} holds data but has an empty header",
                column_letter(c)
            )));
        }
        if !seen.insert(name.clone()) {
            return Err(Error::malformed(format!(
                "duplicate column name '{}' (column {})",
                name,
                column_letter(c)
            )));
        }
        columns.push((name, values));
    }

    Table::new(columns)
}

/// Spreadsheet column letter for a zero-based index (0 → A, 27 → AB)
fn column_letter(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}
