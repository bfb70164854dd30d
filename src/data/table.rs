//! In-memory CSV table of budget lines.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use crate::error::ClassifyError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A rectangular table of string cells with a header row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BudgetTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl BudgetTable {
    /// Builds a table from headers and rows.
    ///
    /// Short rows are padded with empty cells; long rows are truncated to
    /// the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Parses comma-delimited CSV with a header row. A leading UTF-8 BOM is
    /// ignored.
    ///
    /// Rows missing trailing fields are padded with empty cells. A row with
    /// more fields than the header is a [`ClassifyError::RowTooLong`].
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ClassifyError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if i == 0 {
                    h.trim_start_matches('\u{feff}').to_string()
                } else {
                    h.to_string()
                }
            })
            .collect();

        let width = headers.len();
        let mut rows = Vec::new();
        let mut padded = 0;
        for record in reader.records() {
            let record = record?;
            if record.len() > width {
                return Err(ClassifyError::RowTooLong {
                    line: record.position().map_or(0, csv::Position::line),
                    fields: record.len(),
                    expected: width,
                });
            }
            if record.len() < width {
                padded += 1;
            }
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(width, String::new());
            rows.push(row);
        }
        if padded > 0 {
            debug!(rows = padded, "Padded rows missing trailing fields");
        }

        Ok(Self { headers, rows })
    }

    /// Reads a CSV file.
    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ClassifyError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ClassifyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Writes the table as CSV, without a BOM.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), ClassifyError> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Writes the table to a file as UTF-8 CSV with a BOM, so spreadsheet
    /// tools detect the encoding.
    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ClassifyError> {
        let path = path.as_ref();
        let io_err = |source: std::io::Error| ClassifyError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut file = BufWriter::new(File::create(path).map_err(io_err)?);
        file.write_all(UTF8_BOM).map_err(io_err)?;
        self.write_to(&mut file)?;
        file.flush().map_err(io_err)?;
        Ok(())
    }

    /// Column names.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// All rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Position of a column that must exist.
    pub fn require_column(&self, name: &str) -> Result<usize, ClassifyError> {
        self.column_index(name)
            .ok_or_else(|| ClassifyError::MissingColumn {
                column: name.to_string(),
            })
    }

    /// Cells of a column by position.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(index).map_or("", String::as_str))
    }

    /// Cells of a column that must exist, by name.
    pub fn column_by_name(&self, name: &str) -> Result<Vec<&str>, ClassifyError> {
        let index = self.require_column(name)?;
        Ok(self.column(index).collect())
    }

    /// Returns a copy with `values` stored under `name`: replacing the
    /// column if it exists, appending it otherwise.
    pub fn with_column(&self, name: &str, values: Vec<String>) -> Self {
        let mut table = self.clone();
        let index = match table.column_index(name) {
            Some(index) => index,
            None => {
                table.headers.push(name.to_string());
                for row in &mut table.rows {
                    row.push(String::new());
                }
                table.headers.len() - 1
            }
        };
        for (row, value) in table.rows.iter_mut().zip(values) {
            row[index] = value;
        }
        table
    }

    /// Returns a copy keeping only the rows for which `keep` returns true.
    pub fn filter_rows<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&[String]) -> bool,
    {
        Self {
            headers: self.headers.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| keep(row))
                .cloned()
                .collect(),
        }
    }
}
