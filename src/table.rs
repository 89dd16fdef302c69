//! Flat string table shared by the acquisition and cleaning stages.
//!
//! A `RawTable` is what the scraper extracts from a game log page and what the
//! cleaner reads back: one header row and any number of string rows.

use crate::error::AppError;
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        RawTable {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Appends a row, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// Appends the rows of `other`, aligning columns by header name.
    /// Columns unknown to `self` are added at the end in the order first seen.
    pub fn append(&mut self, other: RawTable) {
        let mut mapping = Vec::with_capacity(other.headers.len());
        for header in &other.headers {
            let idx = match self.column_index(header) {
                Some(idx) => idx,
                None => {
                    self.headers.push(header.clone());
                    for row in &mut self.rows {
                        row.push(String::new());
                    }
                    self.headers.len() - 1
                }
            };
            mapping.push(idx);
        }

        for row in other.rows {
            let mut aligned = vec![String::new(); self.headers.len()];
            for (value, &idx) in row.into_iter().zip(&mapping) {
                aligned[idx] = value;
            }
            self.rows.push(aligned);
        }
    }

    /// Removes the named columns; names that are not present are ignored.
    pub fn drop_columns(&mut self, names: &[&str]) {
        let keep: Vec<bool> = self
            .headers
            .iter()
            .map(|h| !names.contains(&h.as_str()))
            .collect();
        if keep.iter().all(|k| *k) {
            return;
        }

        let retain = |values: &mut Vec<String>| {
            let mut flags = keep.iter();
            values.retain(|_| *flags.next().unwrap_or(&true));
        };
        retain(&mut self.headers);
        for row in &mut self.rows {
            retain(row);
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AppError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader
            .headers()?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        let mut table = RawTable::new(headers);
        for record in csv_reader.records() {
            let record = record?;
            table.push_row(record.iter().map(str::to_string).collect());
        }
        Ok(table)
    }

    pub fn read_csv(path: &Path) -> Result<Self, AppError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), AppError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.headers)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn write_csv(&self, path: &Path) -> Result<(), AppError> {
        let file = std::fs::File::create(path)?;
        self.to_writer(file)
    }
}
