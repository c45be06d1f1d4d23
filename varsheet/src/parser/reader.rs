//! Header-keyed row reading over a detected dialect.

use std::io::Read;
use std::rc::Rc;

use crate::error::{ReadError, ReadResult};

use super::sniff::Dialect;

/// One data record keyed by the header's column names.
#[derive(Debug, Clone)]
pub struct Row {
    line: usize,
    headers: Rc<[String]>,
    values: Vec<String>,
}

impl Row {
    /// 1-based line number in the source table; the header is line 1.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Value of `column`, or `None` when the record is shorter than the header.
    ///
    /// A repeated header name resolves to its last occurrence.
    pub fn get(&self, column: &str) -> Option<&str> {
        let idx = self.headers.iter().rposition(|h| h == column)?;
        self.values.get(idx).map(String::as_str)
    }

    /// `(column, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .zip(self.values.iter())
            .map(|(h, v)| (h.as_str(), v.as_str()))
    }
}

/// Reads a delimited table with a known dialect.
pub struct TableReader<R: Read> {
    reader: csv::Reader<R>,
    headers: Rc<[String]>,
    skip_initial_space: bool,
}

impl<R: Read> TableReader<R> {
    /// Parse the header line of `input`.
    pub fn new(input: R, dialect: Dialect) -> ReadResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(dialect.delimiter)
            .quote(dialect.quote)
            .has_headers(true)
            .flexible(true)
            .from_reader(input);

        let record = reader.headers()?;
        if record.is_empty() {
            return Err(ReadError::NoHeaders);
        }
        let headers: Vec<String> = record
            .iter()
            .map(|h| clean(h, dialect.skip_initial_space).to_string())
            .collect();

        Ok(Self {
            reader,
            headers: headers.into(),
            skip_initial_space: dialect.skip_initial_space,
        })
    }

    /// Column names from the header line.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows in input order, numbered from line 2.
    pub fn rows(&mut self) -> Rows<'_, R> {
        Rows {
            records: self.reader.records(),
            headers: Rc::clone(&self.headers),
            skip_initial_space: self.skip_initial_space,
            next_line: 2,
        }
    }
}

/// Iterator over the rows of a [`TableReader`].
pub struct Rows<'r, R: Read> {
    records: csv::StringRecordsIter<'r, R>,
    headers: Rc<[String]>,
    skip_initial_space: bool,
    next_line: usize,
}

impl<R: Read> Iterator for Rows<'_, R> {
    type Item = ReadResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        let line = self.next_line;
        self.next_line += 1;

        Some(record.map_err(ReadError::from).map(|record| Row {
            line,
            headers: Rc::clone(&self.headers),
            values: record
                .iter()
                .map(|v| clean(v, self.skip_initial_space).to_string())
                .collect(),
        }))
    }
}

fn clean(field: &str, skip_initial_space: bool) -> &str {
    if skip_initial_space {
        field.trim_start_matches(' ')
    } else {
        field
    }
}
