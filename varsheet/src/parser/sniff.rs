//! Dialect detection for delimited tables.
//!
//! Peeks at the first lines of the input and picks the delimiter that occurs
//! most consistently outside quoted fields.

use std::collections::HashMap;
use std::fmt;
use std::io::{BufRead, Seek, SeekFrom};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::SniffError;

/// Number of physical lines inspected by default.
pub const SNIFF_LINES: usize = 10;

/// Candidate delimiters, most preferred first.
pub const DELIMITER_CANDIDATES: [u8; 6] = [b',', b'\t', b';', b'|', b':', b' '];

static DOUBLE_QUOTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)(?:^|[^\w\n"'])[ ]?"[^"\n]*"(?:[^\w\n"']|$)"#).expect("valid regex")
});

static SINGLE_QUOTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)(?:^|[^\w\n"'])[ ]?'[^'\n]*'(?:[^\w\n"']|$)"#).expect("valid regex")
});

/// Formatting rules of a delimited table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: u8,
    pub quote: u8,
    /// Whitespace right after a delimiter is not part of the field.
    pub skip_initial_space: bool,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            skip_initial_space: false,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let delimiter = match self.delimiter {
            b'\t' => "TAB".to_string(),
            b' ' => "SPACE".to_string(),
            d => format!("'{}'", d as char),
        };
        write!(f, "delimiter {delimiter}, quote '{}'", self.quote as char)?;
        if self.skip_initial_space {
            write!(f, ", skipping initial spaces")?;
        }
        Ok(())
    }
}

/// Read up to `num_lines` lines from the current position.
pub fn read_head<R: BufRead>(handle: &mut R, num_lines: usize) -> std::io::Result<String> {
    let mut peek = String::new();
    for _ in 0..num_lines {
        if handle.read_line(&mut peek)? == 0 {
            break;
        }
    }
    Ok(peek)
}

/// Detect the dialect of `handle` from its first `num_lines` lines.
///
/// The read position is restored afterwards so the whole table can be read.
pub fn sniff_format<R: BufRead + Seek>(
    handle: &mut R,
    num_lines: usize,
) -> Result<Dialect, SniffError> {
    let start = handle.stream_position()?;
    let peek = read_head(handle, num_lines)?;
    handle.seek(SeekFrom::Start(start))?;
    sniff(&peek)
}

/// Infer a dialect from a text sample.
pub fn sniff(sample: &str) -> Result<Dialect, SniffError> {
    let lines: Vec<&str> = sample.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return Err(SniffError::EmptySample);
    }

    let quote = guess_quote(sample);
    let delimiter = guess_delimiter(&lines, quote).ok_or(SniffError::NoConsistentDelimiter {
        lines: lines.len(),
    })?;
    let skip_initial_space = delimiter != b' '
        && lines
            .iter()
            .map(|line| scan(line, delimiter, quote))
            .all(|(count, spaced)| count == spaced);

    Ok(Dialect {
        delimiter,
        quote,
        skip_initial_space,
    })
}

fn guess_quote(sample: &str) -> u8 {
    let double = DOUBLE_QUOTED.find_iter(sample).count();
    let single = SINGLE_QUOTED.find_iter(sample).count();
    if single > double {
        b'\''
    } else {
        b'"'
    }
}

/// Pick the candidate with the highest consistency, then the highest modal
/// count, then the earliest preference position.
fn guess_delimiter(lines: &[&str], quote: u8) -> Option<u8> {
    let mut best: Option<(u8, usize, usize)> = None;

    for &candidate in &DELIMITER_CANDIDATES {
        let mut frequencies: HashMap<usize, usize> = HashMap::new();
        for line in lines {
            *frequencies.entry(scan(line, candidate, quote).0).or_default() += 1;
        }
        let Some((mode, agreeing)) = frequencies
            .into_iter()
            .max_by_key(|&(count, seen)| (seen, count))
        else {
            continue;
        };
        // at least 90% of lines must agree on a non-zero count
        if mode == 0 || agreeing * 10 < lines.len() * 9 {
            continue;
        }
        let better = match best {
            None => true,
            Some((_, best_agreeing, best_mode)) => {
                (agreeing, mode) > (best_agreeing, best_mode)
            }
        };
        if better {
            best = Some((candidate, agreeing, mode));
        }
    }

    best.map(|(delimiter, _, _)| delimiter)
}

/// Count unquoted `delimiter` bytes in `line`, and how many are followed by a space.
fn scan(line: &str, delimiter: u8, quote: u8) -> (usize, usize) {
    let bytes = line.as_bytes();
    let mut in_quotes = false;
    let mut count = 0;
    let mut spaced = 0;

    for (i, &b) in bytes.iter().enumerate() {
        if b == quote {
            in_quotes = !in_quotes;
        } else if b == delimiter && !in_quotes {
            count += 1;
            if bytes.get(i + 1) == Some(&b' ') {
                spaced += 1;
            }
        }
    }

    (count, spaced)
}
