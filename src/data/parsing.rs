use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use super::error::{ConvertError, ParseError};
use super::model::Table;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Optional arguments of [`parse_file`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Column separator. `None` splits on runs of whitespace.
    pub separator: Option<String>,
    /// Lines discarded from the start of the file before parsing.
    pub skip_lines: usize,
}

impl ParseOptions {
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    pub fn with_skip_lines(mut self, skip_lines: usize) -> Self {
        self.skip_lines = skip_lines;
        self
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Parse columns from a file.
///
/// The first `options.skip_lines` lines are discarded unconditionally; the
/// rest goes through [`parse_strs`]. A file shorter than the skip count is
/// an error rather than an empty table.
pub fn parse_file<T, F, E>(
    path: &Path,
    col_idxs: &[usize],
    converters: &[F],
    options: &ParseOptions,
) -> Result<Table<T>, ParseError>
where
    F: Fn(&str) -> Result<T, E>,
    E: Into<ConvertError>,
{
    check_cardinality(col_idxs, converters)?;

    let file = File::open(path)?;
    let mut lines = BufReader::new(file).lines();

    for skipped in 0..options.skip_lines {
        match lines.next() {
            Some(line) => {
                line?;
            }
            None => {
                return Err(ParseError::UnexpectedEof {
                    requested: options.skip_lines,
                    available: skipped,
                })
            }
        }
    }

    let table = parse_lines(
        lines.map(|l| l.map_err(ParseError::from)),
        options.skip_lines,
        col_idxs,
        converters,
        options.separator.as_deref(),
    )?;
    debug!(
        "parsed {} rows x {} columns from {}",
        table.len(),
        table.width(),
        path.display()
    );
    Ok(table)
}

/// Parse columns from each of `lines` and regroup them column-wise.
///
/// Column `i` of the result holds `converters[i]` applied to token
/// `col_idxs[i]` of every line, in line order.
pub fn parse_strs<I, S, T, F, E>(
    lines: I,
    col_idxs: &[usize],
    converters: &[F],
    separator: Option<&str>,
) -> Result<Table<T>, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: Fn(&str) -> Result<T, E>,
    E: Into<ConvertError>,
{
    check_cardinality(col_idxs, converters)?;
    parse_lines(
        lines.into_iter().map(Ok),
        0,
        col_idxs,
        converters,
        separator,
    )
}

/// Split `line` and convert the selected tokens.
///
/// The output keeps the order of `col_idxs`; an index may appear several
/// times, each occurrence going through its own converter.
pub fn parse_str<T, F, E>(
    line: &str,
    col_idxs: &[usize],
    converters: &[F],
    separator: Option<&str>,
) -> Result<Vec<T>, ParseError>
where
    F: Fn(&str) -> Result<T, E>,
    E: Into<ConvertError>,
{
    check_cardinality(col_idxs, converters)?;

    let tokens = split(line, separator)?;
    col_idxs
        .iter()
        .zip(converters)
        .map(|(&index, convert)| {
            let token: &str = tokens.get(index).ok_or(ParseError::IndexOutOfRange {
                index,
                tokens: tokens.len(),
                line: None,
            })?;
            convert(token).map_err(|e| ParseError::Conversion {
                index,
                token: token.to_string(),
                line: None,
                source: e.into(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn check_cardinality<F>(col_idxs: &[usize], converters: &[F]) -> Result<(), ParseError> {
    if col_idxs.len() != converters.len() {
        return Err(ParseError::CardinalityMismatch {
            indexes: col_idxs.len(),
            converters: converters.len(),
        });
    }
    Ok(())
}

fn parse_lines<I, S, T, F, E>(
    lines: I,
    first_line_no: usize,
    col_idxs: &[usize],
    converters: &[F],
    separator: Option<&str>,
) -> Result<Table<T>, ParseError>
where
    I: Iterator<Item = Result<S, ParseError>>,
    S: AsRef<str>,
    F: Fn(&str) -> Result<T, E>,
    E: Into<ConvertError>,
{
    let mut table = Table::with_width(col_idxs.len());
    for (offset, line) in lines.enumerate() {
        let line = line?;
        let row = parse_str(line.as_ref(), col_idxs, converters, separator)
            .map_err(|e| e.at(first_line_no + offset))?;
        table.push_row(row);
    }
    Ok(table)
}

/// `None` splits on whitespace runs and drops leading/trailing whitespace;
/// an explicit separator splits exactly and keeps empty tokens.
fn split<'a>(line: &'a str, separator: Option<&str>) -> Result<Vec<&'a str>, ParseError> {
    match separator {
        None => Ok(line.split_whitespace().collect()),
        Some("") => Err(ParseError::EmptySeparator),
        Some(sep) => Ok(line.split(sep).collect()),
    }
}
