use thiserror::Error;

/// Boxed failure returned by a column converter.
pub type ConvertError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("number of column indexes ({indexes}) must match the number of converters ({converters})")]
    CardinalityMismatch { indexes: usize, converters: usize },

    #[error("column index {index} is out of range for a row of {tokens} columns{}", at_line(.line))]
    IndexOutOfRange {
        index: usize,
        tokens: usize,
        line: Option<usize>,
    },

    #[error("could not convert '{token}' in column {index}{}: {source}", at_line(.line))]
    Conversion {
        index: usize,
        token: String,
        line: Option<usize>,
        #[source]
        source: ConvertError,
    },

    #[error("separator must not be empty")]
    EmptySeparator,

    #[error("tried to skip {requested} lines but the file only has {available}")]
    UnexpectedEof { requested: usize, available: usize },

    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ParseError {
    /// Attach the 0-based line number to errors raised by a single-line parse.
    pub(crate) fn at(self, line_no: usize) -> Self {
        match self {
            ParseError::IndexOutOfRange { index, tokens, .. } => ParseError::IndexOutOfRange {
                index,
                tokens,
                line: Some(line_no),
            },
            ParseError::Conversion {
                index,
                token,
                source,
                ..
            } => ParseError::Conversion {
                index,
                token,
                line: Some(line_no),
                source,
            },
            other => other,
        }
    }
}

fn at_line(line: &Option<usize>) -> String {
    match line {
        Some(n) => format!(" (at line {n})"),
        None => String::new(),
    }
}

#[derive(Debug, Error)]
pub enum MassError {
    #[error("could not read the isotope file: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("could not read the isotope file: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    /// `line` is 0-based, like the line numbers of [`ParseError`].
    #[error("isotope file line {line} has {fields} fields, expected at least 6")]
    MalformedRow { line: usize, fields: usize },

    #[error("isotope data for '{symbol}' has a non-numeric {field}: '{value}'")]
    Conversion {
        symbol: String,
        field: &'static str,
        value: String,
    },

    #[error("no isotopes are known for '{0}'")]
    NoIsotopes(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElementError {
    #[error("could not initialize an element from the string '{0}'")]
    InvalidString(String),

    #[error("invalid cut file name: '{0}'")]
    InvalidCutFile(String),
}
