//! Domain entities: core data structures

use std::fmt;

use serde::Serialize;

/// Stance of an argument towards its parent.
///
/// Encoded as an integer in the input table: `1` supports, any other value opposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "i64")]
pub enum Sentiment {
    Supporting,
    Opposing(i64),
}

impl Sentiment {
    pub const SUPPORTING_VALUE: i64 = 1;

    pub fn from_value(value: i64) -> Self {
        if value == Self::SUPPORTING_VALUE {
            Sentiment::Supporting
        } else {
            Sentiment::Opposing(value)
        }
    }

    /// Raw integer encoding, used for ordering siblings.
    pub fn value(&self) -> i64 {
        match self {
            Sentiment::Supporting => Self::SUPPORTING_VALUE,
            Sentiment::Opposing(v) => *v,
        }
    }

    pub fn is_supporting(&self) -> bool {
        matches!(self, Sentiment::Supporting)
    }
}

impl From<Sentiment> for i64 {
    fn from(s: Sentiment) -> Self {
        s.value()
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Supporting => write!(f, "pro"),
            Sentiment::Opposing(_) => write!(f, "con"),
        }
    }
}

/// One flat row of the argument table.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentRecord {
    pub id: String,
    pub text: String,
    /// May be NaN when the source field was not a number
    pub weight: f64,
    pub sentiment: Sentiment,
    /// None for the root and for rows with an empty parent column
    pub parent_id: Option<String>,
    /// 1-based line in the source text
    pub line: usize,
}

impl ArgumentRecord {
    pub fn new(id: impl Into<String>, text: impl Into<String>, weight: f64, sentiment: Sentiment) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            weight,
            sentiment,
            parent_id: None,
            line: 0,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        let parent_id = parent_id.into();
        self.parent_id = if parent_id.is_empty() { None } else { Some(parent_id) };
        self
    }
}

/// Recoverable problems found while reading the table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseWarning {
    #[error("line {line}: expected {expected} fields, found {found}; row skipped")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: weight {value:?} is not a number")]
    InvalidWeight { line: usize, value: String },

    #[error("line {line}: sentiment {value:?} is not an integer")]
    InvalidSentiment { line: usize, value: String },
}

/// Records parsed from a table plus the rows that needed attention.
#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    pub records: Vec<ArgumentRecord>,
    pub warnings: Vec<ParseWarning>,
}
