//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Fatal problems with the raw argument table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("no CSV data available")]
    Empty,

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("malformed root row at line {line}: expected {expected} fields, found {found}")]
    MalformedRoot {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("No data found")]
    NoData,
}

/// Fatal problems while linking records into a tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("root argument not found")]
    RootNotFound,

    #[error("duplicate argument id: {id} (line {line})")]
    DuplicateId { id: String, line: usize },

    #[error("argument {id} references unknown parent {parent_id}")]
    UnresolvedParent { id: String, parent_id: String },
}

/// Violated layout preconditions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("empty angular span: [{start}, {end})")]
    EmptySpan { start: f64, end: f64 },

    #[error("invalid radius {max_radius} or margin {margin}")]
    InvalidRadius { max_radius: f64, margin: f64 },

    #[error("node not in tree")]
    StaleNode,
}

/// Domain errors represent business logic violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),

    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("unknown argument: {0}")]
    UnknownNode(String),

    #[error("argument not reachable from root: {0}")]
    Unreachable(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
