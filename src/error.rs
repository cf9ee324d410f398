//! Error types for the factored-dbn crate
//!
//! Every failure here is a construction-time configuration problem: malformed
//! scopes, tables that are not stochastic matrices, or diff/action entries
//! that do not fit the declared spaces. Probability queries themselves are
//! pure and never fail once a network has been validated; a query whose
//! partial assignment is missing a required parent or action variable is a
//! caller programming error and panics instead (see the query docs).

use thiserror::Error;

/// Main error type for the factored-dbn crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("factor space must have at least one variable")]
    EmptySpace,

    #[error("variable {variable} has cardinality 0 (must be at least 1)")]
    ZeroCardinality { variable: usize },

    #[error("tag {ids:?} is not strictly increasing at position {position}")]
    UnsortedTag { ids: Vec<usize>, position: usize },

    #[error("partial assignment has {values} values for a tag of {tag} variables")]
    AssignmentLength { tag: usize, values: usize },

    #[error("matrix must have at least one row")]
    EmptyMatrix,

    #[error("matrix row {row} has {got} columns, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("matrix data has {got} entries for a {rows}x{cols} shape")]
    MatrixDataLength {
        rows: usize,
        cols: usize,
        got: usize,
    },

    #[error("network has {got} nodes for a space of {expected} variables")]
    NetworkSize { expected: usize, got: usize },

    #[error(
        "node for variable {variable} references parent {parent}, outside the space of {space} variables"
    )]
    ParentOutOfRange {
        variable: usize,
        parent: usize,
        space: usize,
    },

    #[error(
        "node for variable {variable} has a {rows}x{cols} table, expected {expected_rows}x{expected_cols}"
    )]
    TableShape {
        variable: usize,
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },

    #[error(
        "table for variable {variable} has negative probability {value} at row {row}, column {column}"
    )]
    NegativeProbability {
        variable: usize,
        row: usize,
        column: usize,
        value: f64,
    },

    #[error("row {row} of variable {variable}'s table sums to {sum}, expected 1")]
    RowSum {
        variable: usize,
        row: usize,
        sum: f64,
    },

    #[error(
        "diff for action {action} overrides variable {variable}, but the default network has {network} variables"
    )]
    DiffOutOfRange {
        action: usize,
        variable: usize,
        network: usize,
    },

    #[error(
        "variable {variable} references action variable {action_variable}, outside the action space of {actions} variables"
    )]
    ActionVariableOutOfRange {
        variable: usize,
        action_variable: usize,
        actions: usize,
    },

    #[error(
        "variable {variable} has {got} action tables, expected {expected} (one per joint assignment of its action tag)"
    )]
    ActionTableCount {
        variable: usize,
        expected: usize,
        got: usize,
    },

    #[error("basis function over tag {tag:?} has {got} values, expected {expected}")]
    BasisLength {
        tag: Vec<usize>,
        expected: usize,
        got: usize,
    },

    #[error(
        "basis matrix over tags {tag:?}/{action_tag:?} is {rows}x{cols}, expected {expected_rows}x{expected_cols}"
    )]
    BasisMatrixShape {
        tag: Vec<usize>,
        action_tag: Vec<usize>,
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
