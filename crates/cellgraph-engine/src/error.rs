//! Error types for the Cellgraph engine.

use thiserror::Error;

/// Why a formula's source text was rejected at construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaFormatError {
    #[error("Formula is empty")]
    Empty,

    #[error("Formula may not start with an operator")]
    LeadingOperator,

    #[error("Formula may not end with an operator")]
    TrailingOperator,

    #[error("An opening parenthesis may not be followed by an operator")]
    OperatorAfterOpenParen,

    #[error("Empty parentheses")]
    EmptyParentheses,

    #[error("Closing parenthesis without a matching opening parenthesis")]
    UnmatchedCloseParen,

    #[error("A closing parenthesis must be followed by another closing parenthesis or an operator")]
    InvalidAfterCloseParen,

    #[error("Two operators in a row")]
    ConsecutiveOperators,

    #[error("A number must be followed by a closing parenthesis or an operator")]
    InvalidAfterNumber,

    #[error("A variable must be followed by a closing parenthesis or an operator")]
    InvalidAfterVariable,

    #[error("Invalid token in formula: {0}")]
    InvalidToken(String),

    #[error("Invalid variable in formula: {0}")]
    InvalidVariable(String),

    #[error("Unbalanced parentheses: {open} opening, {close} closing")]
    UnbalancedParentheses { open: usize, close: usize },
}

/// Errors raised by spreadsheet accessors and mutators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpreadsheetError {
    #[error("Invalid cell name: {0}")]
    InvalidName(String),

    #[error("Invalid formula: {0}")]
    FormulaFormat(#[from] FormulaFormatError),

    #[error("Circular dependency detected: {}", cycle.join(" -> "))]
    CircularDependency { cell: String, cycle: Vec<String> },
}

pub type Result<T> = std::result::Result<T, SpreadsheetError>;
