//! Cell data structures.
//!
//! - [`CellContents`] - what the user entered (number, text or formula)
//! - [`CellValue`] - what the cell evaluates to (number, text or formula error)
//! - [`Cell`] - a stored, non-empty cell

use super::formula::{Formula, FormulaError};
use crate::error::FormulaFormatError;

/// The contents of a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellContents {
    Number(f64),
    Text(String),
    Formula(Formula),
}

/// The evaluated value of a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Error(FormulaError),
}

/// A non-empty cell. Empty cells are never stored.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub contents: CellContents,
    pub value: CellValue,
}

/// Parse a numeric literal as entered into a cell.
///
/// Surrounding whitespace is ignored; values that are not finite (`inf`,
/// `NaN`, `1e999`) are not numbers.
pub fn parse_number(input: &str) -> Option<f64> {
    input.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

impl CellContents {
    /// Classify user input.
    /// - Empty string -> `None` (the cell is cleared)
    /// - Numeric literal -> Number
    /// - Starts with '=' -> Formula (the rest is parsed with `normalize`/`is_valid`)
    /// - Otherwise -> Text, kept verbatim
    pub fn from_input<N, V>(
        input: &str,
        normalize: N,
        is_valid: V,
    ) -> Result<Option<CellContents>, FormulaFormatError>
    where
        N: Fn(&str) -> String,
        V: Fn(&str) -> bool,
    {
        if input.is_empty() {
            return Ok(None);
        }
        if let Some(n) = parse_number(input) {
            return Ok(Some(CellContents::Number(n)));
        }
        if let Some(formula) = input.strip_prefix('=') {
            return Formula::with(formula, normalize, is_valid).map(|f| Some(CellContents::Formula(f)));
        }
        Ok(Some(CellContents::Text(input.to_string())))
    }

    /// Textual form that re-creates these contents when entered again.
    pub fn to_input_string(&self) -> String {
        match self {
            CellContents::Number(n) => n.to_string(),
            CellContents::Text(s) => s.clone(),
            CellContents::Formula(f) => format!("={}", f),
        }
    }

    pub fn as_formula(&self) -> Option<&Formula> {
        match self {
            CellContents::Formula(f) => Some(f),
            _ => None,
        }
    }

    /// Empty text stands for an absent cell.
    pub(crate) fn empty() -> CellContents {
        CellContents::Text(String::new())
    }
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }

    pub(crate) fn empty() -> CellValue {
        CellValue::Text(String::new())
    }
}

impl From<Result<f64, FormulaError>> for CellValue {
    fn from(result: Result<f64, FormulaError>) -> Self {
        match result {
            Ok(n) => CellValue::Number(n),
            Err(e) => CellValue::Error(e),
        }
    }
}

impl Cell {
    /// Build a cell whose value passes contents through.
    ///
    /// Formula cells start with a placeholder error value; the engine evaluates
    /// them as part of recalculation.
    pub(crate) fn new(contents: CellContents) -> Cell {
        let value = match &contents {
            CellContents::Number(n) => CellValue::Number(*n),
            CellContents::Text(s) => CellValue::Text(s.clone()),
            CellContents::Formula(_) => CellValue::Error(FormulaError::new("Not yet evaluated")),
        };
        Cell { contents, value }
    }
}
