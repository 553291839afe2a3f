//! Cellgraph recalculation engine.
//!
//! Tracks which cells depend on which, parses and evaluates infix formulas,
//! and recalculates every affected cell, in dependency order, when one changes.

pub mod engine;
pub mod error;

pub use error::{FormulaFormatError, Result, SpreadsheetError};
