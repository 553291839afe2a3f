//! Spreadsheet engine API.
//!
//! This module provides the recalculation engine for the spreadsheet:
//!
//! - [`DependencyGraph`] - Bidirectional "depends on" relation over cell names
//! - [`Formula`] - Parsed infix formulas with a canonical form
//! - [`Cell`], [`CellContents`], [`CellValue`] - Data structures for cell storage
//! - [`is_cell_name`] - Cell name validity (letters then digits)
//! - [`cells_to_recalculate`] - Recalculation order and cycle detection
//! - [`RecalcEngine`] - The [`Spreadsheet`] implementation
//! - [`format_value`] - Format values for display

mod cell;
mod config;
mod format;
mod formula;
mod graph;
mod name;
mod order;
mod sheet;

pub use cell::{Cell, CellContents, CellValue, parse_number};
pub use config::{DEFAULT_VERSION, EngineConfig, NameCase, Normalizer, Validator};
pub use format::{format_number, format_value};
pub use formula::{Formula, FormulaError, LookupError, Operator};
pub use graph::DependencyGraph;
pub use name::is_cell_name;
pub use order::{Cycle, cells_to_recalculate};
pub use sheet::{RecalcEngine, Spreadsheet};
