//! The recalculation engine.
//!
//! [`RecalcEngine`] owns the cell store and a [`DependencyGraph`] whose edges
//! mirror the variable references of the stored formula cells: `(v, c)` is
//! present iff cell `c` holds a formula that references `v`. Every mutation
//! either commits fully or leaves the engine exactly as it was.

use std::collections::BTreeMap;

use log::{debug, warn};

use super::cell::{Cell, CellContents, CellValue};
use super::config::EngineConfig;
use super::formula::{Formula, LookupError};
use super::graph::DependencyGraph;
use super::name::is_cell_name;
use super::order::cells_to_recalculate;
use crate::error::{Result, SpreadsheetError};

/// The operations a spreadsheet offers to presentation and persistence code.
pub trait Spreadsheet {
    /// Names of all non-empty cells, sorted.
    fn get_names_of_all_nonempty_cells(&self) -> Vec<String>;

    /// Contents of a cell; empty text if the cell is empty.
    fn get_cell_contents(&self, name: &str) -> Result<CellContents>;

    /// Value of a cell; empty text if the cell is empty.
    fn get_cell_value(&self, name: &str) -> Result<CellValue>;

    /// Set a cell from user input and recalculate.
    ///
    /// Returns the changed cell followed by every cell that depends on it,
    /// directly or indirectly, each after all of its prerequisites.
    fn set_contents_of_cell(&mut self, name: &str, content: &str) -> Result<Vec<String>>;

    /// Whether the sheet changed since it was created, loaded or last saved.
    fn changed(&self) -> bool;

    fn version(&self) -> &str;
}

/// A dependency-tracked cell store.
#[derive(Debug, Default)]
pub struct RecalcEngine {
    cells: BTreeMap<String, Cell>,
    graph: DependencyGraph,
    config: EngineConfig,
    changed: bool,
}

impl RecalcEngine {
    /// Identity normalizer, accept-everything validator, version `"default"`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        RecalcEngine {
            cells: BTreeMap::new(),
            graph: DependencyGraph::new(),
            config,
            changed: false,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn dependency_graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// The stored cell for `name`, if the name is valid and the cell is non-empty.
    pub fn cell(&self, name: &str) -> Option<&Cell> {
        let name = self.normalize_name(name).ok()?;
        self.cells.get(&name)
    }

    /// Number of non-empty cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Clear the changed flag after the sheet has been persisted.
    pub fn mark_saved(&mut self) {
        self.changed = false;
    }

    /// Evaluate a formula against the current cell values without storing it.
    pub fn evaluate(&self, formula: &Formula) -> CellValue {
        CellValue::from(formula.evaluate(|name| self.lookup(name)))
    }

    /// Parse formula text with this engine's normalizer and validator.
    pub fn parse_formula(&self, text: &str) -> Result<Formula> {
        Ok(Formula::with(
            text,
            |v| self.config.normalize(v),
            |v| self.config.is_valid(v),
        )?)
    }

    fn normalize_name(&self, name: &str) -> Result<String> {
        let normalized = self.config.normalize(name);
        if is_cell_name(&normalized) && self.config.is_valid(&normalized) {
            Ok(normalized)
        } else {
            Err(SpreadsheetError::InvalidName(name.to_string()))
        }
    }

    /// Numeric value of a cell, as seen by formulas.
    fn lookup(&self, name: &str) -> std::result::Result<f64, LookupError> {
        let name = self.config.normalize(name);
        if !is_cell_name(&name) || !self.config.is_valid(&name) {
            return Err(LookupError::InvalidName(name));
        }
        match self.cells.get(&name).map(|cell| &cell.value) {
            None => Err(LookupError::Empty(name)),
            Some(CellValue::Number(n)) => Ok(*n),
            Some(CellValue::Text(_)) => Err(LookupError::NotANumber(name)),
            Some(CellValue::Error(e)) => Err(LookupError::Upstream {
                cell: name,
                reason: e.reason().to_string(),
            }),
        }
    }

    /// Install `contents` at `name` (or clear it) and recalculate.
    fn apply(&mut self, name: String, contents: Option<CellContents>) -> Result<Vec<String>> {
        let prior_dependees: Vec<String> = self.graph.dependees(&name).iter().cloned().collect();
        let variables = contents
            .as_ref()
            .and_then(CellContents::as_formula)
            .map(Formula::variables)
            .unwrap_or_default();

        self.graph.replace_dependees(&name, &variables);

        let order = match cells_to_recalculate(&self.graph, &name) {
            Ok(order) => order,
            Err(cycle) => {
                self.graph.replace_dependees(&name, &prior_dependees);
                warn!(
                    "Rejected edit to {}: circular dependency {}",
                    name,
                    cycle.path.join(" -> ")
                );
                return Err(SpreadsheetError::CircularDependency {
                    cell: name,
                    cycle: cycle.path,
                });
            }
        };

        match contents {
            Some(contents) => {
                self.cells.insert(name.clone(), Cell::new(contents));
            }
            None => {
                self.cells.remove(&name);
            }
        }
        self.recalculate(&order);
        self.changed = true;

        debug!("Set {}: {} cell(s) recalculated", name, order.len());
        Ok(order)
    }

    /// Re-evaluate the formula cells in `order`, in that order.
    fn recalculate(&mut self, order: &[String]) {
        for name in order {
            let value = match self.cells.get(name).map(|cell| &cell.contents) {
                Some(CellContents::Formula(formula)) => self.evaluate(formula),
                _ => continue,
            };
            if let Some(cell) = self.cells.get_mut(name) {
                cell.value = value;
            }
        }
    }
}

impl Spreadsheet for RecalcEngine {
    fn get_names_of_all_nonempty_cells(&self) -> Vec<String> {
        self.cells.keys().cloned().collect()
    }

    fn get_cell_contents(&self, name: &str) -> Result<CellContents> {
        let name = self.normalize_name(name)?;
        Ok(self
            .cells
            .get(&name)
            .map_or_else(CellContents::empty, |cell| cell.contents.clone()))
    }

    fn get_cell_value(&self, name: &str) -> Result<CellValue> {
        let name = self.normalize_name(name)?;
        Ok(self
            .cells
            .get(&name)
            .map_or_else(CellValue::empty, |cell| cell.value.clone()))
    }

    fn set_contents_of_cell(&mut self, name: &str, content: &str) -> Result<Vec<String>> {
        let name = self.normalize_name(name)?;
        let contents = CellContents::from_input(
            content,
            |v| self.config.normalize(v),
            |v| self.config.is_valid(v),
        )?;
        self.apply(name, contents)
    }

    fn changed(&self) -> bool {
        self.changed
    }

    fn version(&self) -> &str {
        &self.config.version
    }
}
