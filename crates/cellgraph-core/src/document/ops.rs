use super::Document;
use cellgraph_engine::Result;
use cellgraph_engine::engine::{CellValue, Spreadsheet, format_value};
use log::debug;

impl Document {
    /// Set a cell from user input.
    ///
    /// Returns the names whose values may have changed, the edited cell first.
    /// On error the document is left exactly as it was.
    pub fn set_cell_from_input(&mut self, name: &str, input: &str) -> Result<Vec<String>> {
        let affected = self.engine.set_contents_of_cell(name, input)?;
        debug!("Edit of {} touched {} cell(s)", name, affected.len());
        Ok(affected)
    }

    /// Clear a cell. Returns the names whose values may have changed.
    pub fn clear_cell(&mut self, name: &str) -> Result<Vec<String>> {
        self.set_cell_from_input(name, "")
    }

    /// Get the display value for a cell. Invalid names display as empty.
    pub fn get_cell_display(&self, name: &str) -> String {
        self.engine
            .get_cell_value(name)
            .map(|value| format_value(&value))
            .unwrap_or_default()
    }

    /// Get the textual form of a cell's contents, as it would be entered.
    pub fn get_cell_input(&self, name: &str) -> Result<String> {
        Ok(self.engine.get_cell_contents(name)?.to_input_string())
    }

    /// Evaluate a one-off formula against the document without storing it.
    /// A leading `=` is optional.
    pub fn evaluate_formula(&self, text: &str) -> Result<CellValue> {
        let text = text.trim();
        let text = text.strip_prefix('=').unwrap_or(text);
        let formula = self.engine.parse_formula(text)?;
        Ok(self.engine.evaluate(&formula))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellgraph_engine::SpreadsheetError;

    #[test]
    fn test_set_and_display() {
        let mut doc = Document::new();
        doc.set_cell_from_input("A1", "10").unwrap();
        doc.set_cell_from_input("A2", "=A1 / 4").unwrap();
        assert_eq!(doc.get_cell_display("A1"), "10");
        assert_eq!(doc.get_cell_display("A2"), "2.50");
        assert_eq!(doc.get_cell_input("A2").unwrap(), "=A1/4");
        assert!(doc.is_modified());
    }

    #[test]
    fn test_display_errors_and_empty() {
        let mut doc = Document::new();
        doc.set_cell_from_input("A1", "=1 / 0").unwrap();
        assert_eq!(doc.get_cell_display("A1"), "#ERR: Cannot divide by zero");
        assert_eq!(doc.get_cell_display("B7"), "");
        assert_eq!(doc.get_cell_display("not a name"), "");
    }

    #[test]
    fn test_clear_cell_reports_dependents() {
        let mut doc = Document::new();
        doc.set_cell_from_input("A1", "1").unwrap();
        doc.set_cell_from_input("B1", "=A1 + 1").unwrap();
        assert_eq!(doc.clear_cell("A1").unwrap(), vec!["A1", "B1"]);
        assert!(doc.engine.cell("A1").is_none());
    }

    #[test]
    fn test_circular_edit_is_rejected() {
        let mut doc = Document::new();
        doc.set_cell_from_input("A1", "=B1").unwrap();
        let err = doc.set_cell_from_input("B1", "=A1 * 2").unwrap_err();
        assert!(matches!(err, SpreadsheetError::CircularDependency { .. }));
        assert_eq!(doc.get_cell_display("B1"), "");
    }

    #[test]
    fn test_evaluate_formula() {
        let mut doc = Document::new();
        doc.set_cell_from_input("A1", "3").unwrap();
        assert_eq!(doc.evaluate_formula("=A1 * (2 + 1)").unwrap(), CellValue::Number(9.0));
        assert_eq!(doc.evaluate_formula("5 + 3").unwrap(), CellValue::Number(8.0));
        assert!(doc.evaluate_formula("1/0").unwrap().is_error());
        assert!(matches!(
            doc.evaluate_formula("2 +"),
            Err(SpreadsheetError::FormulaFormat(_))
        ));
    }
}
