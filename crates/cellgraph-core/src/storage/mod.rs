//! Storage module for .sprd (JSON) and .grd (plain text) documents.
//!
//! Both formats hold the same thing: a version tag and, for every non-empty
//! cell, the textual form that re-creates its contents when entered again.
//! Loading never restores values directly; the stored entries are replayed
//! through the engine so dependencies and values are rebuilt from scratch.

mod json;
mod parser;
mod writer;

use std::collections::BTreeMap;
use std::path::Path;

use cellgraph_engine::SpreadsheetError;
use cellgraph_engine::engine::{EngineConfig, RecalcEngine, Spreadsheet};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StorageError};

pub use json::{parse_json, parse_json_content, write_json, write_json_content};
pub use parser::{parse_grd, parse_grd_content};
pub use writer::{write_grd, write_grd_content};

/// A persisted cell: its textual form (`=formula`, number, or raw text).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredCell {
    #[serde(alias = "stringForm")]
    pub contents: String,
}

/// The persisted form of a spreadsheet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredSheet {
    pub version: String,
    pub cells: BTreeMap<String, StoredCell>,
}

impl StoredSheet {
    /// Snapshot every non-empty cell of `engine`.
    pub fn capture<S: Spreadsheet>(engine: &S) -> StoredSheet {
        let mut cells = BTreeMap::new();
        for name in engine.get_names_of_all_nonempty_cells() {
            if let Ok(contents) = engine.get_cell_contents(&name) {
                cells.insert(
                    name,
                    StoredCell {
                        contents: contents.to_input_string(),
                    },
                );
            }
        }
        StoredSheet {
            version: engine.version().to_string(),
            cells,
        }
    }

    /// Build a fresh engine with `config` and replay every stored entry into it.
    ///
    /// The version tag must match `config.version` before anything is replayed.
    /// The returned engine reports no unsaved changes.
    pub fn replay(&self, config: EngineConfig) -> Result<RecalcEngine> {
        if self.version != config.version {
            return Err(StorageError::VersionMismatch {
                expected: config.version,
                found: self.version.clone(),
            });
        }

        let mut engine = RecalcEngine::with_config(config);
        for (name, cell) in &self.cells {
            debug!("Replaying {}: {}", name, cell.contents);
            engine
                .set_contents_of_cell(name, &cell.contents)
                .map_err(|e| replay_error(name, e))?;
        }
        engine.mark_saved();
        Ok(engine)
    }
}

fn replay_error(cell: &str, err: SpreadsheetError) -> StorageError {
    StorageError::Replay {
        cell: cell.to_string(),
        message: err.to_string(),
    }
}

/// On-disk document formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// `{"version": ..., "cells": {...}}`
    Json,
    /// `# version: ...` header followed by `NAME: VALUE` lines.
    Grd,
}

impl Format {
    /// `.grd` files use the text format; everything else is JSON.
    pub fn from_path(path: &Path) -> Format {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("grd") => Format::Grd,
            _ => Format::Json,
        }
    }
}

/// Read a document, picking the format from the file extension.
pub fn read_sheet(path: &Path) -> Result<StoredSheet> {
    match Format::from_path(path) {
        Format::Json => parse_json(path),
        Format::Grd => parse_grd(path),
    }
}

/// Write a document, picking the format from the file extension.
pub fn write_sheet(path: &Path, sheet: &StoredSheet) -> Result<()> {
    match Format::from_path(path) {
        Format::Json => write_json(path, sheet),
        Format::Grd => write_grd(path, sheet),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellgraph_engine::engine::{CellValue, NameCase};

    fn sheet(version: &str, cells: &[(&str, &str)]) -> StoredSheet {
        StoredSheet {
            version: version.to_string(),
            cells: cells
                .iter()
                .map(|(name, contents)| {
                    (
                        name.to_string(),
                        StoredCell {
                            contents: contents.to_string(),
                        },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn test_capture() {
        let mut engine = RecalcEngine::new();
        engine.set_contents_of_cell("A1", "10.000").unwrap();
        engine.set_contents_of_cell("A2", "Math").unwrap();
        engine.set_contents_of_cell("A3", "=A1 + A1").unwrap();

        let stored = StoredSheet::capture(&engine);
        assert_eq!(stored, sheet("default", &[("A1", "10"), ("A2", "Math"), ("A3", "=A1+A1")]));
    }

    #[test]
    fn test_replay_in_any_order() {
        // B1 is replayed before the cell it depends on.
        let stored = sheet("default", &[("A2", "4"), ("B1", "=A2 * 2"), ("A1", "=B1 + A2")]);
        let engine = stored.replay(EngineConfig::default()).unwrap();
        assert_eq!(engine.get_cell_value("A1").unwrap(), CellValue::Number(12.0));
        assert!(!engine.changed());
    }

    #[test]
    fn test_replay_version_mismatch() {
        let stored = sheet("v1", &[("A1", "1")]);
        let err = stored.replay(EngineConfig::new("v2")).unwrap_err();
        assert!(matches!(
            err,
            StorageError::VersionMismatch { ref expected, ref found } if expected == "v2" && found == "v1"
        ));
    }

    #[test]
    fn test_replay_reports_engine_errors_as_one_kind() {
        let err = sheet("default", &[("1A", "1")])
            .replay(EngineConfig::default())
            .unwrap_err();
        assert!(matches!(err, StorageError::Replay { ref cell, .. } if cell == "1A"));
        assert_eq!(err.to_string(), "Cannot load cell 1A: Invalid cell name: 1A");

        let err = sheet("default", &[("A1", "=1 +")])
            .replay(EngineConfig::default())
            .unwrap_err();
        assert!(matches!(err, StorageError::Replay { ref cell, .. } if cell == "A1"));
        assert!(err.to_string().contains("Invalid formula"));

        let err = sheet("default", &[("A1", "=B1"), ("B1", "=A1")])
            .replay(EngineConfig::default())
            .unwrap_err();
        assert!(matches!(err, StorageError::Replay { ref cell, .. } if cell == "B1"));
        assert!(err.to_string().contains("Circular dependency detected"));
    }

    #[test]
    fn test_replay_uses_normalizer() {
        let config = EngineConfig::default().with_name_case(NameCase::Upper);
        let engine = sheet("default", &[("a1", "2"), ("b1", "=a1 * 3")])
            .replay(config)
            .unwrap();
        assert_eq!(engine.get_names_of_all_nonempty_cells(), vec!["A1", "B1"]);
        assert_eq!(engine.get_cell_value("B1").unwrap(), CellValue::Number(6.0));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a.grd")), Format::Grd);
        assert_eq!(Format::from_path(Path::new("a.GRD")), Format::Grd);
        assert_eq!(Format::from_path(Path::new("a.sprd")), Format::Json);
        assert_eq!(Format::from_path(Path::new("a")), Format::Json);
    }
}
