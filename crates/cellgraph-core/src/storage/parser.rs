//! Parser for .grd file format

use super::{StoredCell, StoredSheet};
use crate::error::{Result, StorageError};
use cellgraph_engine::engine::{DEFAULT_VERSION, parse_number};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const VERSION_PREFIX: &str = "version:";

/// Parse a .grd file
pub fn parse_grd(path: &Path) -> Result<StoredSheet> {
    let content = fs::read_to_string(path)?;
    parse_grd_content(&content)
}

/// Parse .grd content from a string.
///
/// A `# version: <tag>` comment sets the document's version; without one the
/// document carries the default tag.
pub fn parse_grd_content(content: &str) -> Result<StoredSheet> {
    let mut version: Option<String> = None;
    let mut cells = BTreeMap::new();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();

        if let Some(comment) = line.strip_prefix('#') {
            if let Some(tag) = comment.trim().strip_prefix(VERSION_PREFIX) {
                if version.is_none() {
                    version = Some(tag.trim().to_string());
                }
            }
            continue;
        }
        if line.is_empty() {
            continue;
        }

        // Parse "NAME: VALUE" format
        let Some((name, value)) = line.split_once(':') else {
            return Err(StorageError::Parse {
                line: line_num + 1,
                message: "Expected 'NAME: VALUE' format".to_string(),
            });
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(StorageError::Parse {
                line: line_num + 1,
                message: "Missing cell name".to_string(),
            });
        }

        if let Some(contents) = parse_cell_value(value, line_num + 1)? {
            cells.insert(name.to_string(), StoredCell { contents });
        }
    }

    Ok(StoredSheet {
        version: version.unwrap_or_else(|| DEFAULT_VERSION.to_string()),
        cells,
    })
}

/// Parse a cell value string into its textual form. Empty values are skipped.
fn parse_cell_value(value: &str, line_num: usize) -> Result<Option<String>> {
    let value = value.trim();

    if value.is_empty() {
        return Ok(None);
    }

    // Formula: starts with '='
    if value.starts_with('=') {
        return Ok(Some(value.to_string()));
    }

    // Quoted string: starts and ends with '"'
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        let text = &value[1..value.len() - 1];
        return Ok(Some(unescape_grd_text(text)));
    }

    if parse_number(value).is_some() {
        return Ok(Some(value.to_string()));
    }

    Err(StorageError::Parse {
        line: line_num,
        message: format!("Invalid value: {}. Use quotes for text.", value),
    })
}

fn unescape_grd_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
