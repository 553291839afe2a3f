//! Writer for .grd file format

use super::StoredSheet;
use crate::error::Result;
use cellgraph_engine::engine::parse_number;
use std::fs;
use std::path::Path;

/// Write a sheet to a .grd file
pub fn write_grd(path: &Path, sheet: &StoredSheet) -> Result<()> {
    let content = write_grd_content(sheet);
    fs::write(path, content)?;
    Ok(())
}

/// Write a sheet to a .grd format string
pub fn write_grd_content(sheet: &StoredSheet) -> String {
    let mut lines = vec![
        "# Cellgraph Spreadsheet".to_string(),
        format!("# version: {}", sheet.version),
    ];

    // BTreeMap iteration keeps the output sorted by name.
    for (name, cell) in &sheet.cells {
        let contents = &cell.contents;
        let value = if contents.starts_with('=') || parse_number(contents).is_some() {
            contents.clone()
        } else {
            format!("\"{}\"", escape_grd_text(contents))
        };
        lines.push(format!("{}: {}", name, value));
    }

    lines.join("\n") + "\n"
}

fn escape_grd_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out
}
