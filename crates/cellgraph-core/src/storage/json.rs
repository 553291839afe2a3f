//! Reader and writer for .sprd (JSON) documents

use super::StoredSheet;
use crate::error::Result;
use std::fs;
use std::path::Path;

/// Parse a .sprd file
pub fn parse_json(path: &Path) -> Result<StoredSheet> {
    let content = fs::read_to_string(path)?;
    parse_json_content(&content)
}

pub fn parse_json_content(content: &str) -> Result<StoredSheet> {
    Ok(serde_json::from_str(content)?)
}

/// Write a .sprd file
pub fn write_json(path: &Path, sheet: &StoredSheet) -> Result<()> {
    let content = write_json_content(sheet)?;
    fs::write(path, content)?;
    Ok(())
}

pub fn write_json_content(sheet: &StoredSheet) -> Result<String> {
    Ok(serde_json::to_string_pretty(sheet)? + "\n")
}
