use super::Document;
use crate::error::{Result, StorageError};
use crate::storage::{StoredSheet, read_sheet, write_sheet};
use log::info;
use std::path::{Path, PathBuf};

impl Document {
    /// Save to current file path.
    /// Returns the path saved to.
    pub fn save_file(&mut self) -> Result<PathBuf> {
        let Some(path) = self.file_path.clone() else {
            return Err(StorageError::NoFilePath);
        };
        self.write_to(&path)?;
        Ok(path)
    }

    /// Save to `path` and make it the current file path.
    pub fn save_as(&mut self, path: &Path) -> Result<PathBuf> {
        self.write_to(path)?;
        self.file_path = Some(path.to_path_buf());
        Ok(path.to_path_buf())
    }

    fn write_to(&mut self, path: &Path) -> Result<()> {
        let sheet = StoredSheet::capture(&self.engine);
        write_sheet(path, &sheet)?;
        self.engine.mark_saved();
        info!("Saved {} cell(s) to {}", sheet.cells.len(), path.display());
        Ok(())
    }

    /// Load from file.
    ///
    /// The file is replayed into a fresh engine built with this document's
    /// configuration; the document is only replaced once replay succeeds.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let sheet = read_sheet(path)?;
        let engine = sheet.replay(self.engine.config().clone())?;

        self.engine = engine;
        self.file_path = Some(path.to_path_buf());
        info!("Loaded {} cell(s) from {}", sheet.cells.len(), path.display());
        Ok(())
    }
}
