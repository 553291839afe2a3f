use crate::error::Result;
use cellgraph_engine::engine::{EngineConfig, RecalcEngine, Spreadsheet};
use std::path::PathBuf;

/// UI-agnostic document state for the spreadsheet.
#[derive(Debug, Default)]
pub struct Document {
    /// The recalculation engine holding every cell
    pub engine: RecalcEngine,
    /// Current file path
    pub file_path: Option<PathBuf>,
}

impl Document {
    /// Create a new, empty document with the default engine configuration.
    ///
    /// This constructor is side-effect free: it does not touch the filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Document {
            engine: RecalcEngine::with_config(config),
            file_path: None,
        }
    }

    /// Create a new document and load a file if provided.
    ///
    /// A path that does not exist yet becomes the save target of an empty document.
    pub fn with_file(path: Option<PathBuf>, config: EngineConfig) -> Result<Self> {
        let mut doc = Self::with_config(config);

        if let Some(p) = path {
            if p.exists() {
                doc.load_file(&p)?;
            } else {
                doc.file_path = Some(p);
            }
        }
        Ok(doc)
    }

    /// Whether the document has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.engine.changed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_is_clean() {
        let doc = Document::new();
        assert!(doc.engine.is_empty());
        assert!(doc.file_path.is_none());
        assert!(!doc.is_modified());
    }

    #[test]
    fn test_with_missing_file_sets_path() {
        let path = std::env::temp_dir().join(format!(
            "cellgraph_missing_{}_{:?}.sprd",
            std::process::id(),
            std::thread::current().id(),
        ));
        let doc = Document::with_file(Some(path.clone()), EngineConfig::default()).unwrap();
        assert_eq!(doc.file_path, Some(path));
        assert!(doc.engine.is_empty());
    }
}
