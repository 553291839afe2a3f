//! cellgraph-core - UI-agnostic document model + storage.

pub mod document;
pub mod error;
pub mod storage;

pub use document::Document;
pub use error::{Result, StorageError};

pub use cellgraph_engine::engine::{EngineConfig, RecalcEngine, Spreadsheet};
