//! Save-file collaborators.

use std::path::{Path, PathBuf};

use crate::error::ReconError;
use crate::model::SavedLayout;

/// Anything that can hand the session a saved layout.
pub trait LayoutSource {
    fn load(&self) -> Result<SavedLayout, ReconError>;
}

/// Anything that can persist a saved layout.
pub trait LayoutSink {
    fn save(&self, layout: &SavedLayout) -> Result<(), ReconError>;
}

/// Layout stored as pretty-printed JSON on disk.
#[derive(Debug, Clone)]
pub struct JsonLayoutFile {
    path: PathBuf,
}

impl JsonLayoutFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LayoutSource for JsonLayoutFile {
    fn load(&self) -> Result<SavedLayout, ReconError> {
        let data = std::fs::read_to_string(&self.path)
            .map_err(|e| ReconError::Import(format!("cannot read {}: {e}", self.path.display())))?;
        serde_json::from_str(&data)
            .map_err(|e| ReconError::Import(format!("{}: {e}", self.path.display())))
    }
}

impl LayoutSink for JsonLayoutFile {
    fn save(&self, layout: &SavedLayout) -> Result<(), ReconError> {
        let json = serde_json::to_string_pretty(layout)
            .map_err(|e| ReconError::Io(format!("JSON serialization error: {e}")))?;
        std::fs::write(&self.path, json)
            .map_err(|e| ReconError::Io(format!("cannot write {}: {e}", self.path.display())))
    }
}
