use std::path::{Path, PathBuf};

use crate::core::errors::ExportError;

#[derive(Debug, Clone, PartialEq)]
pub struct ExportedDocument {
    pub path: PathBuf,
    pub pages: usize,
}

pub trait DocumentExporter: Send + Sync {
    fn export(&self, frames_directory: &Path, output_directory: &Path)
        -> Result<ExportedDocument, ExportError>;
}
