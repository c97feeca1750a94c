use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::models::CapturedFrame;

/// Blocking persistence of captured frames; the capture loop runs it on a
/// blocking worker.
pub trait FrameStore: Send + Sync {
    fn directory(&self) -> &Path;

    fn prepare(&self) -> Result<()>;

    fn persist(&self, frame: CapturedFrame) -> Result<PathBuf>;
}
