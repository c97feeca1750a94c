use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::interfaces::ports::FrameStore;
use crate::core::models::CapturedFrame;
use crate::global_constants::{
    LOG_TAG_FRAME_STORE, SCREENSHOT_FILE_EXTENSION, SCREENSHOT_FILE_PREFIX,
};

/// Writes frames as PNG files into one directory.
pub struct PngFrameStore {
    directory: PathBuf,
}

impl PngFrameStore {
    pub fn build(directory: PathBuf) -> Self {
        Self { directory }
    }

    pub fn file_name_for(frame: &CapturedFrame) -> String {
        format!(
            "{}_{:04}_{}.{}",
            SCREENSHOT_FILE_PREFIX,
            frame.ordinal,
            frame.captured_at.timestamp_millis(),
            SCREENSHOT_FILE_EXTENSION
        )
    }
}

impl FrameStore for PngFrameStore {
    fn directory(&self) -> &Path {
        &self.directory
    }

    fn prepare(&self) -> Result<()> {
        std::fs::create_dir_all(&self.directory)
            .with_context(|| format!("failed to create {:?}", self.directory))
    }

    fn persist(&self, frame: CapturedFrame) -> Result<PathBuf> {
        let path = self.directory.join(Self::file_name_for(&frame));
        let (width, height) = (frame.buffer.width, frame.buffer.height);

        frame
            .buffer
            .into_rgba_image()?
            .save_with_format(&path, image::ImageFormat::Png)
            .with_context(|| format!("failed to write {:?}", path))?;

        log::debug!(
            "{} Wrote {}x{} frame to {:?}",
            LOG_TAG_FRAME_STORE,
            width,
            height,
            path
        );
        Ok(path)
    }
}
