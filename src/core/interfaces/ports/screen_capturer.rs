use anyhow::Result;
use async_trait::async_trait;

use crate::core::models::{CaptureBuffer, DisplayInfo};

#[async_trait]
pub trait ScreenCapturer: Send + Sync {
    fn list_displays(&self) -> Result<Vec<DisplayInfo>>;

    /// Captures the display chosen by the capture policy at native
    /// resolution. Fails with `CaptureError::NoCaptureSource` when nothing
    /// can be captured.
    async fn capture_primary_display(&self) -> Result<(DisplayInfo, CaptureBuffer)>;
}
