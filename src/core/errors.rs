use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CaptureError {
    #[error("screenshot count must be at least 1, got {0}")]
    InvalidCount(u32),
    #[error("capture interval must be at least {minimum:?}, got {requested:?}")]
    InvalidInterval {
        requested: Duration,
        minimum: Duration,
    },
    #[error("unknown key identifier: {0:?}")]
    UnknownKey(String),
    #[error("a capture run is already in progress")]
    AlreadyRunning,
    #[error("a region selection is already open")]
    SelectorAlreadyOpen,
    #[error("the selected region is not on the captured display")]
    RegionOffCaptureDisplay,
    #[error("{}", crate::global_constants::MESSAGE_NO_CAPTURE_SOURCE)]
    NoCaptureSource,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{}", crate::global_constants::MESSAGE_NO_FRAMES_TO_EXPORT)]
    NoFrames,
    #[error("failed to access {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Image {
        path: std::path::PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to write document: {0}")]
    Pdf(#[from] lopdf::Error),
}
