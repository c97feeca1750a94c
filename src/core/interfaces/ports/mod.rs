mod document_exporter;
mod frame_store;
mod key_presser;
mod screen_capturer;

pub use document_exporter::{DocumentExporter, ExportedDocument};
pub use frame_store::FrameStore;
pub use key_presser::KeyPresser;
pub use screen_capturer::ScreenCapturer;
