mod capabilities;
mod capture_buffer;
mod capture_request;
mod capture_result;
mod display_info;
mod region_selection;
mod screen_region;
mod user_settings;

pub use capabilities::{Capabilities, PermissionStatus};
pub use capture_buffer::{CaptureBuffer, CapturedFrame};
pub use capture_request::{CaptureRequest, KeyIdentifier};
pub use capture_result::{CaptureResult, ExportResult};
pub use display_info::{select_capture_display, DisplayInfo};
pub use region_selection::{RegionSelection, SelectionOutcome};
pub use screen_region::{PixelRect, ScreenRegion};
pub use user_settings::{ThemeMode, UserSettings};
