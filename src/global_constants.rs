#![allow(dead_code)]

use std::time::Duration;

pub const APPLICATION_TITLE: &str = "Booker";
pub const APPLICATION_DIRECTORY_NAME: &str = "booker";

pub const LOG_TAG_APP: &str = "[APP]";
pub const LOG_TAG_ORCHESTRATOR: &str = "[ORCHESTRATOR]";
pub const LOG_TAG_CAPTURE: &str = "[CAPTURE]";
pub const LOG_TAG_CAPTURE_LOOP: &str = "[CAPTURE_LOOP]";
pub const LOG_TAG_KEYBOARD: &str = "[KEYBOARD]";
pub const LOG_TAG_KEY_PRESS: &str = "[KEY_PRESS]";
pub const LOG_TAG_KEY_HELPER: &str = "[KEY_HELPER]";
pub const LOG_TAG_FRAME_STORE: &str = "[FRAME_STORE]";
pub const LOG_TAG_EXPORT: &str = "[EXPORT]";
pub const LOG_TAG_SESSION: &str = "[SESSION]";
pub const LOG_TAG_CAPABILITIES: &str = "[CAPABILITIES]";

pub const ERROR_CONTEXT_SCALE_FACTOR: &str = "Unable to get scale factor";
pub const ERROR_CONTEXT_CAPTURE_MONITOR: &str = "Unable to capture Monitor";
pub const ERROR_CONTEXT_LIST_MONITORS: &str = "Unable to list monitors";

pub const PREPARATION_DELAY: Duration = Duration::from_secs(3);
pub const MINIMUM_CAPTURE_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_CAPTURE_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_CAPTURE_COUNT: u32 = 10;
pub const DEFAULT_KEY_NAME: &str = "space";

pub const MINIMUM_REGION_SIZE: u32 = 10;

pub const KEY_HELPER_ARGUMENT: &str = "--key-helper";
pub const KEY_HELPER_READY: &str = "READY";
pub const KEY_HELPER_DONE: &str = "DONE";
pub const KEY_HELPER_ERROR_PREFIX: &str = "ERROR";
pub const KEY_HELPER_STARTUP_TIMEOUT: Duration = Duration::from_secs(5);

pub const SCREENSHOTS_DIRECTORY_NAME: &str = "screenshots";
pub const OUTPUT_DIRECTORY_NAME: &str = "output";
pub const SCREENSHOT_FILE_PREFIX: &str = "screenshot";
pub const SCREENSHOT_FILE_EXTENSION: &str = "png";
pub const DOCUMENT_FILE_PREFIX: &str = "booker";
pub const DOCUMENT_FILE_EXTENSION: &str = "pdf";

pub const MESSAGE_NO_CAPTURE_SOURCE: &str =
    "No screen sources found. Please grant screen recording permission.";
pub const MESSAGE_NO_FRAMES_TO_EXPORT: &str = "No screenshots found.";

pub const SELECTOR_HINT_IDLE: &str = "Drag to select region, then release (ESC to cancel)";
pub const SELECTOR_OVERLAY_RGBA: (f32, f32, f32, f32) = (0.0, 0.0, 0.0, 0.35);

pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const INSTANCE_LOCK_FILE_NAME: &str = "booker.lock";
