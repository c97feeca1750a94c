mod keyboard_listener;
pub mod system_tray;
mod xcap_screen_capturer;

pub use keyboard_listener::{GlobalKeyboardEvent, GlobalKeyboardListener};
pub use system_tray::{SystemTray, TrayEvent};
pub use xcap_screen_capturer::XcapScreenCapturer;
