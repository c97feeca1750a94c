use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    NotDetermined,
    Unsupported,
}

impl PermissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionStatus::Granted => "granted",
            PermissionStatus::Denied => "denied",
            PermissionStatus::NotDetermined => "not-determined",
            PermissionStatus::Unsupported => "unsupported",
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            PermissionStatus::Granted => "Screen recording permission granted",
            PermissionStatus::Denied => {
                "Screen recording permission denied. Enable it in System Settings → Privacy & Security"
            }
            PermissionStatus::NotDetermined => "Screen recording permission not requested yet",
            PermissionStatus::Unsupported => "Screen recording permission status unavailable",
        }
    }
}

impl fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional platform features, probed once at startup and cached.
#[derive(Debug, Clone, PartialEq)]
pub struct Capabilities {
    pub screen_recording: PermissionStatus,
    pub accessibility_trusted: bool,
    pub key_helper_available: bool,
    pub fallback_key_command: Option<String>,
}

impl Capabilities {
    pub fn can_press_keys(&self) -> bool {
        self.accessibility_trusted || self.fallback_key_command.is_some()
    }

    pub fn should_use_key_helper(&self, helper_enabled: bool) -> bool {
        helper_enabled && self.key_helper_available && self.accessibility_trusted
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            screen_recording: PermissionStatus::NotDetermined,
            accessibility_trusted: true,
            key_helper_available: false,
            fallback_key_command: None,
        }
    }
}
