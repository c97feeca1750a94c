#![allow(unexpected_cfgs)]

use crate::core::models::PermissionStatus;

#[cfg(target_os = "macos")]
pub mod macos {
    use std::ffi::CStr;
    use std::process::Command;

    use crate::core::models::PermissionStatus;

    const LOG_TAG_PERMISSIONS: &str = "[PERMISSIONS]";

    const CORE_GRAPHICS_PATH: &CStr =
        c"/System/Library/Frameworks/CoreGraphics.framework/CoreGraphics";
    const APPLICATION_SERVICES_PATH: &CStr =
        c"/System/Library/Frameworks/ApplicationServices.framework/ApplicationServices";

    pub fn screen_recording_status() -> PermissionStatus {
        log::info!(
            "{} Checking screen recording permission",
            LOG_TAG_PERMISSIONS
        );

        let status = match preflight_screen_capture_access() {
            Some(true) => PermissionStatus::Granted,
            Some(false) => PermissionStatus::Denied,
            None => PermissionStatus::Unsupported,
        };

        if status == PermissionStatus::Granted {
            log::info!(
                "{} Screen recording permission granted",
                LOG_TAG_PERMISSIONS
            );
        } else {
            log::warn!(
                "{} Screen recording permission: {}",
                LOG_TAG_PERMISSIONS,
                status
            );
        }

        status
    }

    pub fn is_accessibility_trusted() -> bool {
        log::info!("{} Checking accessibility permission", LOG_TAG_PERMISSIONS);

        let trusted = ax_is_process_trusted();

        if trusted {
            log::info!("{} Accessibility permission granted", LOG_TAG_PERMISSIONS);
        } else {
            log::warn!(
                "{} Accessibility permission not granted, key presses will be ignored",
                LOG_TAG_PERMISSIONS
            );
        }

        trusted
    }

    pub fn open_screen_recording_settings() {
        log::info!("{} Opening screen recording settings", LOG_TAG_PERMISSIONS);
        open_system_preferences(
            "x-apple.systempreferences:com.apple.preference.security?Privacy_ScreenCapture",
        );
    }

    fn preflight_screen_capture_access() -> Option<bool> {
        unsafe {
            let lib = libc::dlopen(CORE_GRAPHICS_PATH.as_ptr(), libc::RTLD_LAZY);

            if lib.is_null() {
                log::warn!(
                    "{} Could not load CoreGraphics framework",
                    LOG_TAG_PERMISSIONS
                );
                return None;
            }

            type CGPreflightScreenCaptureAccessFn = unsafe extern "C" fn() -> bool;

            let func_ptr = libc::dlsym(lib, c"CGPreflightScreenCaptureAccess".as_ptr());

            if func_ptr.is_null() {
                libc::dlclose(lib);
                log::warn!(
                    "{} Could not find CGPreflightScreenCaptureAccess",
                    LOG_TAG_PERMISSIONS
                );
                return None;
            }

            let preflight_fn: CGPreflightScreenCaptureAccessFn = std::mem::transmute(func_ptr);
            let result = preflight_fn();

            libc::dlclose(lib);

            Some(result)
        }
    }

    fn ax_is_process_trusted() -> bool {
        unsafe {
            let lib = libc::dlopen(APPLICATION_SERVICES_PATH.as_ptr(), libc::RTLD_LAZY);

            if lib.is_null() {
                log::warn!(
                    "{} Could not load ApplicationServices framework",
                    LOG_TAG_PERMISSIONS
                );
                return true;
            }

            type AXIsProcessTrustedFn = unsafe extern "C" fn() -> bool;

            let func_ptr = libc::dlsym(lib, c"AXIsProcessTrusted".as_ptr());

            if func_ptr.is_null() {
                libc::dlclose(lib);
                log::warn!(
                    "{} Could not find AXIsProcessTrusted",
                    LOG_TAG_PERMISSIONS
                );
                return true;
            }

            let is_trusted: AXIsProcessTrustedFn = std::mem::transmute(func_ptr);
            let result = is_trusted();

            libc::dlclose(lib);

            result
        }
    }

    fn open_system_preferences(pane: &str) {
        match Command::new("open").arg(pane).status() {
            Ok(status) if status.success() => {
                log::info!("{} Opened system preferences", LOG_TAG_PERMISSIONS);
            }
            Ok(status) => {
                log::error!(
                    "{} Failed to open system preferences: exit code {:?}",
                    LOG_TAG_PERMISSIONS,
                    status.code()
                );
            }
            Err(error) => {
                log::error!(
                    "{} Failed to execute open command: {}",
                    LOG_TAG_PERMISSIONS,
                    error
                );
            }
        }
    }
}

#[cfg(not(target_os = "macos"))]
pub mod macos {
    use crate::core::models::PermissionStatus;

    pub fn screen_recording_status() -> PermissionStatus {
        PermissionStatus::Granted
    }

    pub fn is_accessibility_trusted() -> bool {
        true
    }

    pub fn open_screen_recording_settings() {}
}

/// Startup permission report; the returned status is what the UI shows.
pub fn log_permission_status() -> PermissionStatus {
    let status = macos::screen_recording_status();
    log::info!("[PERMISSIONS] Screen recording: {}", status);
    log::info!(
        "[PERMISSIONS] Accessibility trusted: {}",
        macos::is_accessibility_trusted()
    );
    status
}

#[cfg(all(test, not(target_os = "macos")))]
mod tests {
    use super::*;

    #[test]
    fn test_non_macos_reports_granted() {
        assert_eq!(macos::screen_recording_status(), PermissionStatus::Granted);
        assert!(macos::is_accessibility_trusted());
    }
}
