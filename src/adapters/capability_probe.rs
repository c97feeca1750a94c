use crate::adapters::command_key_presser::CommandPlatform;
use crate::adapters::macos_permissions::macos;
use crate::core::models::Capabilities;
use crate::global_constants::LOG_TAG_CAPABILITIES;

/// Probes optional platform features once; the orchestrator caches the
/// answer for the lifetime of the app.
pub fn probe_capabilities() -> Capabilities {
    let capabilities = Capabilities {
        screen_recording: macos::screen_recording_status(),
        accessibility_trusted: macos::is_accessibility_trusted(),
        key_helper_available: std::env::current_exe()
            .map(|path| path.exists())
            .unwrap_or(false),
        fallback_key_command: find_fallback_key_command(CommandPlatform::current()),
    };

    log::info!("{} {:?}", LOG_TAG_CAPABILITIES, capabilities);
    if !capabilities.can_press_keys() {
        log::warn!(
            "{} No way to press keys; screenshots will still be taken",
            LOG_TAG_CAPABILITIES
        );
    }

    capabilities
}

fn find_fallback_key_command(platform: Option<CommandPlatform>) -> Option<String> {
    let program = platform?.program();
    match which::which(program) {
        Ok(path) => {
            log::debug!("{} Found {} at {:?}", LOG_TAG_CAPABILITIES, program, path);
            Some(program.to_string())
        }
        Err(_) => {
            log::debug!("{} {} not on PATH", LOG_TAG_CAPABILITIES, program);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_platform_has_no_fallback_command() {
        assert_eq!(find_fallback_key_command(None), None);
    }

    #[test]
    fn test_probe_finds_current_executable() {
        let capabilities = probe_capabilities();

        assert!(capabilities.key_helper_available);
    }
}
