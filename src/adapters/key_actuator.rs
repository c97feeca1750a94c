use anyhow::Result;
use async_trait::async_trait;

use super::{CommandKeyPresser, EnigoKeyPresser, FallbackKeyPresser, KeyHelperProcess};
use crate::core::interfaces::ports::KeyPresser;
use crate::core::models::{Capabilities, KeyIdentifier};
use crate::global_constants::LOG_TAG_KEY_PRESS;

/// The key presser owned by one capture run.
pub enum KeyActuator {
    /// Presses go to the helper until it fails, then to `fallback`.
    Helper {
        process: KeyHelperProcess,
        fallback: FallbackKeyPresser,
    },
    InProcess(FallbackKeyPresser),
}

impl KeyActuator {
    /// Starts the helper process when it is enabled and usable, otherwise
    /// (or when it fails to start) presses keys in-process.
    pub async fn acquire(capabilities: &Capabilities, use_key_helper: bool) -> Self {
        if capabilities.should_use_key_helper(use_key_helper) {
            match KeyHelperProcess::spawn_current_executable().await {
                Ok(process) => {
                    return KeyActuator::Helper {
                        process,
                        fallback: Self::in_process_presser(capabilities),
                    }
                }
                Err(error) => log::warn!(
                    "{} Key helper unavailable, pressing keys in-process: {:#}",
                    LOG_TAG_KEY_PRESS,
                    error
                ),
            }
        }

        KeyActuator::InProcess(Self::in_process_presser(capabilities))
    }

    pub fn in_process_presser(capabilities: &Capabilities) -> FallbackKeyPresser {
        let mut pressers: Vec<Box<dyn KeyPresser>> = vec![Box::new(EnigoKeyPresser::build())];
        if capabilities.fallback_key_command.is_some() {
            if let Some(command_presser) = CommandKeyPresser::for_current_platform() {
                pressers.push(Box::new(command_presser));
            }
        }
        FallbackKeyPresser::build(pressers)
    }

    pub async fn shutdown(self) {
        if let KeyActuator::Helper { process, .. } = self {
            process.shutdown().await;
        }
    }
}

#[async_trait]
impl KeyPresser for KeyActuator {
    async fn press_key(&self, key: &KeyIdentifier) -> Result<()> {
        match self {
            KeyActuator::Helper { process, fallback } => {
                if process.has_failed() {
                    return fallback.press_key(key).await;
                }
                match process.send(key).await {
                    Ok(()) => Ok(()),
                    Err(error) => {
                        log::warn!(
                            "{} Key helper unusable, pressing '{}' in-process: {:#}",
                            LOG_TAG_KEY_PRESS,
                            key,
                            error
                        );
                        fallback.press_key(key).await
                    }
                }
            }
            KeyActuator::InProcess(presser) => presser.press_key(key).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            KeyActuator::Helper { process, fallback } if process.has_failed() => fallback.name(),
            KeyActuator::Helper { .. } => "key-helper",
            KeyActuator::InProcess(presser) => presser.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::PermissionStatus;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    struct RecordingPresser {
        presses: Arc<Mutex<Vec<KeyIdentifier>>>,
    }

    #[async_trait]
    impl KeyPresser for RecordingPresser {
        async fn press_key(&self, key: &KeyIdentifier) -> Result<()> {
            self.presses.lock().unwrap().push(key.clone());
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn recording_fallback() -> (FallbackKeyPresser, Arc<Mutex<Vec<KeyIdentifier>>>) {
        let presses = Arc::new(Mutex::new(Vec::new()));
        let fallback = FallbackKeyPresser::build(vec![Box::new(RecordingPresser {
            presses: Arc::clone(&presses),
        })]);
        (fallback, presses)
    }

    #[cfg(unix)]
    async fn spawn_helper(script: &str) -> KeyHelperProcess {
        let mut command = tokio::process::Command::new("sh");
        command.arg("-c").arg(script);
        KeyHelperProcess::spawn(command).await.unwrap()
    }

    #[cfg(unix)]
    async fn wait_until_failed(process: &KeyHelperProcess) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while !process.has_failed() && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_helper_that_exits_falls_back_to_in_process_presser() {
        let process = spawn_helper("echo READY; exit 0").await;
        wait_until_failed(&process).await;
        let (fallback, presses) = recording_fallback();
        let actuator = KeyActuator::Helper { process, fallback };

        actuator.press_key(&KeyIdentifier::Space).await.unwrap();

        assert_eq!(*presses.lock().unwrap(), vec![KeyIdentifier::Space]);
        assert_eq!(actuator.name(), "fallback");
        actuator.shutdown().await;
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_helper_error_reply_routes_later_presses_in_process() {
        let process = spawn_helper(
            "echo READY; while read key; do echo 'ERROR failed to init enigo'; done",
        )
        .await;
        let (fallback, presses) = recording_fallback();
        let actuator = KeyActuator::Helper { process, fallback };

        actuator.press_key(&KeyIdentifier::Space).await.unwrap();
        if let KeyActuator::Helper { process, .. } = &actuator {
            wait_until_failed(process).await;
        }
        actuator.press_key(&KeyIdentifier::Right).await.unwrap();

        assert_eq!(*presses.lock().unwrap(), vec![KeyIdentifier::Right]);
        actuator.shutdown().await;
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_healthy_helper_keeps_presses_out_of_process() {
        let process = spawn_helper("echo READY; while read key; do echo DONE; done").await;
        let (fallback, presses) = recording_fallback();
        let actuator = KeyActuator::Helper { process, fallback };

        actuator.press_key(&KeyIdentifier::Space).await.unwrap();
        actuator.press_key(&KeyIdentifier::Space).await.unwrap();

        assert!(presses.lock().unwrap().is_empty());
        assert_eq!(actuator.name(), "key-helper");
        actuator.shutdown().await;
    }

    #[tokio::test]
    async fn test_helper_disabled_uses_in_process_presser() {
        let capabilities = Capabilities {
            screen_recording: PermissionStatus::Granted,
            accessibility_trusted: true,
            key_helper_available: true,
            fallback_key_command: None,
        };

        let actuator = KeyActuator::acquire(&capabilities, false).await;

        assert_eq!(actuator.name(), "fallback");
        actuator.shutdown().await;
    }

    #[test]
    fn test_in_process_presser_adds_command_when_available() {
        let capabilities = Capabilities {
            fallback_key_command: Some("xdotool".to_string()),
            ..Capabilities::default()
        };

        let presser = KeyActuator::in_process_presser(&capabilities);

        let names = presser.presser_names();
        assert_eq!(names[0], "enigo");
        if CommandKeyPresser::for_current_platform().is_some() {
            assert_eq!(names.len(), 2);
        }
    }
}
