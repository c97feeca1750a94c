use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tokio::process::Command;

use crate::core::interfaces::ports::KeyPresser;
use crate::core::models::KeyIdentifier;
use crate::global_constants::LOG_TAG_KEY_PRESS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandPlatform {
    MacOs,
    Linux,
    Windows,
}

impl CommandPlatform {
    pub fn current() -> Option<Self> {
        if cfg!(target_os = "macos") {
            Some(Self::MacOs)
        } else if cfg!(target_os = "linux") {
            Some(Self::Linux)
        } else if cfg!(target_os = "windows") {
            Some(Self::Windows)
        } else {
            None
        }
    }

    pub fn program(&self) -> &'static str {
        match self {
            Self::MacOs => "osascript",
            Self::Linux => "xdotool",
            Self::Windows => "powershell",
        }
    }
}

/// Presses keys by shelling out to the platform's automation tool.
pub struct CommandKeyPresser {
    platform: CommandPlatform,
}

impl CommandKeyPresser {
    pub fn build(platform: CommandPlatform) -> Self {
        Self { platform }
    }

    pub fn for_current_platform() -> Option<Self> {
        CommandPlatform::current().map(Self::build)
    }

    pub fn arguments_for(platform: CommandPlatform, key: &KeyIdentifier) -> Vec<String> {
        match platform {
            CommandPlatform::MacOs => {
                let action = match mac_key_code(key) {
                    Some(code) => format!("key code {}", code),
                    None => format!("keystroke \"{}\"", apple_script_escape(&key.name())),
                };
                vec![
                    "-e".to_string(),
                    format!("tell application \"System Events\" to {}", action),
                ]
            }
            CommandPlatform::Linux => vec!["key".to_string(), xdotool_key_name(key)],
            CommandPlatform::Windows => vec![
                "-NoProfile".to_string(),
                "-NonInteractive".to_string(),
                "-ExecutionPolicy".to_string(),
                "Bypass".to_string(),
                "-Command".to_string(),
                format!(
                    "$wshell = New-Object -ComObject wscript.shell; $wshell.SendKeys('{}')",
                    send_keys_sequence(key)
                ),
            ],
        }
    }
}

fn apple_script_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn mac_key_code(key: &KeyIdentifier) -> Option<u16> {
    match key {
        KeyIdentifier::Space => Some(49),
        KeyIdentifier::Right => Some(124),
        KeyIdentifier::Left => Some(123),
        KeyIdentifier::Down => Some(125),
        KeyIdentifier::Up => Some(126),
        KeyIdentifier::PageDown => Some(121),
        KeyIdentifier::PageUp => Some(116),
        KeyIdentifier::Enter => Some(36),
        KeyIdentifier::Character(_) => None,
    }
}

fn xdotool_key_name(key: &KeyIdentifier) -> String {
    match key {
        KeyIdentifier::Space => "space".to_string(),
        KeyIdentifier::Right => "Right".to_string(),
        KeyIdentifier::Left => "Left".to_string(),
        KeyIdentifier::Down => "Down".to_string(),
        KeyIdentifier::Up => "Up".to_string(),
        KeyIdentifier::PageDown => "Next".to_string(),
        KeyIdentifier::PageUp => "Prior".to_string(),
        KeyIdentifier::Enter => "Return".to_string(),
        KeyIdentifier::Character(character) => character.to_string(),
    }
}

fn send_keys_sequence(key: &KeyIdentifier) -> String {
    match key {
        KeyIdentifier::Space => " ".to_string(),
        KeyIdentifier::Right => "{RIGHT}".to_string(),
        KeyIdentifier::Left => "{LEFT}".to_string(),
        KeyIdentifier::Down => "{DOWN}".to_string(),
        KeyIdentifier::Up => "{UP}".to_string(),
        KeyIdentifier::PageDown => "{PGDN}".to_string(),
        KeyIdentifier::PageUp => "{PGUP}".to_string(),
        KeyIdentifier::Enter => "{ENTER}".to_string(),
        KeyIdentifier::Character('\'') => "''".to_string(),
        KeyIdentifier::Character(character) if "+^%~(){}[]".contains(*character) => {
            format!("{{{}}}", character)
        }
        KeyIdentifier::Character(character) => character.to_string(),
    }
}

impl CommandKeyPresser {
    /// Synchronous variant for the key helper process, which has no runtime.
    pub fn press_blocking(&self, key: &KeyIdentifier) -> Result<()> {
        let program = self.platform.program();
        let output = std::process::Command::new(program)
            .args(Self::arguments_for(self.platform, key))
            .output()
            .with_context(|| format!("failed to run {}", program))?;

        check_output(program, &output, key)
    }
}

fn check_output(program: &str, output: &std::process::Output, key: &KeyIdentifier) -> Result<()> {
    if !output.status.success() {
        bail!(
            "{} exited with {:?}: {}",
            program,
            output.status.code(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    log::debug!("{} {} pressed '{}'", LOG_TAG_KEY_PRESS, program, key);
    Ok(())
}

#[async_trait]
impl KeyPresser for CommandKeyPresser {
    async fn press_key(&self, key: &KeyIdentifier) -> Result<()> {
        let program = self.platform.program();
        let output = Command::new(program)
            .args(Self::arguments_for(self.platform, key))
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("failed to run {}", program))?;

        check_output(program, &output, key)
    }

    fn name(&self) -> &str {
        self.platform.program()
    }
}
