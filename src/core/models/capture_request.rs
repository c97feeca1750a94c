use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ScreenRegion;
use crate::core::errors::CaptureError;
use crate::global_constants::{
    DEFAULT_CAPTURE_INTERVAL, DEFAULT_KEY_NAME, MINIMUM_CAPTURE_INTERVAL,
};

/// Logical key the actuator sends between captures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum KeyIdentifier {
    Space,
    Right,
    Left,
    Down,
    Up,
    PageDown,
    PageUp,
    Enter,
    Character(char),
}

impl KeyIdentifier {
    pub fn name(&self) -> String {
        match self {
            KeyIdentifier::Space => "space".to_string(),
            KeyIdentifier::Right => "right".to_string(),
            KeyIdentifier::Left => "left".to_string(),
            KeyIdentifier::Down => "down".to_string(),
            KeyIdentifier::Up => "up".to_string(),
            KeyIdentifier::PageDown => "pagedown".to_string(),
            KeyIdentifier::PageUp => "pageup".to_string(),
            KeyIdentifier::Enter => "enter".to_string(),
            KeyIdentifier::Character(character) => character.to_string(),
        }
    }
}

impl Default for KeyIdentifier {
    fn default() -> Self {
        KeyIdentifier::Space
    }
}

impl FromStr for KeyIdentifier {
    type Err = CaptureError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == " " {
            return Ok(KeyIdentifier::Space);
        }

        let trimmed = value.trim();
        let mut characters = trimmed.chars();

        if let (Some(character), None) = (characters.next(), characters.next()) {
            return Ok(KeyIdentifier::Character(character));
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "space" | "spacebar" => Ok(KeyIdentifier::Space),
            "right" | "arrowright" => Ok(KeyIdentifier::Right),
            "left" | "arrowleft" => Ok(KeyIdentifier::Left),
            "down" | "arrowdown" => Ok(KeyIdentifier::Down),
            "up" | "arrowup" => Ok(KeyIdentifier::Up),
            "pagedown" => Ok(KeyIdentifier::PageDown),
            "pageup" => Ok(KeyIdentifier::PageUp),
            "enter" | "return" => Ok(KeyIdentifier::Enter),
            _ => Err(CaptureError::UnknownKey(value.to_string())),
        }
    }
}

impl TryFrom<String> for KeyIdentifier {
    type Error = CaptureError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeyIdentifier> for String {
    fn from(key: KeyIdentifier) -> Self {
        key.name()
    }
}

impl fmt::Display for KeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRequest {
    count: u32,
    interval: Duration,
    region: Option<ScreenRegion>,
    key: KeyIdentifier,
}

impl CaptureRequest {
    pub fn validated(
        count: u32,
        interval: Duration,
        region: Option<ScreenRegion>,
        key: &str,
    ) -> Result<Self, CaptureError> {
        if count < 1 {
            return Err(CaptureError::InvalidCount(count));
        }

        if interval < MINIMUM_CAPTURE_INTERVAL {
            return Err(CaptureError::InvalidInterval {
                requested: interval,
                minimum: MINIMUM_CAPTURE_INTERVAL,
            });
        }

        let key = if key.trim().is_empty() {
            KeyIdentifier::default()
        } else {
            key.parse()?
        };

        Ok(Self {
            count,
            interval,
            region,
            key,
        })
    }

    /// Lenient construction used when nothing upstream validated the input:
    /// an interval below the minimum falls back to the default and an empty
    /// or unknown key falls back to space.
    pub fn with_defaults(
        count: u32,
        interval: Option<Duration>,
        region: Option<ScreenRegion>,
        key: Option<&str>,
    ) -> Result<Self, CaptureError> {
        let interval = interval
            .filter(|value| *value >= MINIMUM_CAPTURE_INTERVAL)
            .unwrap_or(DEFAULT_CAPTURE_INTERVAL);
        let key = key
            .and_then(|value| value.parse::<KeyIdentifier>().ok())
            .unwrap_or_default();

        Self::validated(count, interval, region, &key.name())
    }

    pub fn full_screen(count: u32) -> Result<Self, CaptureError> {
        Self::with_defaults(count, None, None, Some(DEFAULT_KEY_NAME))
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn region(&self) -> Option<ScreenRegion> {
        self.region
    }

    pub fn key(&self) -> &KeyIdentifier {
        &self.key
    }
}
