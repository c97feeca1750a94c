use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use enigo::{Direction, Enigo, Key, Keyboard, Settings};

use crate::core::interfaces::ports::KeyPresser;
use crate::core::models::KeyIdentifier;
use crate::global_constants::LOG_TAG_KEY_PRESS;

/// Synthesizes a key click through the platform input APIs.
pub struct EnigoKeyPresser;

impl EnigoKeyPresser {
    pub fn build() -> Self {
        Self
    }

    pub fn map_key(key: &KeyIdentifier) -> Key {
        match key {
            KeyIdentifier::Space => Key::Space,
            KeyIdentifier::Right => Key::RightArrow,
            KeyIdentifier::Left => Key::LeftArrow,
            KeyIdentifier::Down => Key::DownArrow,
            KeyIdentifier::Up => Key::UpArrow,
            KeyIdentifier::PageDown => Key::PageDown,
            KeyIdentifier::PageUp => Key::PageUp,
            KeyIdentifier::Enter => Key::Return,
            KeyIdentifier::Character(character) => Key::Unicode(*character),
        }
    }

    pub fn click(key: &KeyIdentifier) -> Result<()> {
        let mut enigo = Enigo::new(&Settings::default())
            .map_err(|e| anyhow!("failed to init enigo: {e}"))?;
        enigo
            .key(Self::map_key(key), Direction::Click)
            .map_err(|e| anyhow!("failed to press {key}: {e}"))?;
        log::debug!("{} enigo pressed '{}'", LOG_TAG_KEY_PRESS, key);
        Ok(())
    }
}

#[async_trait]
impl KeyPresser for EnigoKeyPresser {
    async fn press_key(&self, key: &KeyIdentifier) -> Result<()> {
        let key = key.clone();
        tokio::task::spawn_blocking(move || Self::click(&key))
            .await
            .context("enigo key press task aborted")?
    }

    fn name(&self) -> &str {
        "enigo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_key_covers_navigation_keys() {
        assert_eq!(EnigoKeyPresser::map_key(&KeyIdentifier::Space), Key::Space);
        assert_eq!(
            EnigoKeyPresser::map_key(&KeyIdentifier::Right),
            Key::RightArrow
        );
        assert_eq!(
            EnigoKeyPresser::map_key(&KeyIdentifier::PageDown),
            Key::PageDown
        );
        assert_eq!(
            EnigoKeyPresser::map_key(&KeyIdentifier::Character('n')),
            Key::Unicode('n')
        );
    }
}
