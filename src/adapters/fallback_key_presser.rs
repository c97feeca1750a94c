use anyhow::Result;
use async_trait::async_trait;

use crate::core::interfaces::ports::KeyPresser;
use crate::core::models::KeyIdentifier;
use crate::global_constants::LOG_TAG_KEY_PRESS;

/// Tries each presser in order. A key press that every presser rejects is
/// logged and reported as done, so a missing permission never stops a run.
pub struct FallbackKeyPresser {
    pressers: Vec<Box<dyn KeyPresser>>,
}

impl FallbackKeyPresser {
    pub fn build(pressers: Vec<Box<dyn KeyPresser>>) -> Self {
        Self { pressers }
    }

    pub fn presser_names(&self) -> Vec<&str> {
        self.pressers.iter().map(|presser| presser.name()).collect()
    }
}

#[async_trait]
impl KeyPresser for FallbackKeyPresser {
    async fn press_key(&self, key: &KeyIdentifier) -> Result<()> {
        for presser in &self.pressers {
            match presser.press_key(key).await {
                Ok(()) => return Ok(()),
                Err(error) => {
                    log::warn!(
                        "{} {} could not press '{}': {:#}",
                        LOG_TAG_KEY_PRESS,
                        presser.name(),
                        key,
                        error
                    );
                }
            }
        }

        log::error!(
            "{} All key pressers failed for '{}' ({})",
            LOG_TAG_KEY_PRESS,
            key,
            self.presser_names().join(", ")
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "fallback"
    }
}
