use anyhow::Result;
use async_trait::async_trait;

use crate::core::models::KeyIdentifier;

#[async_trait]
pub trait KeyPresser: Send + Sync {
    async fn press_key(&self, key: &KeyIdentifier) -> Result<()>;

    fn name(&self) -> &str;
}
