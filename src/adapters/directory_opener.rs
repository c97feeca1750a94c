use std::path::Path;

use anyhow::{Context, Result};

/// Opens `directory` in the platform file manager, creating it first.
pub async fn open_directory(directory: &Path) -> Result<()> {
    tokio::fs::create_dir_all(directory)
        .await
        .with_context(|| format!("failed to create {:?}", directory))?;
    open::that_detached(directory).with_context(|| format!("failed to open {:?}", directory))?;
    log::info!("[APP] Opened {:?}", directory);
    Ok(())
}
