use crate::core::config::Config;
use crate::core::mirror::MirrorManager;
use crate::error::Result;

pub fn update_files(config: Config) -> Result<()> {
    let manager = MirrorManager::open(config)?;
    let count = manager.update_all()?;
    tracing::info!(count, "update finished");
    println!("Updated!");
    Ok(())
}
