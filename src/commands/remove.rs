use crate::core::config::Config;
use crate::core::mirror::MirrorManager;
use crate::error::Result;
use std::path::Path;

pub fn remove_file(config: Config, filename: &Path, glob: bool, purge: bool) -> Result<()> {
    let manager = MirrorManager::open(config)?;
    let removed = manager.remove(filename, glob, purge)?;
    if glob {
        println!("{removed} matching entries removed");
    }
    Ok(())
}
