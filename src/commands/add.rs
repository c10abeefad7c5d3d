use crate::core::config::Config;
use crate::core::mirror::{AddRequest, MirrorManager};
use crate::error::Result;
use crate::utils::fs::shorten_path;
use std::path::Path;

pub fn add_file(
    config: Config,
    url: &str,
    filename: Option<&Path>,
    mode: Option<u32>,
    post_install: Option<&str>,
) -> Result<()> {
    println!("Adding {url}");

    let manager = MirrorManager::open(config)?;
    let path = manager.add(&AddRequest {
        url,
        target: filename,
        archive_filename: None,
        mode: mode.unwrap_or(manager.config().default_mode),
        post_install,
    })?;

    println!("Added {url} at {}", shorten_path(&path));
    Ok(())
}

pub fn add_archive(
    config: Config,
    url: &str,
    archive_filename: &str,
    filename: Option<&Path>,
    mode: Option<u32>,
    post_install: Option<&str>,
) -> Result<()> {
    println!("Adding archive {url}");

    let manager = MirrorManager::open(config)?;
    let path = manager.add(&AddRequest {
        url,
        target: filename,
        archive_filename: Some(archive_filename),
        mode: mode.unwrap_or(manager.config().default_mode),
        post_install,
    })?;

    println!("Added archive {url} at {}", shorten_path(&path));
    Ok(())
}
