use crate::core::config::Config;
use crate::error::{MirrorError, Result};
use std::process::Command;

/// Hand the database over to the `sqlite3` CLI. Its exit status is ignored.
pub fn sqlite_shell(config: &Config) -> Result<()> {
    let sqlite = which::which("sqlite3").map_err(|_| MirrorError::BinaryNotFound {
        name: "sqlite3".to_string(),
    })?;

    Command::new(sqlite).arg(config.get_db_path()).status()?;
    Ok(())
}
