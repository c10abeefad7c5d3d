use crate::core::config::Config;
use crate::error::Result;
use crate::utils::fs;
use dialoguer::Confirm;

pub fn delete_db(config: &Config, yes: bool) -> Result<()> {
    let confirmed = yes
        || Confirm::new()
            .with_prompt("Are you sure you want to delete the database?")
            .default(false)
            .interact()?;

    if !confirmed {
        println!("Aborted.");
        return Ok(());
    }

    delete_database(config)?;
    println!("Deleted database and mirrored files");
    Ok(())
}

/// Remove the save directory and the database file
pub fn delete_database(config: &Config) -> Result<()> {
    fs::remove_dir_recursive(&config.get_save_dir())?;
    fs::remove_path(&config.get_db_path())?;
    Ok(())
}
