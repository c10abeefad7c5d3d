use crate::error::{MirrorError, Result};
use crate::utils::fs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_MODE: u32 = 0o755;
const CONFIG_FILE: &str = "config.toml";

/// Optional overrides read from `<root>/config.toml`
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct FileConfig {
    /// chmod-style octal string, e.g. "644"
    pub default_mode: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mirror_dir: PathBuf,
    pub default_mode: u32,
    pub user_agent: String,
}

impl Config {
    pub fn new(mirror_dir: PathBuf) -> Self {
        Config {
            mirror_dir,
            default_mode: DEFAULT_MODE,
            user_agent: default_user_agent(),
        }
    }

    /// Resolve the mirror root, read `config.toml` if present and create the
    /// save directory.
    pub fn load(root: Option<&Path>) -> Result<Self> {
        let mirror_dir = match root {
            Some(root) => fs::absolutize(root)?,
            None => get_mirror_dir()?,
        };

        let mut config = Config::new(mirror_dir);
        let config_path = config.get_config_path();
        if config_path.exists() {
            debug!(path = %config_path.display(), "reading config file");
            let content = std::fs::read_to_string(&config_path)?;
            let file_config: FileConfig = toml::from_str(&content)
                .map_err(|e| MirrorError::config_error(format!("{}: {e}", config_path.display())))?;
            config.apply(file_config)?;
        }

        fs::ensure_dir_exists(&config.get_save_dir())?;
        Ok(config)
    }

    fn apply(&mut self, file_config: FileConfig) -> Result<()> {
        if let Some(mode) = file_config.default_mode {
            self.default_mode = fs::parse_octal_mode(&mode)?;
        }
        if let Some(user_agent) = file_config.user_agent {
            self.user_agent = user_agent;
        }
        Ok(())
    }

    pub fn get_db_path(&self) -> PathBuf {
        self.mirror_dir.join("db")
    }

    pub fn get_save_dir(&self) -> PathBuf {
        self.mirror_dir.join("bin")
    }

    pub fn get_config_path(&self) -> PathBuf {
        self.mirror_dir.join(CONFIG_FILE)
    }
}

fn default_user_agent() -> String {
    format!("mirror/{}", env!("CARGO_PKG_VERSION"))
}

fn get_mirror_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".mirror"))
        .ok_or(MirrorError::HomeDirectoryNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_layout() {
        let config = Config::new(PathBuf::from("/tmp/m"));
        assert_eq!(config.get_db_path(), PathBuf::from("/tmp/m/db"));
        assert_eq!(config.get_save_dir(), PathBuf::from("/tmp/m/bin"));
        assert_eq!(config.default_mode, 0o755);
        assert!(config.user_agent.starts_with("mirror/"));
    }

    #[test]
    fn test_load_creates_save_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load(Some(tmp.path())).unwrap();
        assert!(config.get_save_dir().is_dir());
        assert_eq!(config.default_mode, DEFAULT_MODE);
    }

    #[test]
    fn test_load_config_file() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_FILE),
            "default_mode = \"644\"\nuser_agent = \"test-agent\"\n",
        )
        .unwrap();

        let config = Config::load(Some(tmp.path())).unwrap();
        assert_eq!(config.default_mode, 0o644);
        assert_eq!(config.user_agent, "test-agent");
    }

    #[test]
    fn test_load_rejects_bad_mode() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE), "default_mode = \"abc\"\n").unwrap();

        assert!(matches!(
            Config::load(Some(tmp.path())),
            Err(MirrorError::InvalidMode { .. })
        ));
    }
}
