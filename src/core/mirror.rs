use crate::core::archive::{self, ArchiveFormat};
use crate::core::config::Config;
use crate::core::download::{Downloader, Payload};
use crate::core::store::{MirrorEntry, MirrorStore};
use crate::error::{MirrorError, Result};
use crate::utils::fs::{self, shorten_path};
use crate::utils::shell;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Everything `add-file` and `add-archive` need to create one mirror
#[derive(Debug, Clone)]
pub struct AddRequest<'a> {
    pub url: &'a str,
    pub target: Option<&'a Path>,
    pub archive_filename: Option<&'a str>,
    pub mode: u32,
    pub post_install: Option<&'a str>,
}

pub struct MirrorManager {
    config: Config,
    store: MirrorStore,
    downloader: Downloader,
}

impl MirrorManager {
    pub fn new(config: Config, store: MirrorStore, downloader: Downloader) -> Self {
        Self {
            config,
            store,
            downloader,
        }
    }

    /// Open the database under the mirror root and build an HTTP client
    pub fn open(config: Config) -> Result<Self> {
        let store = MirrorStore::open(&config.get_db_path())?;
        let downloader = Downloader::new(&config.user_agent)?;
        Ok(Self::new(config, store, downloader))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &MirrorStore {
        &self.store
    }

    /// Fetch `url` and place it (or one member of it, for archives) on disk.
    /// Returns the absolute path written.
    pub fn download_file(
        &self,
        url: &str,
        target: Option<&Path>,
        archive_filename: Option<&str>,
        exist_ok: bool,
    ) -> Result<PathBuf> {
        let payload = self.downloader.fetch(url)?;
        let target = resolve_target(
            &self.config.get_save_dir(),
            &payload.remote_name,
            target,
            archive_filename,
        )?;
        debug!(target = %target.display(), exist_ok, "resolved target");

        if !exist_ok {
            self.check_conflict(&target)?;
        }

        place_payload(&payload, &target, archive_filename)?;
        Ok(target)
    }

    fn check_conflict(&self, target: &Path) -> Result<()> {
        if self.store.contains(target)? {
            return Err(MirrorError::AlreadyInDatabase {
                path: shorten_path(target),
            });
        }
        if target.exists() {
            println!("Warning: File {} already exists", shorten_path(target));
        }
        Ok(())
    }

    /// Download, chmod, run the post-install command, then record the entry
    pub fn add(&self, request: &AddRequest<'_>) -> Result<PathBuf> {
        let path = self.download_file(
            request.url,
            request.target,
            request.archive_filename,
            false,
        )?;
        fs::set_mode(&path, request.mode)?;
        shell::run_post_install(&path, request.post_install)?;

        self.store.insert(&MirrorEntry {
            filename: path.clone(),
            url: request.url.to_string(),
            archive_filename: request.archive_filename.map(str::to_string),
            post_install: request.post_install.map(str::to_string),
        })?;
        info!(url = request.url, path = %path.display(), "mirror added");
        Ok(path)
    }

    /// Re-download every recorded entry to its recorded path. Stops at the
    /// first failure.
    pub fn update_all(&self) -> Result<usize> {
        let entries = self.store.list()?;
        for entry in &entries {
            println!(
                "Updating {} with {}",
                shorten_path(&entry.filename),
                entry.url
            );
            self.download_file(
                &entry.url,
                Some(entry.filename.as_path()),
                entry.archive_filename.as_deref(),
                true,
            )?;
            shell::run_post_install(&entry.filename, entry.post_install.as_deref())?;
        }
        Ok(entries.len())
    }

    /// Delete the entries matching `path` (exactly, or as a GLOB pattern).
    /// With `purge` the matching files are deleted from disk as well.
    pub fn remove(&self, path: &Path, glob: bool, purge: bool) -> Result<usize> {
        let path = fs::absolutize(path)?;
        println!("Deleting {}", shorten_path(&path));

        let removed = if glob {
            let pattern = path.to_string_lossy();
            let matched = if purge {
                self.store.matching_glob(&pattern)?
            } else {
                Vec::new()
            };
            let removed = self.store.remove_glob(&pattern)?;
            for entry in &matched {
                fs::remove_path(&entry.filename)?;
            }
            removed
        } else {
            if !path.exists() {
                println!("Warning: File doesn't exist in filesystem");
            }
            if !self.store.contains(&path)? {
                return Err(MirrorError::NotInDatabase {
                    path: shorten_path(&path),
                });
            }
            let removed = self.store.remove_exact(&path)?;
            if purge {
                fs::remove_path(&path)?;
            }
            removed
        };

        println!("Deleted {}", shorten_path(&path));
        Ok(removed)
    }
}

/// Work out where a download should land. An explicit target wins, then the
/// archive member name, then the name the server suggested.
pub fn resolve_target(
    save_dir: &Path,
    remote_name: &str,
    target: Option<&Path>,
    archive_filename: Option<&str>,
) -> Result<PathBuf> {
    let candidate = match (target, archive_filename) {
        (Some(target), _) => target.to_path_buf(),
        (None, Some(member)) => save_dir.join(member),
        (None, None) => save_dir.join(remote_name),
    };

    let resolved = fs::absolutize(&candidate)?;
    if resolved == fs::absolutize(save_dir)? {
        return Err(MirrorError::EmptyFilename);
    }
    Ok(resolved)
}

fn place_payload(payload: &Payload, target: &Path, archive_filename: Option<&str>) -> Result<()> {
    let previous = std::fs::metadata(target)
        .ok()
        .filter(|meta| meta.is_file())
        .map(|meta| meta.permissions());

    match archive_filename {
        None => {
            if let Some(parent) = target.parent() {
                fs::ensure_dir_exists(parent)?;
            }
            std::fs::write(target, &payload.bytes)?;
        }
        Some(member) => extract_member(payload, member, target)?,
    }

    if let Some(permissions) = previous {
        if target.is_file() {
            std::fs::set_permissions(target, permissions)?;
        }
    }
    Ok(())
}

fn extract_member(payload: &Payload, member: &str, target: &Path) -> Result<()> {
    let format = ArchiveFormat::from_name(&payload.remote_name)?;

    let mut archive_file = tempfile::Builder::new().prefix("mirror-").tempfile()?;
    archive_file.write_all(&payload.bytes)?;
    archive_file.flush()?;

    let unpack_dir = tempfile::Builder::new().prefix("mirror-").tempdir()?;
    archive::unpack(archive_file.path(), format, unpack_dir.path())?;

    let source = unpack_dir.path().join(member);
    if source.is_file() {
        fs::copy_file(&source, target)?;
    } else if source.is_dir() {
        fs::remove_path(target)?;
        fs::copy_dir_recursive(&source, target)?;
    } else {
        return Err(MirrorError::MemberNotFound {
            member: member.to_string(),
        });
    }
    Ok(())
}
