use crate::error::{MirrorError, Result};
use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tar::Archive;
use xz2::read::XzDecoder;
use zip::ZipArchive;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    TarGz,
    TarBz2,
    TarXz,
}

impl ArchiveFormat {
    /// Pick a decoder from a filename. Everything after the first `.` is
    /// treated as the extension so `.tar.gz` is recognised.
    pub fn from_name(name: &str) -> Result<Self> {
        let suffix = archive_suffix(name).to_ascii_lowercase();
        let format = if suffix == "zip" || suffix.ends_with(".zip") {
            ArchiveFormat::Zip
        } else if suffix == "tgz"
            || suffix.ends_with(".tgz")
            || suffix == "tar.gz"
            || suffix.ends_with(".tar.gz")
        {
            ArchiveFormat::TarGz
        } else if has_suffix(&suffix, &["tar.bz2", "tbz2", "tbz"]) {
            ArchiveFormat::TarBz2
        } else if has_suffix(&suffix, &["tar.xz", "txz"]) {
            ArchiveFormat::TarXz
        } else if suffix == "tar" || suffix.ends_with(".tar") {
            ArchiveFormat::Tar
        } else {
            return Err(MirrorError::UnsupportedArchive {
                name: name.to_string(),
            });
        };
        Ok(format)
    }
}

fn has_suffix(suffix: &str, extensions: &[&str]) -> bool {
    extensions
        .iter()
        .any(|ext| suffix == *ext || suffix.ends_with(&format!(".{ext}")))
}

/// The part of a filename after its first `.`
pub fn archive_suffix(name: &str) -> &str {
    name.split_once('.').map(|(_, suffix)| suffix).unwrap_or("")
}

pub fn unpack(archive_path: &Path, format: ArchiveFormat, destination: &Path) -> Result<()> {
    std::fs::create_dir_all(destination)?;

    let file = File::open(archive_path)?;
    match format {
        ArchiveFormat::Tar => extract_tar(file, destination),
        ArchiveFormat::TarGz => extract_tar(GzDecoder::new(file), destination),
        ArchiveFormat::TarBz2 => extract_tar(BzDecoder::new(file), destination),
        ArchiveFormat::TarXz => extract_tar(XzDecoder::new(file), destination),
        ArchiveFormat::Zip => extract_zip(file, destination),
    }
}

fn extract_tar<R: Read>(reader: R, destination: &Path) -> Result<()> {
    Archive::new(reader).unpack(destination)?;
    Ok(())
}

fn extract_zip(file: File, destination: &Path) -> Result<()> {
    let mut archive = ZipArchive::new(file)?;
    // Directory modes are applied last so read-only dirs can still be filled
    let mut dir_modes: Vec<(PathBuf, u32)> = Vec::new();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let outpath = match file.enclosed_name() {
            Some(path) => destination.join(path),
            None => continue,
        };

        if file.is_dir() {
            std::fs::create_dir_all(&outpath)?;
        } else {
            if let Some(p) = outpath.parent() {
                if !p.exists() {
                    std::fs::create_dir_all(p)?;
                }
            }
            let mut outfile = File::create(&outpath)?;
            std::io::copy(&mut file, &mut outfile)?;
        }

        if let Some(mode) = file.unix_mode() {
            if file.is_dir() {
                dir_modes.push((outpath, mode));
            } else {
                set_unix_mode(&outpath, mode)?;
            }
        }
    }

    // Deepest first, so a parent's mode never blocks its children
    dir_modes.sort_by_key(|(path, _)| std::cmp::Reverse(path.components().count()));
    for (path, mode) in dir_modes {
        set_unix_mode(&path, mode)?;
    }
    Ok(())
}

fn set_unix_mode(path: &Path, mode: u32) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))?;
    }

    #[cfg(not(unix))]
    {
        let _ = (path, mode);
    }

    Ok(())
}
