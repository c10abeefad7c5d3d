use crate::error::{MirrorError, Result};
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => MirrorError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => MirrorError::from(e),
        })?;
    }
    Ok(())
}

pub fn remove_dir_recursive(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_dir_all(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => MirrorError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => MirrorError::from(e),
        })?;
    }
    Ok(())
}

/// Remove a file or a directory tree. Missing paths are ignored.
pub fn remove_path(path: &Path) -> Result<()> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => remove_dir_recursive(path),
        Ok(_) => Ok(std::fs::remove_file(path)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

pub fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        ensure_dir_exists(parent)?;
    }

    std::fs::copy(from, to)?;
    Ok(())
}

pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    ensure_dir_exists(dst)?;

    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }

    Ok(())
}

/// Parse a chmod-style octal string such as `755`, `0644` or `0o700`.
pub fn parse_octal_mode(value: &str) -> Result<u32> {
    let digits = value.strip_prefix("0o").unwrap_or(value);
    u32::from_str_radix(digits, 8)
        .ok()
        .filter(|mode| *mode <= 0o7777)
        .ok_or_else(|| MirrorError::InvalidMode {
            value: value.to_string(),
        })
}

pub fn set_mode(path: &Path, mode: u32) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))?;
    }

    // Windows has no mode bits to set
    #[cfg(not(unix))]
    {
        let _ = (path, mode);
    }

    Ok(())
}

/// Expand `~`, make the path absolute against the current directory and
/// resolve symlinks for the part of it that already exists.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    let expanded = expand_tilde(path)?;
    let joined = if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir()?.join(expanded)
    };
    Ok(resolve_existing_prefix(&normalize(&joined)))
}

fn expand_tilde(path: &Path) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => {
            let home = dirs::home_dir().ok_or(MirrorError::HomeDirectoryNotFound)?;
            Ok(home.join(rest))
        }
        Err(_) => Ok(path.to_path_buf()),
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn resolve_existing_prefix(path: &Path) -> PathBuf {
    let mut rest: Vec<OsString> = Vec::new();
    let mut current = path;
    loop {
        if let Ok(canonical) = current.canonicalize() {
            return rest.iter().rev().fold(canonical, |acc, part| acc.join(part));
        }
        match (current.parent(), current.file_name()) {
            (Some(parent), Some(name)) => {
                rest.push(name.to_os_string());
                current = parent;
            }
            _ => return path.to_path_buf(),
        }
    }
}

/// Shorten `/home/user/...` to `~/...` for display
pub fn shorten_path(path: &Path) -> String {
    dirs::home_dir()
        .and_then(|home| {
            path.strip_prefix(&home)
                .ok()
                .map(|rel| format!("~/{}", rel.display()))
        })
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_octal_mode() {
        assert_eq!(parse_octal_mode("755").unwrap(), 0o755);
        assert_eq!(parse_octal_mode("0644").unwrap(), 0o644);
        assert_eq!(parse_octal_mode("0o700").unwrap(), 0o700);
        assert!(parse_octal_mode("9").is_err());
        assert!(parse_octal_mode("").is_err());
        assert!(parse_octal_mode("rwx").is_err());
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/a/b/")), PathBuf::from("/a/b"));
    }

    #[test]
    fn test_absolutize_missing_tail() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().canonicalize().unwrap();
        let resolved = absolutize(&tmp.path().join("sub/../missing/*.sh")).unwrap();
        assert_eq!(resolved, base.join("missing").join("*.sh"));
    }

    #[test]
    fn test_shorten_path() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(shorten_path(&home.join("bin/tool")), "~/bin/tool");
        }
        assert_eq!(shorten_path(Path::new("/nonexistent-root/x")), "/nonexistent-root/x");
    }

    #[test]
    fn test_remove_path() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("f");
        let dir = tmp.path().join("d");
        std::fs::write(&file, b"x").unwrap();
        std::fs::create_dir_all(dir.join("inner")).unwrap();

        remove_path(&file).unwrap();
        remove_path(&dir).unwrap();
        remove_path(&tmp.path().join("missing")).unwrap();
        assert!(!file.exists());
        assert!(!dir.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_set_mode() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("tool");
        std::fs::write(&file, b"#!/bin/sh\n").unwrap();
        set_mode(&file, 0o700).unwrap();
        let mode = std::fs::metadata(&file).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
    }
}
