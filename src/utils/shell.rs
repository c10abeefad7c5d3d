use crate::error::{MirrorError, Result};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Run a post-install command through the platform shell, from the
/// directory containing the mirrored file.
pub fn run_post_install(target: &Path, command: Option<&str>) -> Result<()> {
    let Some(command) = command else {
        return Ok(());
    };

    let workdir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    debug!(command, workdir = %workdir.display(), "running post-install");

    let status = shell_command(command).current_dir(workdir).status()?;
    if !status.success() {
        return Err(MirrorError::PostInstallFailed {
            command: command.to_string(),
            code: status.code().unwrap_or(-1),
        });
    }
    Ok(())
}

fn shell_command(command: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_no_command_is_noop() {
        run_post_install(Path::new("/nonexistent/file"), None).unwrap();
    }

    #[test]
    fn test_runs_in_parent_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("tool");
        run_post_install(&target, Some("touch marker")).unwrap();
        assert!(tmp.path().join("marker").exists());
    }

    #[test]
    fn test_failure_reports_exit_code() {
        let tmp = tempfile::tempdir().unwrap();
        let err = run_post_install(&tmp.path().join("tool"), Some("exit 3")).unwrap_err();
        match err {
            MirrorError::PostInstallFailed { command, code } => {
                assert_eq!(command, "exit 3");
                assert_eq!(code, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
