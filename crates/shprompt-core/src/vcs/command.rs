//! External command execution with a deadline.

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use anyhow::{Context, Result, bail};

/// Captured result of a finished command.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    /// Trimmed stdout.
    pub stdout: String,
    /// Trimmed stderr.
    pub stderr: String,
}

/// Runs `program` in `dir` and waits at most `timeout` for it.
///
/// Fails only if the command cannot be spawned or does not finish in time;
/// a non-zero exit status is returned to the caller. The child is killed
/// when the deadline passes.
pub async fn run_command(
    dir: &Path,
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<CommandOutput> {
    let display = command_line(program, args);
    let child = tokio::process::Command::new(program)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("spawn `{display}`"))?;

    let output = tokio::time::timeout(timeout, child.wait_with_output())
        .await
        .with_context(|| format!("`{display}` timed out after {}ms", timeout.as_millis()))?
        .with_context(|| format!("wait for `{display}`"))?;

    Ok(CommandOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

/// Runs `program` in `dir` and returns its trimmed stdout.
///
/// A non-zero exit status is an error carrying the command's stderr.
pub async fn eval_command(
    dir: &Path,
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<String> {
    let output = run_command(dir, program, args, timeout).await?;
    if !output.status.success() {
        bail!(
            "`{}` failed ({}): {}",
            command_line(program, args),
            output.status,
            output.stderr
        );
    }
    Ok(output.stdout)
}

fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_eval_command() {
        let output = eval_command(Path::new("/"), "echo", &["hi"], TIMEOUT)
            .await
            .unwrap();
        assert_eq!(output, "hi");
    }

    #[tokio::test]
    async fn test_eval_command_missing_program() {
        let err = eval_command(Path::new("/"), "not-a-valid-command", &[], TIMEOUT)
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("spawn `not-a-valid-command`"));
    }

    #[tokio::test]
    async fn test_eval_command_failure_carries_stderr() {
        let err = eval_command(
            Path::new("/"),
            "sh",
            &["-c", "echo broken >&2; exit 3"],
            TIMEOUT,
        )
        .await
        .unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("broken"), "{message}");
    }

    #[tokio::test]
    async fn test_run_command_reports_status() {
        let output = run_command(Path::new("/"), "sh", &["-c", "echo out; exit 1"], TIMEOUT)
            .await
            .unwrap();
        assert_eq!(output.status.code(), Some(1));
        assert_eq!(output.stdout, "out");
    }

    #[tokio::test]
    async fn test_run_command_uses_directory() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("marker.txt"), "").unwrap();
        let output = eval_command(temp.path(), "ls", &[], TIMEOUT).await.unwrap();
        assert!(output.contains("marker.txt"));
    }

    #[tokio::test]
    async fn test_run_command_times_out() {
        let err = run_command(
            Path::new("/"),
            "sleep",
            &["5"],
            Duration::from_millis(50),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }
}
