//! Collects a [`PromptRequest`] from the running process.

use std::path::{Path, PathBuf};

use crate::prompt::PromptRequest;
use crate::style::StyledText;

/// Builds a request for the current shell session.
///
/// Missing pieces degrade to empty strings rather than errors; a prompt
/// should always render.
pub fn request_from_env(width: i32, exit_code: i32) -> PromptRequest {
    PromptRequest {
        timestamp: chrono::Local::now().naive_local(),
        home: home_dir(),
        pwd: working_directory(),
        hostname: system_hostname(),
        over_ssh: std::env::var_os("SSH_TTY").is_some_and(|tty| !tty.is_empty()),
        info: String::new(),
        info2: String::new(),
        flag: StyledText::new(),
        exit_code,
        width,
    }
}

fn home_dir() -> String {
    match std::env::var("HOME") {
        Ok(home) if !home.is_empty() => home,
        _ => dirs::home_dir()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}

/// Prefers `$PWD` so symlinked paths display the way the user typed them,
/// but only while it still names the actual working directory.
fn working_directory() -> String {
    let cwd = std::env::current_dir().ok();
    let logical = std::env::var("PWD").ok().filter(|p| !p.is_empty());
    pick_working_directory(logical.as_deref(), cwd.as_deref())
}

fn pick_working_directory(logical: Option<&str>, cwd: Option<&Path>) -> String {
    match (logical, cwd) {
        (Some(logical), Some(cwd)) if same_directory(Path::new(logical), cwd) => {
            logical.to_string()
        }
        (_, Some(cwd)) => cwd.to_string_lossy().into_owned(),
        (Some(logical), None) => logical.to_string(),
        (None, None) => String::new(),
    }
}

fn same_directory(a: &Path, b: &Path) -> bool {
    let canonical = |p: &Path| -> Option<PathBuf> { p.canonicalize().ok() };
    match (canonical(a), canonical(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn system_hostname() -> String {
    match hostname::get() {
        Ok(name) => name.to_string_lossy().into_owned(),
        Err(err) => {
            tracing::debug!(error = %err, "hostname unavailable");
            String::new()
        }
    }
}
