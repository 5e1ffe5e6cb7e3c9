//! Mercurial repository status.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use super::command::{eval_command, run_command};
use crate::util::{relative_path, search_parents};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HgInfo {
    pub repo_name: String,
    pub repo_path: String,
    /// Working directory relative to the repository root.
    pub relative_pwd: String,
    /// Uncommitted local changes.
    pub dirty: bool,
}

/// Facts that need a remote round trip, cached per repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpensiveHgInfo {
    pub unpushed: bool,
}

/// Returns the outermost ancestor of `pwd` holding a `.hg` directory.
pub fn find_repo_root(pwd: &Path) -> Option<PathBuf> {
    search_parents(pwd, |dir| dir.join(".hg").is_dir()).map(Path::to_path_buf)
}

pub fn info_string(info: &HgInfo, expensive: Option<ExpensiveHgInfo>) -> String {
    let unpushed = expensive.is_some_and(|e| e.unpushed);
    let mut out = info.repo_name.clone();
    if unpushed || info.dirty {
        out.push(' ');
        if unpushed {
            out.push('^');
        }
        if info.dirty {
            out.push('*');
        }
    }
    out
}

/// Queries the repository containing `pwd`. Fails outside a repository.
pub async fn hg_info(pwd: &Path, timeout: Duration) -> Result<HgInfo> {
    let Some(root) = find_repo_root(pwd) else {
        bail!("no .hg directory above {}", pwd.display());
    };
    let status = eval_command(pwd, "hg", &["status"], timeout).await?;

    let repo_path = root.to_string_lossy().into_owned();
    let repo_name = root
        .file_name()
        .map_or_else(|| repo_path.clone(), |n| n.to_string_lossy().into_owned());
    let relative_pwd = relative_path(&pwd.to_string_lossy(), &repo_path);

    Ok(HgInfo {
        repo_name,
        repo_path,
        relative_pwd,
        dirty: !status.is_empty(),
    })
}

/// Asks the default remote whether there are local changesets to push.
pub async fn expensive_hg_info(pwd: &Path, timeout: Duration) -> Result<ExpensiveHgInfo> {
    let output = run_command(pwd, "hg", &["outgoing", "--limit=1"], timeout).await?;
    // `hg outgoing` exits 1 when there is nothing to push.
    match output.status.code() {
        Some(0) => Ok(ExpensiveHgInfo { unpushed: true }),
        Some(1) => Ok(ExpensiveHgInfo { unpushed: false }),
        _ => bail!("`hg outgoing` failed ({}): {}", output.status, output.stderr),
    }
}
