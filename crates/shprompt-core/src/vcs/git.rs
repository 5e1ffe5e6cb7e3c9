//! Git repository status.

use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::Result;
use regex::Regex;

use super::command::eval_command;
use crate::util::relative_path;

/// Matches the `## branch...upstream [ahead N]` header of porcelain status.
static AHEAD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^## .*\[ahead \d+").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitInfo {
    pub repo_name: String,
    pub repo_path: String,
    /// Working directory relative to the repository root.
    pub relative_pwd: String,
    /// Current branch, or a short hash on a detached head.
    pub branch: String,
    /// Uncommitted local changes.
    pub dirty: bool,
    /// Local commits not yet pushed upstream.
    pub ahead: bool,
}

impl GitInfo {
    /// Short summary for the prompt's info segment, e.g. `repo: topic ^*`.
    pub fn info_string(&self) -> String {
        let mut info = self.repo_name.clone();
        if self.repo_name != self.branch {
            info.push_str(": ");
            info.push_str(&self.branch);
        }
        if self.ahead || self.dirty {
            info.push(' ');
            if self.ahead {
                info.push('^');
            }
            if self.dirty {
                info.push('*');
            }
        }
        info
    }
}

/// Queries the repository containing `pwd`. Fails outside a repository.
pub async fn git_info(pwd: &Path, timeout: Duration) -> Result<GitInfo> {
    let repo_path = eval_command(pwd, "git", &["rev-parse", "--show-toplevel"], timeout).await?;

    let (branch, status) = tokio::join!(
        current_branch(pwd, timeout),
        eval_command(pwd, "git", &["status", "--branch", "--porcelain"], timeout),
    );
    let branch = branch?;
    let (dirty, ahead) = parse_status(&status?);

    let repo_name = Path::new(&repo_path)
        .file_name()
        .map_or_else(|| repo_path.clone(), |n| n.to_string_lossy().into_owned());
    let relative_pwd = repo_relative(pwd, &repo_path);

    Ok(GitInfo {
        repo_name,
        repo_path,
        relative_pwd,
        branch,
        dirty,
        ahead,
    })
}

async fn current_branch(pwd: &Path, timeout: Duration) -> Result<String> {
    match eval_command(pwd, "git", &["symbolic-ref", "HEAD"], timeout).await {
        Ok(head) => Ok(head
            .strip_prefix("refs/heads/")
            .unwrap_or(&head)
            .to_string()),
        Err(err) => {
            tracing::debug!(error = %format!("{err:#}"), "no symbolic HEAD, using short hash");
            eval_command(pwd, "git", &["rev-parse", "--short", "HEAD"], timeout).await
        }
    }
}

/// Reads `(dirty, ahead)` from `git status --branch --porcelain` output.
pub fn parse_status(status: &str) -> (bool, bool) {
    let mut dirty = false;
    let mut ahead = false;
    for line in status.lines().filter(|line| !line.is_empty()) {
        if line.starts_with("## ") {
            ahead |= AHEAD_RE.is_match(line);
        } else {
            dirty = true;
        }
    }
    (dirty, ahead)
}

/// Git reports the root with symlinks resolved, so fall back to the
/// canonical form of `pwd` when the literal one does not match.
fn repo_relative(pwd: &Path, repo_path: &str) -> String {
    let literal = pwd.to_string_lossy();
    if literal.starts_with(repo_path) {
        return relative_path(&literal, repo_path);
    }
    match pwd.canonicalize() {
        Ok(canonical) => relative_path(&canonical.to_string_lossy(), repo_path),
        Err(_) => literal.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use std::process::Command;

    use tempfile::TempDir;

    use super::*;

    fn info(branch: &str, dirty: bool, ahead: bool) -> GitInfo {
        GitInfo {
            repo_name: "repo".to_string(),
            repo_path: "/src/repo".to_string(),
            relative_pwd: "/".to_string(),
            branch: branch.to_string(),
            dirty,
            ahead,
        }
    }

    #[test]
    fn test_info_string() {
        assert_eq!(info("main", false, false).info_string(), "repo: main");
        assert_eq!(info("repo", false, false).info_string(), "repo");
        assert_eq!(info("main", true, false).info_string(), "repo: main *");
        assert_eq!(info("main", false, true).info_string(), "repo: main ^");
        assert_eq!(info("main", true, true).info_string(), "repo: main ^*");
    }

    #[test]
    fn test_parse_status_clean() {
        assert_eq!(parse_status("## main...origin/main"), (false, false));
        assert_eq!(parse_status(""), (false, false));
    }

    #[test]
    fn test_parse_status_dirty() {
        assert_eq!(
            parse_status("## main...origin/main\n M src/lib.rs\n?? new.txt"),
            (true, false)
        );
    }

    #[test]
    fn test_parse_status_ahead() {
        assert_eq!(parse_status("## main...origin/main [ahead 2]"), (false, true));
        assert_eq!(
            parse_status("## main...origin/main [ahead 1, behind 3]\n M a"),
            (true, true)
        );
        assert_eq!(parse_status("## main...origin/main [behind 3]"), (false, false));
    }

    fn git(dir: &Path, args: &[&str]) -> bool {
        Command::new("git")
            .args(args)
            .current_dir(dir)
            .env("GIT_AUTHOR_NAME", "t")
            .env("GIT_AUTHOR_EMAIL", "t@example.com")
            .env("GIT_COMMITTER_NAME", "t")
            .env("GIT_COMMITTER_EMAIL", "t@example.com")
            .output()
            .is_ok_and(|o| o.status.success())
    }

    #[tokio::test]
    async fn test_git_info_in_repository() {
        let temp = TempDir::new().unwrap();
        let repo = temp.path().join("project");
        std::fs::create_dir_all(repo.join("src")).unwrap();
        if !git(&repo, &["init", "-q", "-b", "trunk"]) {
            // git is not available here.
            return;
        }
        std::fs::write(repo.join("src").join("file.txt"), "x").unwrap();

        let info = git_info(&repo.join("src"), Duration::from_secs(10))
            .await
            .unwrap();
        assert_eq!(info.repo_name, "project");
        assert_eq!(info.branch, "trunk");
        assert_eq!(info.relative_pwd, "src");
        assert!(info.dirty);
        assert!(!info.ahead);
        assert_eq!(info.info_string(), "project: trunk *");
    }

    #[tokio::test]
    async fn test_git_info_outside_repository() {
        let temp = TempDir::new().unwrap();
        if !git(temp.path(), &["--version"]) {
            return;
        }
        // Only meaningful when the temp dir is not itself inside a repository.
        if git(temp.path(), &["rev-parse", "--show-toplevel"]) {
            return;
        }
        assert!(git_info(temp.path(), Duration::from_secs(10)).await.is_err());
    }
}
