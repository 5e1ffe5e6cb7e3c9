use std::fs;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::{TempDir, tempdir};

/// A render command isolated from the caller's home, config and repository.
fn render_in(home: &TempDir, workdir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("shprompt");
    cmd.current_dir(workdir)
        .env("HOME", home.path())
        .env("PWD", workdir)
        .env("SHPROMPT_HOME", home.path().join(".shprompt"))
        .env("GIT_CEILING_DIRECTORIES", home.path())
        .env_remove("COLUMNS")
        .env_remove("SSH_TTY")
        .env_remove("SHPROMPT_LOG")
        .arg("render");
    cmd
}

fn workdir(home: &TempDir) -> std::path::PathBuf {
    let dir = home.path().join("work");
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_render_requires_width() {
    let home = tempdir().unwrap();
    let dir = workdir(&home);

    render_in(&home, &dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--width must be specified"));
}

#[test]
fn test_render_script_exports_prompt() {
    let home = tempdir().unwrap();
    let dir = workdir(&home);

    render_in(&home, &dir)
        .args(["--width", "80"])
        .assert()
        .success()
        .stdout(predicate::str::contains("export PROMPT="))
        .stdout(predicate::str::contains("export TERM_TITLE="))
        .stdout(predicate::str::contains("unset RPROMPT"))
        .stdout(predicate::str::contains("~/work"));
}

#[test]
fn test_render_width_from_columns() {
    let home = tempdir().unwrap();
    let dir = workdir(&home);

    render_in(&home, &dir)
        .env("COLUMNS", "80")
        .args(["--format", "title"])
        .assert()
        .success()
        .stdout("~/work");
}

#[test]
fn test_render_prompt_shows_exit_code() {
    let home = tempdir().unwrap();
    let dir = workdir(&home);

    render_in(&home, &dir)
        .args(["--width", "80", "--exit-code", "127", "--format", "prompt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("~/work"))
        .stdout(predicate::str::contains("[127]"))
        .stdout(predicate::str::ends_with("$ %{\x1b[0m%}"));
}

#[test]
fn test_render_raw_embedding_from_config() {
    let home = tempdir().unwrap();
    let dir = workdir(&home);
    let shprompt_home = home.path().join(".shprompt");
    fs::create_dir_all(&shprompt_home).unwrap();
    fs::write(
        shprompt_home.join("config.toml"),
        "embedding = \"raw\"\nprompt_symbol = \"% \"\n",
    )
    .unwrap();

    render_in(&home, &dir)
        .args(["--width", "80", "--format", "prompt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("%{").not())
        .stdout(predicate::str::ends_with("% \x1b[0m"));
}

#[test]
fn test_render_secondary_is_empty_without_info() {
    let home = tempdir().unwrap();
    let dir = workdir(&home);

    render_in(&home, &dir)
        .args(["--width", "80", "--format", "secondary"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_render_secondary_text() {
    let home = tempdir().unwrap();
    let dir = workdir(&home);

    render_in(&home, &dir)
        .args(["--width", "80", "--secondary", "batch 2"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "export RPROMPT='%{\x1b[0m%}batch 2%{\x1b[0m%}'",
        ))
        .stdout(predicate::str::contains("unset RPROMPT").not());
}

#[test]
fn test_render_secondary_format() {
    let home = tempdir().unwrap();
    let dir = workdir(&home);

    render_in(&home, &dir)
        .args(["--width", "80", "--format", "secondary", "--secondary", "right"])
        .assert()
        .success()
        .stdout("%{\x1b[0m%}right%{\x1b[0m%}");
}

#[test]
fn test_render_inside_git_repository() {
    let home = tempdir().unwrap();
    let repo = home.path().join("project");
    let nested = repo.join("src");
    fs::create_dir_all(&nested).unwrap();

    let initialized = std::process::Command::new("git")
        .args(["init", "-q", "-b", "main"])
        .current_dir(&repo)
        .output()
        .is_ok_and(|o| o.status.success());
    if !initialized {
        // git is not installed
        return;
    }

    render_in(&home, &nested)
        .env_remove("GIT_CEILING_DIRECTORIES")
        .args(["--width", "80", "--format", "title"])
        .assert()
        .success()
        .stdout("[project: main]src");
}
