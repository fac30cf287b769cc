//! Throwaway git repositories for integration tests.
//!
//! `origin` plays the hosting side (base branch, pull request refs), `work`
//! is a clone of it standing in for the CI checkout.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub const BASE_FILES: &[(&str, &str)] = &[
    ("oh-my-zsh.sh", "source $ZSH/lib/functions.zsh\n"),
    (
        "lib/functions.zsh",
        "function zsh_stats() {\n  fc -l 1 | head -20\n}\n",
    ),
    ("plugins/git/git.plugin.zsh", "alias g='git'\nalias ga='git add'\n"),
    ("plugins/git/README.md", "# git plugin\n"),
    ("themes/robbyrussell.zsh-theme", "PROMPT='%~ '\n"),
    ("tools/install.sh", "#!/bin/sh\necho install\n"),
];

pub fn git(repo: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args([
            "-c",
            "user.name=Test",
            "-c",
            "user.email=test@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .current_dir(repo)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_owned()
}

/// Write (or with `None`, delete) files and commit them. Returns the new SHA.
pub fn commit(repo: &Path, files: &[(&str, Option<&str>)], message: &str) -> String {
    for (path, content) in files {
        let full = repo.join(path);
        match content {
            Some(content) => {
                if let Some(parent) = full.parent() {
                    fs::create_dir_all(parent).unwrap();
                }
                fs::write(&full, content).unwrap();
                git(repo, &["--literal-pathspecs", "add", "--", path]);
            }
            None => {
                git(repo, &["--literal-pathspecs", "rm", "-q", "--", path]);
            }
        }
    }
    git(repo, &["commit", "-q", "-m", message]);
    git(repo, &["rev-parse", "HEAD"])
}

pub struct Fixture {
    _tmp: TempDir,
    pub origin: PathBuf,
    pub work: PathBuf,
}

impl Fixture {
    /// A repository with [`BASE_FILES`] committed on `master`.
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let origin = tmp.path().join("origin");
        fs::create_dir_all(&origin).unwrap();
        git(&origin, &["init", "-q"]);
        git(&origin, &["symbolic-ref", "HEAD", "refs/heads/master"]);

        let files: Vec<_> = BASE_FILES.iter().map(|(p, c)| (*p, Some(*c))).collect();
        commit(&origin, &files, "initial");

        Self {
            work: tmp.path().join("work"),
            origin,
            _tmp: tmp,
        }
    }

    /// Create `branch` from `master` in origin with one commit of `files`.
    /// Returns the branch head.
    pub fn branch(&self, branch: &str, files: &[(&str, Option<&str>)]) -> String {
        self.branch_from("master", branch, files)
    }

    /// Like [`Fixture::branch`], starting from `start` instead of `master`.
    pub fn branch_from(&self, start: &str, branch: &str, files: &[(&str, Option<&str>)]) -> String {
        git(&self.origin, &["checkout", "-q", "-b", branch, start]);
        let sha = commit(&self.origin, files, branch);
        git(&self.origin, &["checkout", "-q", "master"]);
        sha
    }

    /// Advance `master` in origin.
    pub fn advance_master(&self, files: &[(&str, Option<&str>)]) -> String {
        git(&self.origin, &["checkout", "-q", "master"]);
        commit(&self.origin, files, "master moves on")
    }

    /// Publish `sha` as the head of pull request `number`.
    pub fn open_pull_request(&self, number: u64, sha: &str) {
        let pull_ref = format!("refs/pull/{number}/head");
        git(&self.origin, &["update-ref", &pull_ref, sha]);
    }

    /// Clone origin into `work` and return its path.
    pub fn clone_work(&self) -> &Path {
        let parent = self.work.parent().unwrap();
        git(parent, &["clone", "-q", "origin", "work"]);
        &self.work
    }
}
