use super::traits::{Comparison, DiffSource};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocalGitError {
    #[error("Git error: {0}")]
    Git(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Not a git repository")]
    NotARepo,
}

/// Identity used for the trial merge; nothing is ever committed with it.
const MERGE_IDENTITY: [&str; 4] = [
    "-c",
    "user.name=labeler",
    "-c",
    "user.email=labeler@localhost",
];

#[derive(Debug)]
pub struct LocalGitSource {
    repo_path: PathBuf,
}

impl LocalGitSource {
    pub fn new(repo_path: PathBuf) -> Result<Self, LocalGitError> {
        if !repo_path.join(".git").exists() {
            return Err(LocalGitError::NotARepo);
        }
        Ok(Self { repo_path })
    }

    /// Resolve a ref to a full commit SHA.
    pub fn rev_parse(&self, git_ref: &str) -> Result<String, LocalGitError> {
        let spec = format!("{git_ref}^{{commit}}");
        let output = self.run_git(&["rev-parse", "--verify", "--quiet", &spec])?;
        Ok(output.trim().to_owned())
    }

    /// Fetch a single refspec from a remote and return the fetched commit.
    pub fn fetch(&self, remote: &str, refspec: &str) -> Result<String, LocalGitError> {
        self.run_git(&["fetch", "--quiet", "--no-tags", remote, refspec])?;
        self.rev_parse("FETCH_HEAD")
    }

    /// Check out a commit with a detached HEAD.
    pub fn checkout_detached(&self, commit: &str) -> Result<(), LocalGitError> {
        self.run_git(&["checkout", "--quiet", "--detach", commit])?;
        Ok(())
    }

    /// Get the merge-base between two refs
    pub fn get_merge_base(&self, ref1: &str, ref2: &str) -> Result<String, LocalGitError> {
        let output = self.run_git(&["merge-base", ref1, ref2])?;
        Ok(output.trim().to_owned())
    }

    /// Paths touched between the two sides of a comparison, sorted and
    /// deduplicated. Renames are reported as a deletion plus an addition so
    /// both paths are classified.
    pub fn changed_files(&self, comparison: &Comparison) -> Result<Vec<String>, LocalGitError> {
        // NUL-terminated names are never C-quoted
        let output = self.run_git(&[
            "diff",
            "--name-only",
            "-z",
            "--no-renames",
            &comparison.old,
            &comparison.new,
        ])?;
        let files: BTreeSet<&str> = split_nul(&output).collect();
        Ok(files.into_iter().map(str::to_owned).collect())
    }

    /// Unified diff of one file between the two sides of a comparison.
    pub fn file_diff(
        &self,
        comparison: &Comparison,
        file_path: &str,
    ) -> Result<String, LocalGitError> {
        self.run_git(&[
            "--literal-pathspecs",
            "diff",
            "--no-color",
            "--no-ext-diff",
            "--src-prefix=a/",
            "--dst-prefix=b/",
            &comparison.old,
            &comparison.new,
            "--",
            file_path,
        ])
    }

    /// Whether `path` (file or directory) is present in the tree of `git_ref`.
    pub fn path_exists_at(&self, git_ref: &str, path: &str) -> Result<bool, LocalGitError> {
        let output = self.run_git(&[
            "--literal-pathspecs",
            "ls-tree",
            "--name-only",
            "-z",
            git_ref,
            "--",
            path,
        ])?;
        let exists = split_nul(&output).any(|entry| entry == path);
        Ok(exists)
    }

    /// Try merging `head` into the checked-out commit and report whether the
    /// merge failed. The attempt is always aborted before returning, so the
    /// working tree is left as it was.
    pub fn has_conflicts(&self, head: &str) -> Result<bool, LocalGitError> {
        let guard = MergeGuard { git: self };
        let mut args: Vec<&str> = MERGE_IDENTITY.to_vec();
        args.extend(["merge", "--quiet", "--no-commit", "--no-ff", head]);
        let result = self.run_git(&args);
        drop(guard);

        match result {
            Ok(_) => Ok(false),
            Err(LocalGitError::Git(stderr)) => {
                log::debug!("[git] trial merge of {head} failed: {}", stderr.trim());
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }

    fn run_git(&self, args: &[&str]) -> Result<String, LocalGitError> {
        log::debug!("[git] git {}", args.join(" "));
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(LocalGitError::Git(
                String::from_utf8_lossy(&output.stderr).to_string(),
            ))
        }
    }
}

fn split_nul(output: &str) -> impl Iterator<Item = &str> {
    output.split('\0').filter(|entry| !entry.is_empty())
}

/// Aborts any in-progress merge when dropped.
struct MergeGuard<'a> {
    git: &'a LocalGitSource,
}

impl Drop for MergeGuard<'_> {
    fn drop(&mut self) {
        // Fails harmlessly when the merge never started (e.g. already up to date)
        if let Err(e) = self.git.run_git(&["merge", "--abort"]) {
            log::debug!("[git] merge --abort: {e}");
        }
    }
}

/// A [`DiffSource`] over a local repository: diffs run over `comparison`,
/// existence is answered from the tree of `base_ref`.
#[derive(Debug)]
pub struct GitComparison<'a> {
    git: &'a LocalGitSource,
    comparison: Comparison,
    base_ref: String,
}

impl<'a> GitComparison<'a> {
    pub fn new(
        git: &'a LocalGitSource,
        comparison: Comparison,
        base_ref: impl Into<String>,
    ) -> Self {
        Self {
            git,
            comparison,
            base_ref: base_ref.into(),
        }
    }

    pub fn changed_files(&self) -> Result<Vec<String>, LocalGitError> {
        self.git.changed_files(&self.comparison)
    }
}

impl DiffSource for GitComparison<'_> {
    type Error = LocalGitError;

    fn file_diff(&self, file_path: &str) -> Result<String, Self::Error> {
        self.git.file_diff(&self.comparison, file_path)
    }

    fn exists_in_base(&self, path: &str) -> Result<bool, Self::Error> {
        self.git.path_exists_at(&self.base_ref, path)
    }
}
