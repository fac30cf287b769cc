use super::{print_json, print_labels};
use crate::classify::classify;
use crate::cli::{Outcome, OutputFormat};
use crate::error::AppError;
use crate::sources::local_git::{GitComparison, LocalGitSource};
use crate::sources::traits::Comparison;
use colored::Colorize;
use std::path::Path;

/// Classify `<base>..<head>` in a local repository without touching the
/// working tree or the API.
pub fn run(repo_path: &Path, spec: &str, format: OutputFormat) -> Result<Outcome, AppError> {
    let comparison = Comparison::parse(spec).ok_or_else(|| {
        AppError::parse(format!("invalid comparison '{spec}', expected <base>..<head>"))
    })?;

    let git = LocalGitSource::new(repo_path.to_path_buf())?;
    let resolve = |rev: &str| {
        git.rev_parse(rev)
            .map_err(|_| AppError::git(format!("unknown revision '{rev}'"), "rev-parse"))
    };
    let base = resolve(&comparison.old)?;
    let head = resolve(&comparison.new)?;

    let merge_base = git.get_merge_base(&base, &head)?;
    let source = GitComparison::new(&git, Comparison::new(merge_base, head), base);
    let files = source.changed_files()?;
    let labels = classify(&files, &source)?;

    if format == OutputFormat::Json {
        let output = serde_json::json!({
            "comparison": comparison.key(),
            "files": files,
            "labels": labels.iter().map(|label| serde_json::json!({
                "key": label.key(),
                "name": label.display_name(),
            })).collect::<Vec<_>>(),
        });
        print_json(&output)?;
    } else {
        println!(
            "{} {} ({} file(s) changed)",
            "Comparing".bold(),
            comparison.key().cyan(),
            files.len()
        );
        print_labels("Labels:", &labels.display_names());
    }

    Ok(Outcome::Classified(labels))
}
