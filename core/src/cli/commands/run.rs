use super::{print_json, print_labels};
use crate::classify::classify;
use crate::cli::{Outcome, OutputFormat, RunArgs, SkipReason};
use crate::error::AppError;
use crate::event::PullRequestEvent;
use crate::reconcile::{reconcile, LabelUpdate};
use crate::sources::github::{GitHubProvider, RestClient};
use crate::sources::local_git::{GitComparison, LocalGitSource};
use crate::sources::traits::Comparison;
use colored::Colorize;
use std::path::Path;

pub fn run(repo_path: &Path, args: &RunArgs, format: OutputFormat) -> Result<Outcome, AppError> {
    let event = PullRequestEvent::from_path(&args.event_path)?;
    if let Some(skipped) = skip_irrelevant(&event) {
        report(&skipped, args.dry_run, format)?;
        return Ok(skipped);
    }

    let client = match args.token.as_deref().filter(|t| !t.is_empty()) {
        _ if args.dry_run => None,
        Some(token) => Some(RestClient::new(&args.api_url, token)),
        None => return Err(AppError::config("GITHUB_TOKEN is not set")),
    };

    let git = LocalGitSource::new(repo_path.to_path_buf())?;
    let outcome = label_pull_request(
        &git,
        &event,
        args.sha.as_deref(),
        &args.remote,
        client.as_ref(),
    )?;

    report(&outcome, args.dry_run, format)?;
    Ok(outcome)
}

/// Label one pull request snapshot.
///
/// `ambient_sha` is the commit the workflow was triggered for; when it is not
/// the head from the payload, the pull request head is fetched from `remote`
/// and the run is skipped if it has moved on. The base branch is fetched and
/// checked out, the merge-base diff classified, and a trial merge decides the
/// conflict marker. Without a `provider` the update is computed but not sent.
pub fn label_pull_request<P>(
    git: &LocalGitSource,
    event: &PullRequestEvent,
    ambient_sha: Option<&str>,
    remote: &str,
    provider: Option<&P>,
) -> Result<Outcome, AppError>
where
    P: GitHubProvider,
    AppError: From<P::Error>,
{
    if let Some(skipped) = skip_irrelevant(event) {
        return Ok(skipped);
    }
    let number = event.pull_request.number;

    let expected = &event.pull_request.head.sha;
    let head = if ambient_sha == Some(expected.as_str()) {
        expected.clone()
    } else {
        log::info!("[labeler] #{number}: fetching head from {remote}");
        let found = git.fetch(remote, &format!("refs/pull/{number}/head"))?;
        if found != *expected {
            log::warn!("[labeler] #{number}: head moved to {found}, event was for {expected}");
            return Ok(Outcome::Skipped(SkipReason::StaleHead {
                expected: expected.clone(),
                found,
            }));
        }
        found
    };

    let base_ref = &event.pull_request.base.name;
    let base = git.fetch(remote, base_ref)?;
    git.checkout_detached(&base)?;

    let merge_base = git.get_merge_base(&base, &head)?;
    let source = GitComparison::new(git, Comparison::new(merge_base, head.clone()), base);
    let changed = source.changed_files()?;
    log::info!(
        "[labeler] #{number}: {} file(s) changed against {base_ref}",
        changed.len()
    );

    let derived = classify(&changed, &source)?;
    let conflicted = git.has_conflicts(&head)?;
    if conflicted {
        log::info!("[labeler] #{number}: does not merge cleanly into {base_ref}");
    }

    let Some(update) = reconcile(&derived, conflicted, &event.current_labels()) else {
        return Ok(Outcome::Skipped(SkipReason::NothingToWrite));
    };

    match provider {
        Some(provider) => {
            provider.apply(&event.repo(), number, &update)?;
            log::info!(
                "[labeler] #{number}: {} {:?}",
                if update.is_replace() { "replaced" } else { "added" },
                update.labels()
            );
        }
        None => log::info!("[labeler] #{number}: dry run, not sending {update:?}"),
    }

    Ok(Outcome::Labeled(update))
}

fn skip_irrelevant(event: &PullRequestEvent) -> Option<Outcome> {
    if event.is_relevant() {
        return None;
    }
    log::info!(
        "[labeler] #{}: ignoring '{}' event",
        event.pull_request.number,
        event.action
    );
    Some(Outcome::Skipped(SkipReason::IrrelevantAction(
        event.action.clone(),
    )))
}

fn report(outcome: &Outcome, dry_run: bool, format: OutputFormat) -> Result<(), AppError> {
    if format == OutputFormat::Json {
        let value = match outcome {
            Outcome::Labeled(update) => serde_json::json!({
                "outcome": "labeled",
                "dry_run": dry_run,
                "update": update,
            }),
            Outcome::Skipped(reason) => serde_json::json!({
                "outcome": "skipped",
                "reason": reason.to_string(),
            }),
            Outcome::Classified(labels) => serde_json::json!({
                "outcome": "classified",
                "labels": labels,
            }),
        };
        return print_json(&value);
    }

    match outcome {
        Outcome::Labeled(update) => {
            let verb = match (update, dry_run) {
                (LabelUpdate::Add(_), false) => "Added labels:",
                (LabelUpdate::Add(_), true) => "Would add labels:",
                (LabelUpdate::Replace(_), false) => "Replaced labels with:",
                (LabelUpdate::Replace(_), true) => "Would replace labels with:",
            };
            print_labels(verb, update.labels());
        }
        Outcome::Skipped(reason) => println!("{} {reason}", "Skipped:".dimmed()),
        Outcome::Classified(labels) => print_labels("Labels:", &labels.display_names()),
    }
    Ok(())
}
