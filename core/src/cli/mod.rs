pub mod commands;

use crate::classify::LabelSet;
use crate::error::AppError;
use crate::reconcile::LabelUpdate;
use crate::sources::github::DEFAULT_API_URL;
use clap::{Args, Parser, Subcommand};
use std::fmt;
use std::path::{Path, PathBuf};

pub use crate::error::NEUTRAL_EXIT_CODE;

#[derive(Debug, Parser)]
#[command(name = "labeler")]
#[command(author, version, about = "Label pull requests from their diff", long_about = None)]
pub struct Cli {
    /// Repository working tree (defaults to the enclosing git repository)
    #[arg(short, long, global = true, env = "GITHUB_WORKSPACE")]
    pub repo: Option<String>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Trace every git command and rule hit; any `DEBUG` value other than
    /// a false-like one (`0`, `false`, `no`, `off`, empty) turns it on
    #[arg(
        long,
        global = true,
        env = "DEBUG",
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Label the pull request described by an event payload
    Run(RunArgs),

    /// Show the labels a comparison would receive
    Classify {
        /// Comparison spec, e.g. master..my-branch
        spec: String,
    },
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Pull request event payload (JSON)
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: PathBuf,

    /// API token; without one the run is skipped
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Commit the workflow was triggered for
    #[arg(long, env = "GITHUB_SHA")]
    pub sha: Option<String>,

    /// REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Remote to fetch the base branch and pull request head from
    #[arg(long, default_value = "origin")]
    pub remote: String,

    /// Compute the label update but do not send it
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Get the repository path, using the enclosing repository as default.
    /// Falls back to the current directory; opening it reports the error.
    fn get_repo_path(&self) -> Result<PathBuf, AppError> {
        if let Some(ref repo) = self.repo {
            return Ok(PathBuf::from(repo));
        }

        let cwd = std::env::current_dir()?;

        let repo = cwd
            .ancestors()
            .find(|dir| dir.join(".git").exists())
            .map_or_else(|| cwd.clone(), Path::to_path_buf);
        Ok(repo)
    }
}

/// How an invocation ended, short of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Labels were written, or printed under `--dry-run`.
    Labeled(LabelUpdate),
    /// A local comparison was classified.
    Classified(LabelSet),
    /// Nothing to do for this event.
    Skipped(SkipReason),
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Labeled(_) | Self::Classified(_) => 0,
            Self::Skipped(_) => NEUTRAL_EXIT_CODE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Event action other than `opened`/`synchronize`.
    IrrelevantAction(String),
    /// The pull request moved on since the event fired; a newer event will
    /// cover it.
    StaleHead { expected: String, found: String },
    /// Every derived label is already applied, or none were derived.
    NothingToWrite,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IrrelevantAction(action) => write!(f, "action '{action}' is not handled"),
            Self::StaleHead { expected, found } => {
                write!(f, "head is {found}, event was for {expected}")
            }
            Self::NothingToWrite => f.write_str("no labels to add"),
        }
    }
}

/// Route `log` output to stderr; `debug` lowers the filter to debug level.
pub fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

/// Run the CLI
pub fn run(cli: Cli) -> Result<Outcome, AppError> {
    let repo_path = cli.get_repo_path()?;

    match cli.command {
        Commands::Run(args) => commands::run::run(&repo_path, &args, cli.format),
        Commands::Classify { spec } => commands::classify::run(&repo_path, &spec, cli.format),
    }
}
