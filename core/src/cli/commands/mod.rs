pub mod classify;
pub mod run;

use crate::error::AppError;
use colored::Colorize;

/// Serialize a value as pretty-printed JSON and print it to stdout.
fn print_json(value: &impl serde::Serialize) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::parse(format!("cannot serialize output: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Print a heading followed by one indented label per line.
fn print_labels<S: AsRef<str>>(heading: &str, labels: &[S]) {
    println!("{}", heading.bold());
    if labels.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for label in labels {
        println!("  {}", label.as_ref().cyan());
    }
}
