//! Read-only commands: exists, cat, stat and ls

use std::io::Write;

use chrono::DateTime;
use colored::Colorize;
use cpf_repository::{GenericFileFilter, ListOptions, ReadAccess};

use crate::cli::ListArgs;
use crate::context::AccessContext;
use crate::error::{CliError, Result};

/// Run the exists command
pub fn run_exists(context: &AccessContext, path: &str, out: &mut impl Write) -> Result<()> {
    if !context.reader().exists(path) {
        return Err(CliError::not_found(path));
    }
    writeln!(out, "{} {}", "found".green(), path)?;
    Ok(())
}

/// Run the cat command
pub fn run_cat(context: &AccessContext, path: &str, out: &mut impl Write) -> Result<()> {
    let reader = context.reader();
    if reader.fetch_file(path).is_some_and(|f| f.is_directory()) {
        return Err(CliError::user(format!("{path} is a directory")));
    }
    let content = reader
        .read_bytes(path)
        .ok_or_else(|| CliError::not_found(path))?;
    out.write_all(&content)?;
    Ok(())
}

/// Run the stat command
pub fn run_stat(context: &AccessContext, path: &str, out: &mut impl Write) -> Result<()> {
    let reader = context.reader();
    let file = reader
        .fetch_file(path)
        .ok_or_else(|| CliError::not_found(path))?;
    let kind = if file.is_directory() { "directory" } else { "file" };

    writeln!(out, "{}      {}", "name:".bold(), file.name())?;
    writeln!(out, "{}      {}", "path:".bold(), file.path())?;
    writeln!(out, "{} {}", "full path:".bold(), file.full_path())?;
    writeln!(out, "{} {}", "extension:".bold(), file.extension())?;
    writeln!(out, "{}      {}", "kind:".bold(), kind)?;
    writeln!(
        out,
        "{}  {}",
        "modified:".bold(),
        format_millis(reader.last_modified(path))
    )?;
    Ok(())
}

/// Run the ls command
pub fn run_ls(
    context: &AccessContext,
    path: &str,
    args: &ListArgs,
    out: &mut impl Write,
) -> Result<()> {
    let reader = context.reader();
    if !reader.exists(path) {
        return Err(CliError::not_found(path));
    }

    let filter = if args.extensions.is_empty() {
        GenericFileFilter::new()
    } else {
        GenericFileFilter::with_extensions(&args.extensions)
    }
    .accepting_directories();
    let options = ListOptions::from_depth(args.depth)
        .include_dirs(args.dirs)
        .include_hidden(args.hidden);

    let mut files = reader.list_files(path, &filter, options);
    files.sort_by(|a, b| a.path().cmp(b.path()));
    for file in &files {
        if file.is_directory() {
            writeln!(out, "{}", file.path().blue())?;
        } else {
            writeln!(out, "{}", file.path())?;
        }
    }
    tracing::debug!(path, entries = files.len(), "Listed");
    Ok(())
}

fn format_millis(millis: u64) -> String {
    i64::try_from(millis)
        .ok()
        .filter(|m| *m > 0)
        .and_then(DateTime::from_timestamp_millis)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "unknown".to_string())
}
