//! Commands that change content in the first source

use std::fs::File;
use std::io::Write;
use std::path::Path;

use colored::Colorize;
use cpf_repository::{ReadAccess, ReadWriteAccess};

use crate::context::AccessContext;
use crate::error::{CliError, Result};

/// Run the put command
pub fn run_put(
    context: &AccessContext,
    path: &str,
    local: &Path,
    out: &mut impl Write,
) -> Result<()> {
    let mut file = File::open(local)?;
    if !context
        .writer()
        .save_stream(&context.write_path(path), &mut file)
    {
        return Err(CliError::user(format!("could not save {path}")));
    }
    writeln!(out, "{} {}", "saved".green(), path)?;
    Ok(())
}

/// Run the cp command
///
/// The source may come from any layer; the copy always lands in the first.
pub fn run_cp(context: &AccessContext, from: &str, to: &str, out: &mut impl Write) -> Result<()> {
    let content = context
        .reader()
        .read_bytes(from)
        .ok_or_else(|| CliError::not_found(from))?;
    if !context.writer().save_file(&context.write_path(to), &content) {
        return Err(CliError::user(format!("could not save {to}")));
    }
    writeln!(out, "{} {} -> {}", "copied".green(), from, to)?;
    Ok(())
}

/// Run the rm command
pub fn run_rm(context: &AccessContext, path: &str, out: &mut impl Write) -> Result<()> {
    let target = context.write_path(path);
    let writer = context.writer();
    if !writer.exists(&target) {
        return Err(CliError::not_found(path));
    }
    if !writer.delete_file(&target) {
        return Err(CliError::user(format!(
            "could not delete {path} (folders must be empty)"
        )));
    }
    writeln!(out, "{} {}", "deleted".green(), path)?;
    Ok(())
}

/// Run the mkdir command
pub fn run_mkdir(
    context: &AccessContext,
    path: &str,
    hidden: bool,
    out: &mut impl Write,
) -> Result<()> {
    if !context
        .writer()
        .create_folder(&context.write_path(path), hidden)
    {
        return Err(CliError::user(format!(
            "could not create folder {path} (it may already exist)"
        )));
    }
    writeln!(out, "{} {}", "created".green(), path)?;
    Ok(())
}
