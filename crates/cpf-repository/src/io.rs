//! Atomic writes with advisory locking

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use fs2::FileExt;

use crate::{Error, Result};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Stream `content` into `target` atomically.
///
/// Missing parent directories are created. Content lands in a temporary file
/// next to the target, under an exclusive lock, and is renamed into place, so
/// a failure leaves any existing file untouched.
pub fn write_atomic(target: &Path, content: &mut dyn Read) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let temp_path = temp_path_for(target);
    let outcome = fill_temp(&temp_path, content).and_then(|()| {
        fs::rename(&temp_path, target).map_err(|e| Error::io(target, e))
    });

    if outcome.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    outcome
}

fn fill_temp(temp_path: &Path, content: &mut dyn Read) -> Result<()> {
    let mut temp_file: File = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;

    temp_file
        .lock_exclusive()
        .map_err(|e| Error::io(temp_path, e))?;

    io::copy(content, &mut temp_file).map_err(|e| Error::io(temp_path, e))?;
    temp_file.flush().map_err(|e| Error::io(temp_path, e))?;
    temp_file.sync_all().map_err(|e| Error::io(temp_path, e))?;

    FileExt::unlock(&temp_file).map_err(|e| Error::io(temp_path, e))?;
    Ok(())
}

/// `.{name}.{pid}.{n}.tmp` in the target's own directory, so the rename never
/// crosses filesystems.
fn temp_path_for(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_name = format!(
        ".{}.{}.{}.tmp",
        name,
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    );
    target.with_file_name(temp_name)
}
