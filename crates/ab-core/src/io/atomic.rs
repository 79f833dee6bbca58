//! Atomic replace-on-write
//!
//! Content goes to a temporary file in the target's directory, is fsynced,
//! then renamed over the target. A concurrent reader sees either the old file
//! or the complete new one.

use crate::io::error::DocumentError;
use std::fs;
use std::io::Write;
use std::path::Path;

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> DocumentError + '_ {
    move |source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Atomically replace `path` with `contents`, creating parent directories.
///
/// An existing file keeps its permissions. New files get `0644` on Unix
/// rather than the temp file's private mode.
///
/// # Errors
///
/// Returns `DocumentError::Io` if the directory, temp file, or rename fails.
/// The target is unchanged on error.
pub fn atomic_write(path: &Path, contents: &[u8]) -> Result<(), DocumentError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(io_err(dir))?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".abridge-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(io_err(dir))?;

    tmp.write_all(contents).map_err(io_err(tmp.path()))?;
    tmp.as_file().sync_all().map_err(io_err(tmp.path()))?;

    match fs::metadata(path) {
        Ok(meta) => {
            fs::set_permissions(tmp.path(), meta.permissions()).map_err(io_err(tmp.path()))?;
        }
        Err(_) => set_default_mode(tmp.path())?,
    }

    // On error the temp file is dropped and removed; the target is untouched.
    tmp.persist(path).map_err(|e| DocumentError::Io {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

#[cfg(unix)]
fn set_default_mode(path: &Path) -> Result<(), DocumentError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o644)).map_err(io_err(path))
}

#[cfg(not(unix))]
fn set_default_mode(_path: &Path) -> Result<(), DocumentError> {
    Ok(())
}
