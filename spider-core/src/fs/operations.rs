//! src/fs/operations.rs
//! ============================================================================
//! # File operations behind the browser's built-in keys
//!
//! Each operation either succeeds or returns an [`AppError::FileOperation`]
//! naming the operation and the path that failed, or an
//! [`AppError::OperationRefused`] when a precondition rules it out before the
//! filesystem is touched.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use crate::error::{AppError, AppResult};

#[instrument(level = "info", fields(path = %path.display()))]
pub fn create_file(path: &Path) -> AppResult<()> {
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| AppError::file_operation("create", path, e))?;
    info!("File created");
    Ok(())
}

#[instrument(level = "info", fields(path = %path.display()))]
pub fn create_dir(path: &Path) -> AppResult<()> {
    fs::create_dir(path).map_err(|e| AppError::file_operation("mkdir", path, e))?;
    info!("Directory created");
    Ok(())
}

/// Remove a file, link or whole directory tree. Links are removed, not
/// followed.
#[instrument(level = "info", fields(path = %path.display()))]
pub fn delete(path: &Path) -> AppResult<()> {
    let meta = fs::symlink_metadata(path).map_err(|e| AppError::file_operation("delete", path, e))?;
    let result = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| AppError::file_operation("delete", path, e))?;
    info!("Deleted");
    Ok(())
}

#[instrument(level = "info", fields(from = %from.display(), to = %to.display()))]
pub fn rename(from: &Path, to: &Path) -> AppResult<()> {
    fs::rename(from, to).map_err(|e| AppError::file_operation("rename", from, e))?;
    info!("Renamed");
    Ok(())
}

/// Copy `source` (file or tree) into `dest_dir`, keeping its name.
#[instrument(level = "info", fields(source = %source.display(), dest_dir = %dest_dir.display()))]
pub fn copy_into(source: &Path, dest_dir: &Path) -> AppResult<PathBuf> {
    let target = target_in(source, dest_dir, "copy")?;

    if !fs::symlink_metadata(source)
        .map_err(|e| AppError::file_operation("copy", source, e))?
        .is_dir()
    {
        fs::copy(source, &target).map_err(|e| AppError::file_operation("copy", source, e))?;
        return Ok(target);
    }

    if dest_dir.starts_with(source) {
        return Err(AppError::refused("copy", source, "cannot copy a directory into itself"));
    }

    for entry in WalkDir::new(source).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            AppError::file_operation("copy", path, e.into())
        })?;
        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let destination = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination)
                .map_err(|e| AppError::file_operation("copy", &destination, e))?;
        } else {
            fs::copy(entry.path(), &destination)
                .map_err(|e| AppError::file_operation("copy", entry.path(), e))?;
        }
        debug!(path = %destination.display(), "Copied");
    }

    info!("Tree copied");
    Ok(target)
}

/// Move `source` into `dest_dir`, keeping its name.
pub fn move_into(source: &Path, dest_dir: &Path) -> AppResult<PathBuf> {
    let target = target_in(source, dest_dir, "move")?;
    rename(source, &target)?;
    Ok(target)
}

/// `dest_dir/<name of source>`, refused when something already lives there.
fn target_in(source: &Path, dest_dir: &Path, operation: &'static str) -> AppResult<PathBuf> {
    let name = source
        .file_name()
        .ok_or_else(|| AppError::refused(operation, source, "path has no file name"))?;
    let target = dest_dir.join(name);
    if fs::symlink_metadata(&target).is_ok() {
        return Err(AppError::refused(operation, &target, "target already exists"));
    }
    Ok(target)
}
