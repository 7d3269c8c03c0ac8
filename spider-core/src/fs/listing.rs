//! src/fs/listing.rs
//! ============================================================================
//! # Directory listing
//!
//! Synchronous scan of one directory into display-ready [`Entry`] values,
//! sorted directories first and then by case-insensitive name. Hidden files
//! are listed like any other entry.

use std::{
    cmp::Ordering,
    fs::{self, Metadata},
    io::{self, Read},
    path::{Path, PathBuf},
};

use bytesize::ByteSize;
use compact_str::{CompactString, ToCompactString};
use tracing::{debug, instrument};

use crate::error::{AppError, AppResult};

/// Bytes inspected when deciding whether a file is text.
pub const SNIFF_LEN: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    Symlink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: CompactString,
    pub path: PathBuf,
    pub kind: EntryKind,
    /// Target is a directory (follows symlinks).
    pub is_dir: bool,
    /// Size of regular files; `None` for directories and links.
    pub size: Option<u64>,
    /// Permission bits (`0o777` mask).
    pub mode: u32,
}

impl Entry {
    fn from_path(path: PathBuf) -> io::Result<Self> {
        let link_meta = fs::symlink_metadata(&path)?;
        let is_symlink = link_meta.file_type().is_symlink();
        let is_dir = if is_symlink {
            fs::metadata(&path).map(|m| m.is_dir()).unwrap_or(false)
        } else {
            link_meta.is_dir()
        };

        let kind = match (is_symlink, link_meta.is_dir()) {
            (true, _) => EntryKind::Symlink,
            (false, true) => EntryKind::Directory,
            (false, false) => EntryKind::File,
        };
        let size = (kind == EntryKind::File).then(|| link_meta.len());

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_compact_string())
            .unwrap_or_default();

        Ok(Self {
            name,
            path,
            kind,
            is_dir,
            size,
            mode: permission_bits(&link_meta),
        })
    }

    /// `/` for directories, `~>` for links, otherwise a humanized size.
    pub fn size_label(&self) -> String {
        match (self.kind, self.size) {
            (EntryKind::Symlink, _) => "~>".to_string(),
            (_, Some(size)) => ByteSize::b(size).to_string(),
            _ => "/".to_string(),
        }
    }

    pub fn is_executable(&self) -> bool {
        !self.is_dir && self.mode & 0o111 != 0
    }
}

/// List `path`. Entries whose metadata cannot be read are skipped.
#[instrument(level = "debug", fields(path = %path.display()))]
pub fn scan_dir(path: &Path) -> AppResult<Vec<Entry>> {
    let read_dir = fs::read_dir(path).map_err(|source| AppError::Listing {
        path: path.to_path_buf(),
        source,
    })?;

    let mut entries: Vec<Entry> = read_dir
        .filter_map(|entry| match entry.and_then(|e| Entry::from_path(e.path())) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unreadable entry: {e}");
                None
            }
        })
        .collect();

    sort_entries(&mut entries);
    debug!(count = entries.len(), "Directory scanned");
    Ok(entries)
}

/// Directories first, then case-insensitive name order.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(|a, b| match (a.is_dir, b.is_dir) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => compare_names(&a.name, &b.name),
    });
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_uppercase)
        .cmp(b.chars().flat_map(char::to_uppercase))
        .then_with(|| a.cmp(b))
}

/// Heuristic: empty or no NUL byte in the first [`SNIFF_LEN`] bytes.
pub fn looks_like_text(path: &Path) -> io::Result<bool> {
    let mut head = Vec::with_capacity(SNIFF_LEN);
    fs::File::open(path)?
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut head)?;
    Ok(!head.contains(&0))
}

#[cfg(unix)]
fn permission_bits(meta: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o777
}

#[cfg(not(unix))]
fn permission_bits(meta: &Metadata) -> u32 {
    if meta.permissions().readonly() { 0o444 } else { 0o644 }
}
