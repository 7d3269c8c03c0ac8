//! src/fs/bookmarks.rs
//! ============================================================================
//! # Bookmarked directories
//!
//! A sorted set of directories persisted as one path per line. Entries are
//! addressed by selection letter (`a` for the first, `b` for the second...),
//! so the set holds at most [`MAX_BOOKMARKS`] directories.

use std::{
    collections::BTreeSet,
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{debug, info, instrument};

use crate::error::{AppError, AppResult};

/// One per selection letter `a..=z`.
pub const MAX_BOOKMARKS: usize = 26;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bookmarks {
    file: Option<PathBuf>,
    dirs: BTreeSet<PathBuf>,
}

impl Bookmarks {
    /// Not backed by a file; changes live as long as the value.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Read `file`. A missing file is an empty set that will be created on
    /// the first change.
    #[instrument(level = "debug", fields(file = %file.display()))]
    pub fn load(file: &Path) -> AppResult<Self> {
        let dirs: BTreeSet<PathBuf> = match fs::read_to_string(file) {
            Ok(text) => text
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(PathBuf::from)
                .collect(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeSet::new(),
            Err(e) => return Err(AppError::file_operation("bookmarks", file, e)),
        };
        debug!(count = dirs.len(), "Bookmarks loaded");

        Ok(Self {
            file: Some(file.to_path_buf()),
            dirs,
        })
    }

    pub fn save(&self) -> AppResult<()> {
        let Some(file) = &self.file else {
            return Ok(());
        };
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).map_err(|e| AppError::file_operation("bookmarks", parent, e))?;
        }

        let mut text = String::new();
        for dir in &self.dirs {
            text.push_str(&dir.to_string_lossy());
            text.push('\n');
        }
        fs::write(file, text).map_err(|e| AppError::file_operation("bookmarks", file, e))?;
        info!(count = self.dirs.len(), "Bookmarks saved");
        Ok(())
    }

    /// Bookmark `dir`, or forget it if it is already bookmarked, and persist
    /// the result. Returns whether `dir` is bookmarked afterwards.
    pub fn toggle(&mut self, dir: &Path) -> AppResult<bool> {
        let added = if self.dirs.remove(dir) {
            false
        } else if self.dirs.len() >= MAX_BOOKMARKS {
            return Err(AppError::refused("bookmark", dir, "bookmark list is full"));
        } else {
            self.dirs.insert(dir.to_path_buf());
            true
        };

        self.save()?;
        Ok(added)
    }

    pub fn contains(&self, dir: &Path) -> bool {
        self.dirs.contains(dir)
    }

    /// The directory behind selection letter `letter`.
    pub fn by_letter(&self, letter: char) -> Option<&Path> {
        let index = (letter as u32).checked_sub('a' as u32)?;
        self.dirs.iter().nth(usize::try_from(index).ok()?).map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.dirs.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

/// Selection letter for the entry at `index`.
pub fn letter(index: usize) -> Option<char> {
    u8::try_from(index)
        .ok()
        .filter(|&i| usize::from(i) < MAX_BOOKMARKS)
        .map(|i| char::from(b'a' + i))
}
