// crates/cache/src/disk.rs
//! On-disk image cache
//!
//! Entries live at `<dir>/<md5 of source ref>.img`. Writes go through a
//! temporary file in the same directory and are renamed into place, so a
//! reader never sees a half-written entry.

use crate::error::{CacheError, CacheResult};
use bytes::Bytes;
use directories::ProjectDirs;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use storyreel_core::ImageCache;
use tempfile::NamedTempFile;

const ENTRY_EXTENSION: &str = "img";

#[derive(Debug, Clone)]
pub struct DiskImageCache {
    directory: PathBuf,
}

impl DiskImageCache {
    /// Cache rooted at `directory`; the directory is created on first write
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Cache in the platform cache directory
    pub fn with_default_directory() -> CacheResult<Self> {
        Ok(Self::new(Self::default_directory()?))
    }

    pub fn default_directory() -> CacheResult<PathBuf> {
        ProjectDirs::from("com", "DrTomLLC", "StoryReel")
            .map(|dirs| dirs.cache_dir().join("images"))
            .ok_or(CacheError::NoCacheDirectory)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Stable file name stem for a source reference
    pub fn key_for(source_ref: &str) -> String {
        format!("{:x}", md5::compute(source_ref.as_bytes()))
    }

    pub fn path_for(&self, source_ref: &str) -> PathBuf {
        self.directory
            .join(Self::key_for(source_ref))
            .with_extension(ENTRY_EXTENSION)
    }

    pub fn load(&self, source_ref: &str) -> CacheResult<Option<Bytes>> {
        let path = self.path_for(source_ref);
        match fs::read(&path) {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CacheError::Read { path, source }),
        }
    }

    /// Writes an entry atomically and returns its path
    pub fn store(&self, source_ref: &str, data: &[u8]) -> CacheResult<PathBuf> {
        self.ensure_directory()?;
        let path = self.path_for(source_ref);

        let mut temp_file =
            NamedTempFile::new_in(&self.directory).map_err(|source| CacheError::Write {
                path: path.clone(),
                source,
            })?;
        if let Err(source) = temp_file.write_all(data) {
            return Err(CacheError::Write { path, source });
        }
        if let Err(source) = temp_file.flush() {
            return Err(CacheError::Write { path, source });
        }
        temp_file
            .persist(&path)
            .map_err(|e| CacheError::Write {
                path: path.clone(),
                source: e.error,
            })?;

        log::debug!("Cached {} bytes for {}", data.len(), source_ref);
        Ok(path)
    }

    pub fn contains_entry(&self, source_ref: &str) -> bool {
        self.path_for(source_ref).is_file()
    }

    /// Removes one entry. Returns false if it was not cached.
    pub fn remove(&self, source_ref: &str) -> CacheResult<bool> {
        let path = self.path_for(source_ref);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(CacheError::Write { path, source }),
        }
    }

    /// Deletes every entry and returns how many were removed
    pub fn clear(&self) -> CacheResult<usize> {
        let mut removed = 0;
        for path in self.entries()? {
            fs::remove_file(&path).map_err(|source| CacheError::Write {
                path: path.clone(),
                source,
            })?;
            removed += 1;
        }
        log::info!(
            "Cleared {} cached images from {}",
            removed,
            self.directory.display()
        );
        Ok(removed)
    }

    pub fn entry_count(&self) -> CacheResult<usize> {
        Ok(self.entries()?.len())
    }

    fn entries(&self) -> CacheResult<Vec<PathBuf>> {
        let read_dir = match fs::read_dir(&self.directory) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(CacheError::Read {
                    path: self.directory.clone(),
                    source,
                })
            }
        };

        Ok(read_dir
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == ENTRY_EXTENSION))
            .collect())
    }

    fn ensure_directory(&self) -> CacheResult<()> {
        if !self.directory.exists() {
            fs::create_dir_all(&self.directory).map_err(|source| {
                CacheError::DirectoryCreation {
                    path: self.directory.clone(),
                    source,
                }
            })?;
            log::info!("Created image cache directory: {}", self.directory.display());
        }
        Ok(())
    }
}

impl ImageCache for DiskImageCache {
    fn get(&self, source_ref: &str) -> Option<Bytes> {
        match self.load(source_ref) {
            Ok(data) => data,
            Err(e) => {
                log::warn!("Image cache read failed: {}", e);
                None
            }
        }
    }

    fn put(&self, source_ref: &str, bytes: &[u8]) {
        if let Err(e) = self.store(source_ref, bytes) {
            log::warn!("Image cache write failed: {}", e);
        }
    }

    fn contains(&self, source_ref: &str) -> bool {
        self.contains_entry(source_ref)
    }
}
