//! Per-story "liked" flags
//!
//! Likes live in `likes.toml` beside the config file, keyed by story id.
//! They are user state rather than settings, so `ConfigManager::reset` leaves
//! them alone.

use crate::persistence::write_atomically;
use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const LIKES_FILE_NAME: &str = "likes.toml";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct LikesFile {
    liked: BTreeSet<u32>,
}

/// The set of liked story ids, backed by a TOML file
#[derive(Debug)]
pub struct LikeStore {
    path: PathBuf,
    liked: BTreeSet<u32>,
}

impl LikeStore {
    /// Opens the store at `path`; a missing file means nothing is liked yet
    pub fn open(path: PathBuf) -> ConfigResult<Self> {
        let liked = read_likes(&path)?;
        Ok(Self { path, liked })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_liked(&self, story_id: u32) -> bool {
        self.liked.contains(&story_id)
    }

    /// Liked story ids in ascending order
    pub fn liked(&self) -> impl Iterator<Item = u32> + '_ {
        self.liked.iter().copied()
    }

    /// Re-reads the file, picking up changes made by another process
    pub fn reload(&mut self) -> ConfigResult<()> {
        self.liked = read_likes(&self.path)?;
        Ok(())
    }

    /// Flips the flag of `story_id` and saves; returns the new flag
    pub fn toggle(&mut self, story_id: u32) -> ConfigResult<bool> {
        self.reload()?;

        let liked = if self.liked.remove(&story_id) {
            false
        } else {
            self.liked.insert(story_id);
            true
        };

        let file = LikesFile {
            liked: self.liked.clone(),
        };
        write_atomically(&self.path, &toml::to_string(&file)?)?;

        log::debug!("Story {} liked: {}", story_id, liked);
        Ok(liked)
    }
}

fn read_likes(path: &Path) -> ConfigResult<BTreeSet<u32>> {
    if !path.exists() {
        return Ok(BTreeSet::new());
    }

    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let file: LikesFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(file.liked)
}
