// crates/cache/src/lib.rs
//! Image cache for StoryReel: a disk-backed side table of picture bytes

mod disk;
mod error;
mod prefetch;

pub use disk::DiskImageCache;
pub use error::{CacheError, CacheResult};
pub use prefetch::{ImagePrefetcher, PrefetchReport, DEFAULT_CONCURRENCY};
