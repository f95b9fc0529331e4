use crate::cache::{CacheKey, CachedLookup, LookupCache};
use anyhow::{Context, Result};
use bincode::{deserialize, serialize};
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Bumped whenever the entry layout changes.
const CACHE_FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    entries: Vec<(CacheKey, CachedLookup)>,
}

/// On-disk form of the lookup cache: bincode, gzip-compressed, written
/// atomically through a temp file.
pub struct LookupCacheStorage {
    cache_path: PathBuf,
    use_compression: bool,
}

impl LookupCacheStorage {
    pub fn new(cache_path: impl Into<PathBuf>) -> Self {
        Self {
            cache_path: cache_path.into(),
            use_compression: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.cache_path
    }

    /// Loads the cache. A missing file gives an empty cache; an unreadable
    /// or incompatible one is backed up and replaced by an empty cache.
    pub fn load(&self) -> Result<LookupCache> {
        if !self.cache_path.exists() {
            debug!("Lookup cache file does not exist, starting empty");
            return Ok(LookupCache::new());
        }

        let start = std::time::Instant::now();
        let data = std::fs::read(&self.cache_path)
            .with_context(|| format!("Failed to read {}", self.cache_path.display()))?;

        let file = match self.decode(&data) {
            Ok(file) if file.version == CACHE_FORMAT_VERSION => file,
            Ok(file) => {
                self.backup_incompatible(&format!("format version {}", file.version));
                return Ok(LookupCache::new());
            }
            Err(e) => {
                self.backup_incompatible(&e.to_string());
                return Ok(LookupCache::new());
            }
        };

        let cache = LookupCache::from_entries(file.entries);
        info!(
            "Loaded lookup cache: {} entries ({} negative) in {:?}",
            cache.len(),
            cache.negative_count(),
            start.elapsed()
        );
        Ok(cache)
    }

    pub fn save(&self, cache: &LookupCache) -> Result<()> {
        let start = std::time::Instant::now();
        let file = CacheFile {
            version: CACHE_FORMAT_VERSION,
            entries: cache.sorted_entries(),
        };
        let serialized = serialize(&file)?;

        let encoded = if self.use_compression {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&serialized)?;
            encoder.finish()?
        } else {
            serialized
        };

        if let Some(parent) = self.cache_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let temp_path = self.cache_path.with_extension("tmp");
        std::fs::write(&temp_path, encoded)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        std::fs::rename(&temp_path, &self.cache_path)?;

        info!("Saved lookup cache: {} entries in {:?}", cache.len(), start.elapsed());
        Ok(())
    }

    /// Removes the cache file. Returns whether one existed.
    pub fn clear(&self) -> Result<bool> {
        if !self.cache_path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&self.cache_path)
            .with_context(|| format!("Failed to remove {}", self.cache_path.display()))?;
        Ok(true)
    }

    pub fn size(&self) -> Result<u64> {
        if self.cache_path.exists() {
            Ok(std::fs::metadata(&self.cache_path)?.len())
        } else {
            Ok(0)
        }
    }

    #[cfg(test)]
    pub fn set_compression(&mut self, use_compression: bool) {
        self.use_compression = use_compression;
    }

    fn decode(&self, data: &[u8]) -> Result<CacheFile> {
        let decoded = if self.use_compression {
            let mut decoder = GzDecoder::new(data);
            let mut decompressed = Vec::new();
            decoder.read_to_end(&mut decompressed)?;
            decompressed
        } else {
            data.to_vec()
        };
        Ok(deserialize(&decoded)?)
    }

    fn backup_incompatible(&self, reason: &str) {
        let backup_path = self.cache_path.with_extension("bin.bak");
        match std::fs::copy(&self.cache_path, &backup_path) {
            Ok(_) => info!(
                "Lookup cache incompatible ({}). Backed up to {:?}, starting empty.",
                reason, backup_path
            ),
            Err(e) => warn!(
                "Lookup cache incompatible ({}) and backup failed: {}. Starting empty.",
                reason, e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use watchlog_models::{MediaType, ResolvedMedia};

    fn sample_cache() -> LookupCache {
        let mut cache = LookupCache::new();
        cache.insert(
            CacheKey::new(MediaType::Movie, "The Matrix", Some(1999)),
            CachedLookup::Found(ResolvedMedia {
                imdb_id: "tt0133093".into(),
                tmdb_id: 603,
                title: "The Matrix".into(),
                year: Some(1999),
                media_type: MediaType::Movie,
            }),
        );
        cache.insert(CacheKey::new(MediaType::Show, "Xyzzy Nonexistent", None), CachedLookup::NotFound);
        cache
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LookupCacheStorage::new(dir.path().join("cache").join("title_lookups.bin"));
        storage.save(&sample_cache()).unwrap();
        assert!(storage.size().unwrap() > 0);

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(!loaded.is_dirty());
        assert_eq!(
            loaded.get(&CacheKey::new(MediaType::Show, "Xyzzy Nonexistent", None)),
            Some(&CachedLookup::NotFound)
        );
        assert!(!dir.path().join("cache").join("title_lookups.tmp").exists());
    }

    #[test]
    fn test_uncompressed_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = LookupCacheStorage::new(dir.path().join("lookups.bin"));
        storage.set_compression(false);
        storage.save(&sample_cache()).unwrap();
        assert_eq!(storage.load().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LookupCacheStorage::new(dir.path().join("absent.bin"));
        assert!(storage.load().unwrap().is_empty());
        assert_eq!(storage.size().unwrap(), 0);
        assert!(!storage.clear().unwrap());
    }

    #[test]
    fn test_corrupt_file_backed_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("title_lookups.bin");
        std::fs::write(&path, b"not a cache").unwrap();

        let storage = LookupCacheStorage::new(&path);
        assert!(storage.load().unwrap().is_empty());
        assert!(dir.path().join("title_lookups.bin.bak").exists());
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LookupCacheStorage::new(dir.path().join("title_lookups.bin"));
        storage.save(&sample_cache()).unwrap();
        assert!(storage.clear().unwrap());
        assert!(!storage.path().exists());
    }
}
